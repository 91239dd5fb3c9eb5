//! Reference data the dashboard is configured with: users, stores, the product
//! catalog and the enumerated justification reasons.
//!
//! Everything here is injected at startup (fetched from a data source or
//! loaded from fixtures) rather than compiled in, so engines can be built
//! against arbitrary fixtures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Store Manager")]
    StoreManager,
    #[serde(rename = "Regional Manager")]
    RegionalManager,
    #[serde(rename = "Corporate Analyst")]
    CorporateAnalyst,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::StoreManager => "Store Manager",
            Role::RegionalManager => "Regional Manager",
            Role::CorporateAnalyst => "Corporate Analyst",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub store_id: Option<u32>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: u32,
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSku {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit_of_measure: String,
}

/// Injected reference data with SKU and id lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    users: Vec<User>,
    stores: Vec<Store>,
    products: Vec<ProductSku>,
    justification_reasons: Vec<String>,
    by_sku: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(
        users: Vec<User>,
        stores: Vec<Store>,
        products: Vec<ProductSku>,
        justification_reasons: Vec<String>,
    ) -> Self {
        let by_sku = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.sku.clone(), i))
            .collect();
        Self {
            users,
            stores,
            products,
            justification_reasons,
            by_sku,
        }
    }

    /// Catalog with only products, for engines that need nothing else.
    pub fn with_products(products: Vec<ProductSku>) -> Self {
        Self::new(Vec::new(), Vec::new(), products, Vec::new())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn products(&self) -> &[ProductSku] {
        &self.products
    }

    pub fn justification_reasons(&self) -> &[String] {
        &self.justification_reasons
    }

    pub fn product(&self, sku: &str) -> Option<&ProductSku> {
        self.by_sku.get(sku).map(|&i| &self.products[i])
    }

    pub fn category_of(&self, sku: &str) -> Option<&str> {
        self.product(sku).map(|p| p.category.as_str())
    }

    /// Distinct product categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for p in &self.products {
            if !out.contains(&p.category) {
                out.push(p.category.clone());
            }
        }
        out
    }

    pub fn store(&self, id: u32) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    pub fn store_by_name(&self, name: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.name == name)
    }

    /// Distinct regions in first-seen order.
    pub fn regions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for s in &self.stores {
            if !out.contains(&s.region) {
                out.push(s.region.clone());
            }
        }
        out
    }

    pub fn stores_in_region(&self, region: &str) -> Vec<&Store> {
        self.stores.iter().filter(|s| s.region == region).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(sku: &str, name: &str, category: &str, unit: &str) -> ProductSku {
        ProductSku {
            sku: sku.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            unit_of_measure: unit.to_string(),
        }
    }

    pub fn pilot_catalog() -> Catalog {
        let users = vec![
            User {
                id: 1,
                name: "Alice Manager".to_string(),
                email: "storemgr@greengrocer.com".to_string(),
                role: Role::StoreManager,
                store_id: Some(101),
                region: Some("North".to_string()),
            },
            User {
                id: 2,
                name: "Bob Regional".to_string(),
                email: "regionalmgr@greengrocer.com".to_string(),
                role: Role::RegionalManager,
                store_id: None,
                region: Some("North".to_string()),
            },
            User {
                id: 3,
                name: "Charlie Analyst".to_string(),
                email: "analyst@greengrocer.com".to_string(),
                role: Role::CorporateAnalyst,
                store_id: None,
                region: None,
            },
        ];
        let stores = vec![
            Store { id: 101, name: "GreenGrocer Downtown".to_string(), region: "North".to_string() },
            Store { id: 102, name: "GreenGrocer Suburbia".to_string(), region: "North".to_string() },
            Store { id: 201, name: "GreenGrocer Westside".to_string(), region: "West".to_string() },
            Store { id: 202, name: "GreenGrocer East Bay".to_string(), region: "West".to_string() },
        ];
        let products = vec![
            product("PROD-001", "Organic Bananas", "Produce", "lb"),
            product("PROD-002", "Avocados (Hass)", "Produce", "each"),
            product("DAIRY-001", "Organic Milk (Gallon)", "Dairy", "gallon"),
            product("DAIRY-002", "Greek Yogurt (Plain)", "Dairy", "tub"),
            product("BAKE-001", "Artisan Sourdough", "Bakery", "loaf"),
        ];
        let reasons = vec![
            "Supplier Delay".to_string(),
            "Seasonal Demand Spike".to_string(),
            "Marketing Promotion".to_string(),
        ];
        Catalog::new(users, stores, products, reasons)
    }
}
