use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Backend response shapes. All payloads are camelCase JSON.

/// One SKU's suggestion as delivered by the backend, before any review state
/// is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub sku: String,
    pub product_name: String,
    pub current_inventory: i64,
    pub forecasted_qty: i64,
    pub recommended_qty: i64,
    pub target_delivery_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpoilageReason {
    Expired,
    Damaged,
    Overstock,
    Theft,
}

impl SpoilageReason {
    pub const ALL: [SpoilageReason; 4] = [
        SpoilageReason::Expired,
        SpoilageReason::Damaged,
        SpoilageReason::Overstock,
        SpoilageReason::Theft,
    ];
}

impl fmt::Display for SpoilageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpoilageReason::Expired => "Expired",
            SpoilageReason::Damaged => "Damaged",
            SpoilageReason::Overstock => "Overstock",
            SpoilageReason::Theft => "Theft",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoilageRecord {
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub reason: SpoilageReason,
    pub recorded_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntry {
    pub sku: String,
    pub product_name: String,
    pub order_date: NaiveDate,
    pub quantity_ordered: u32,
    pub current_inventory: i64,
    pub shelf_life_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Alert,
    Info,
    Reminder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalStorePerformance {
    pub store_name: String,
    pub total_spoilage: f64,  // USD
    pub order_accuracy: f64,  // percentage
    pub inventory_turnover: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    pub value: String,
    pub trend: Trend,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub sales: f64,
    pub spoilage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorporateDashboard {
    #[serde(default)]
    pub kpis: Vec<Kpi>,
    #[serde(default)]
    pub performance: Vec<CategoryPerformance>,
}
