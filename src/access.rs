//! Sign-in and role routing. There are no credentials: a user is identified by
//! email alone and their role decides which views they can open.

use crate::catalog::{Catalog, Role, Store, User};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("no user with email {email}")]
    UnknownUser { email: String },
    #[error("{user} has no store assigned")]
    NoStoreAssigned { user: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavView {
    Orders,
    OrderHistory,
    SpoilageAnalysis,
    RegionalView,
    Mailbox,
    Corporate,
}

impl NavView {
    pub fn label(&self) -> &'static str {
        match self {
            NavView::Orders => "Orders",
            NavView::OrderHistory => "Order History",
            NavView::SpoilageAnalysis => "Spoilage Analysis",
            NavView::RegionalView => "Regional View",
            NavView::Mailbox => "Mailbox",
            NavView::Corporate => "Corporate",
        }
    }
}

impl fmt::Display for NavView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn views_for(role: Role) -> &'static [NavView] {
    match role {
        Role::StoreManager => &[
            NavView::Orders,
            NavView::OrderHistory,
            NavView::SpoilageAnalysis,
            NavView::RegionalView,
            NavView::Mailbox,
        ],
        Role::RegionalManager => &[NavView::RegionalView],
        Role::CorporateAnalyst => &[NavView::Corporate],
    }
}

/// The signed-in user and, for store managers, the store they review.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub user: User,
    pub store: Option<Store>,
}

impl SignedIn {
    pub fn views(&self) -> &'static [NavView] {
        views_for(self.user.role)
    }

    pub fn home_view(&self) -> NavView {
        self.views()[0]
    }

    pub fn store_name(&self) -> Option<&str> {
        self.store.as_ref().map(|s| s.name.as_str())
    }
}

pub fn sign_in(catalog: &Catalog, email: &str) -> Result<SignedIn, AccessError> {
    let wanted = email.trim();
    let user = catalog
        .users()
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| AccessError::UnknownUser {
            email: wanted.to_string(),
        })?;

    let store = match user.role {
        Role::StoreManager => {
            let store = user
                .store_id
                .and_then(|id| catalog.store(id))
                .cloned()
                .ok_or_else(|| AccessError::NoStoreAssigned {
                    user: user.name.clone(),
                })?;
            Some(store)
        }
        Role::RegionalManager | Role::CorporateAnalyst => None,
    };

    tracing::info!(user = %user.name, role = %user.role, store = ?store.as_ref().map(|s| &s.name), "signed in");
    Ok(SignedIn { user, store })
}
