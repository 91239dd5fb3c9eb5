pub mod filter;
pub mod quantity;
pub mod recommendation;
pub mod review;
pub mod status;

pub use filter::{CategoryFilter, StatusFilter};
pub use quantity::{QuantityInputPolicy, ReviewError};
pub use recommendation::OrderRecommendation;
pub use review::{BatchTotals, ReviewEngine};
pub use status::{ReviewFlags, ReviewStatus};
