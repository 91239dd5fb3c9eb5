//! Read-mostly views for the non-ordering screens: spoilage, regional
//! performance, the corporate dashboard and the store mailbox.

pub mod corporate;
pub mod mailbox;
pub mod regional;
pub mod spoilage;

pub use corporate::CorporateView;
pub use mailbox::Mailbox;
pub use regional::{RegionalSummary, RegionalView};
pub use spoilage::{SpoilageError, SpoilageLog, WasteEntry};
