use super::status::{ReviewFlags, ReviewStatus};
use crate::feed::types::RecommendationRecord;
use chrono::NaiveDate;

/// A recommendation under review: the backend suggestion plus the manager's
/// overrides. Edits return a new value instead of mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecommendation {
    pub sku: String,
    pub product_name: String,
    pub current_inventory: i64,
    pub forecasted_qty: i64,
    pub recommended_qty: i64,
    pub target_delivery_date: NaiveDate,
    adjusted_qty: i64,
    justification: String,
    flags: ReviewFlags,
}

impl From<RecommendationRecord> for OrderRecommendation {
    fn from(rec: RecommendationRecord) -> Self {
        Self {
            adjusted_qty: rec.recommended_qty,
            sku: rec.sku,
            product_name: rec.product_name,
            current_inventory: rec.current_inventory,
            forecasted_qty: rec.forecasted_qty,
            recommended_qty: rec.recommended_qty,
            target_delivery_date: rec.target_delivery_date,
            justification: String::new(),
            flags: ReviewFlags::default(),
        }
    }
}

impl OrderRecommendation {
    pub fn adjusted_qty(&self) -> i64 {
        self.adjusted_qty
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }

    pub fn flags(&self) -> ReviewFlags {
        self.flags
    }

    pub fn status(&self) -> ReviewStatus {
        self.flags.status()
    }

    pub fn is_adjusted(&self) -> bool {
        self.flags.adjusted
    }

    pub fn is_approved(&self) -> bool {
        self.flags.approved
    }

    /// Signed difference between the manager's quantity and the suggestion,
    /// saturating at the `i64` bounds.
    pub fn delta(&self) -> i64 {
        self.adjusted_qty.saturating_sub(self.recommended_qty)
    }

    pub fn with_adjusted_qty(&self, qty: i64) -> Self {
        Self {
            adjusted_qty: qty,
            flags: ReviewFlags {
                adjusted: qty != self.recommended_qty,
                ..self.flags
            },
            ..self.clone()
        }
    }

    pub fn with_justification(&self, text: impl Into<String>) -> Self {
        Self {
            justification: text.into(),
            ..self.clone()
        }
    }

    pub fn approved(&self) -> Self {
        Self {
            flags: ReviewFlags {
                approved: true,
                ..self.flags
            },
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bananas() -> OrderRecommendation {
        RecommendationRecord {
            sku: "PROD-001".to_string(),
            product_name: "Organic Bananas".to_string(),
            current_inventory: 50,
            forecasted_qty: 30,
            recommended_qty: 20,
            target_delivery_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        }
        .into()
    }

    #[test]
    fn test_initial_review_state() {
        let rec = bananas();
        assert_eq!(rec.adjusted_qty(), 20);
        assert_eq!(rec.justification(), "");
        assert_eq!(rec.status(), ReviewStatus::PendingForReview);
    }

    #[test]
    fn test_edit_leaves_previous_value_untouched() {
        let rec = bananas();
        let edited = rec.with_adjusted_qty(25);
        assert_eq!(rec.adjusted_qty(), 20);
        assert_eq!(edited.adjusted_qty(), 25);
        assert_eq!(edited.delta(), 5);
        assert_eq!(edited.status(), ReviewStatus::Adjusted);
    }

    #[test]
    fn test_justification_does_not_change_status() {
        let rec = bananas().with_justification("Supplier Delay");
        assert_eq!(rec.justification(), "Supplier Delay");
        assert_eq!(rec.status(), ReviewStatus::PendingForReview);
    }

    #[test]
    fn test_quantity_edit_keeps_approval() {
        let rec = bananas().approved().with_adjusted_qty(5);
        assert_eq!(rec.status(), ReviewStatus::AdjustedAndApproved);
        let reverted = rec.with_adjusted_qty(20);
        assert_eq!(reverted.status(), ReviewStatus::Approved);
    }

    #[test]
    fn test_delta_at_extremes() {
        assert_eq!(bananas().with_adjusted_qty(i64::MIN).delta(), i64::MIN);
        assert_eq!(bananas().with_adjusted_qty(i64::MAX).delta(), i64::MAX - 20);
        assert_eq!(bananas().with_adjusted_qty(0).delta(), -20);
    }
}
