use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent facts a review status is derived from.
///
/// `approved` is sticky: nothing in the review workflow clears it once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReviewFlags {
    pub adjusted: bool,
    pub approved: bool,
}

impl ReviewFlags {
    pub fn status(self) -> ReviewStatus {
        match (self.adjusted, self.approved) {
            (false, false) => ReviewStatus::PendingForReview,
            (true, false) => ReviewStatus::Adjusted,
            (false, true) => ReviewStatus::Approved,
            (true, true) => ReviewStatus::AdjustedAndApproved,
        }
    }
}

/// Display label of a recommendation's review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[serde(rename = "Pending for Review")]
    PendingForReview,
    #[serde(rename = "Adjusted")]
    Adjusted,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Adjusted and Approved")]
    AdjustedAndApproved,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::PendingForReview,
        ReviewStatus::Adjusted,
        ReviewStatus::Approved,
        ReviewStatus::AdjustedAndApproved,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReviewStatus::PendingForReview => "Pending for Review",
            ReviewStatus::Adjusted => "Adjusted",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::AdjustedAndApproved => "Adjusted and Approved",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn flags(self) -> ReviewFlags {
        match self {
            ReviewStatus::PendingForReview => ReviewFlags { adjusted: false, approved: false },
            ReviewStatus::Adjusted => ReviewFlags { adjusted: true, approved: false },
            ReviewStatus::Approved => ReviewFlags { adjusted: false, approved: true },
            ReviewStatus::AdjustedAndApproved => ReviewFlags { adjusted: true, approved: true },
        }
    }

    pub fn is_approved(self) -> bool {
        self.flags().approved
    }

    /// Status after a quantity edit. Only the adjusted bit follows the edit;
    /// the approved bit is carried over.
    pub fn after_quantity_edit(self, is_adjusted: bool) -> Self {
        ReviewFlags {
            adjusted: is_adjusted,
            ..self.flags()
        }
        .status()
    }

    /// Status after an approval. Idempotent.
    pub fn after_approval(self) -> Self {
        ReviewFlags {
            approved: true,
            ..self.flags()
        }
        .status()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewStatus::*;

    #[test]
    fn test_quantity_edit_table() {
        let table = [
            (PendingForReview, false, PendingForReview),
            (PendingForReview, true, Adjusted),
            (Approved, false, Approved),
            (Approved, true, AdjustedAndApproved),
            (Adjusted, false, PendingForReview),
            (Adjusted, true, Adjusted),
            (AdjustedAndApproved, false, Approved),
            (AdjustedAndApproved, true, AdjustedAndApproved),
        ];
        for (current, adjusted, expected) in table {
            assert_eq!(
                current.after_quantity_edit(adjusted),
                expected,
                "{} with adjusted={}",
                current,
                adjusted
            );
        }
    }

    #[test]
    fn test_approval_transitions() {
        assert_eq!(PendingForReview.after_approval(), Approved);
        assert_eq!(Adjusted.after_approval(), AdjustedAndApproved);
        assert_eq!(Approved.after_approval(), Approved);
        assert_eq!(AdjustedAndApproved.after_approval(), AdjustedAndApproved);
    }

    #[test]
    fn test_flags_round_trip_through_status() {
        for status in ReviewStatus::ALL {
            assert_eq!(status.flags().status(), status);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(PendingForReview.to_string(), "Pending for Review");
        assert_eq!(from_label_or_panic("Adjusted and Approved"), AdjustedAndApproved);
        assert_eq!(ReviewStatus::from_label("All"), None);
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&AdjustedAndApproved).unwrap();
        assert_eq!(json, "\"Adjusted and Approved\"");
        let back: ReviewStatus = serde_json::from_str("\"Pending for Review\"").unwrap();
        assert_eq!(back, PendingForReview);
    }

    fn from_label_or_panic(label: &str) -> ReviewStatus {
        ReviewStatus::from_label(label).unwrap()
    }
}
