use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("invalid quantity {input:?}: expected a whole number of units, 0 or more")]
    InvalidQuantity { input: String },
}

/// What to do with quantity text that is not a non-negative whole number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantityInputPolicy {
    /// Refuse the edit and leave the quantity unchanged.
    #[default]
    Reject,
    /// Treat unparseable text as 0 and clamp negatives to 0.
    CoerceToZero,
}

pub fn parse_quantity(input: &str, policy: QuantityInputPolicy) -> Result<i64, ReviewError> {
    let parsed = input.trim().parse::<i64>().ok();
    match (policy, parsed) {
        (_, Some(q)) if q >= 0 => Ok(q),
        (QuantityInputPolicy::CoerceToZero, _) => Ok(0),
        (QuantityInputPolicy::Reject, _) => Err(ReviewError::InvalidQuantity {
            input: input.to_string(),
        }),
    }
}
