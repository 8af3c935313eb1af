use thiserror::Error;

/// Errors for structural preconditions the calculator refuses to model.
///
/// Out-of-range environmental inputs never land here; they are clamped or
/// defaulted at the call site.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PickupError {
    #[error("invalid input: {what} must be > 0 (got {value})")]
    InvalidInput { what: &'static str, value: f64 },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl PickupError {
    pub(crate) fn invalid(what: &'static str, value: f64) -> Self {
        PickupError::InvalidInput { what, value }
    }
}

pub type Result<T> = std::result::Result<T, PickupError>;

/// Reject non-positive (and NaN) values with an `InvalidInput` error.
pub(crate) fn require_positive(what: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(PickupError::invalid(what, value))
    }
}
