//! Error types for unveil
//!
//! Components themselves never fail: bad option values fall back to their
//! documented defaults at render time. Errors only surface where options are
//! validated or looked up explicitly.

use thiserror::Error;

/// Errors reported at the configuration boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnveilError {
    /// An option carried a value outside its accepted range
    #[error("invalid value for `{field}`: {reason}")]
    InvalidOption { field: &'static str, reason: String },

    /// No mounted component is registered under this key
    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    /// A component with this key is already mounted
    #[error("duplicate component key `{0}`")]
    DuplicateComponent(String),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl UnveilError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        UnveilError::InvalidOption {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for unveil operations
pub type Result<T> = std::result::Result<T, UnveilError>;

/// Check that `value` is a finite number
pub fn ensure_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(UnveilError::invalid(field, format!("expected a finite number, got {value}")))
    }
}

/// Check that `value` is a finite number and not negative
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(UnveilError::invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

/// Check that `value` is a fraction in `0.0..=1.0`
pub fn ensure_fraction(field: &'static str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(UnveilError::invalid(field, format!("must be between 0 and 1, got {value}")));
    }
    Ok(())
}
