use thiserror::Error;

/// Errors raised while building or validating widget configuration.
///
/// Runtime interaction never fails: controllers swallow media and DOM
/// failures and fall back to Idle, so only configuration surfaces errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    #[error("max duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("config json parse error: {0}")]
    ConfigJson(String),
}

pub type FxResult<T> = Result<T, FxError>;

pub(crate) fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> FxResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(FxError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
