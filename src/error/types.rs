use thiserror::Error;

use crate::logging::LoggingError;
use crate::runtime::driver::DriverError;

/// Unified result type for the screen router crate.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Failures raised while turning a JSON-like payload into a `ScreenIdentifier`.
///
/// Decoding is the only place the router surfaces errors; dispatch misses are
/// silent by contract.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("identifier payload must be a JSON object")]
    NotAnObject,
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` has an invalid value")]
    InvalidField { field: &'static str },
    #[error("unknown screen value `{value}` in field `{field}`")]
    UnknownScreen { field: &'static str, value: String },
    #[error("malformed identifier JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Name of the offending payload field, when the failure is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidField { field }
            | Self::UnknownScreen { field, .. } => Some(field),
            Self::NotAnObject | Self::Json(_) => None,
        }
    }
}

/// Errors surfaced by the crate's fallible edges.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
}
