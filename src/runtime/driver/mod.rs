//! Drivers feeding external input into the router.

use thiserror::Error;

pub mod deeplink;

pub use deeplink::{Acknowledgement, DeepLinkDriver, DeepLinkNavigation};

pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("driver has no bound listener")]
    NotBound,
}
