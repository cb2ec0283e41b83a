mod types;

pub use types::{DecodeError, Result, RouterError};
