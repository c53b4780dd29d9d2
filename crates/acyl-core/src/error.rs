//! Error types for Acyl secret backends.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("secret backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
