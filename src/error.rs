//! Crate error type.
//!
//! Engines never fail; errors only surface at the boundaries where inputs
//! are validated (run initialization, point-set import) or where the
//! background worker's channels have been torn down.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("run worker disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
