//! Error types for hdrgamma

use thiserror::Error;

use crate::icc::IccError;
use crate::install::InstallError;

/// Result type for hdrgamma operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hdrgamma operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Malformed display characteristics or curve parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Profile encoding failed
    #[error("Encoding error: {0}")]
    Encoding(#[from] IccError),

    /// The installer boundary reported a failure
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// Configuration could not be parsed or is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures caused by the caller's input rather than the boundary
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::Encoding(IccError::InvalidInput(_))
                | Self::Encoding(IccError::CurveLengthMismatch { .. })
                | Self::Encoding(IccError::FixedPointOverflow { .. })
        )
    }
}
