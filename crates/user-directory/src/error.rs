//! User directory error types.

use common::UserId;
use thiserror::Error;

/// Errors that can occur when calling the user directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory has no user with this id.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// The directory could not be reached.
    #[error("User directory unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the configured timeout.
    #[error("User directory timed out: {0}")]
    Timeout(String),

    /// The directory answered with an unexpected status.
    #[error("User directory error: {0}")]
    Service(String),

    /// The response body could not be decoded.
    #[error("Malformed user directory response: {0}")]
    Malformed(String),
}

/// Convenience type alias for directory results.
pub type Result<T> = std::result::Result<T, DirectoryError>;
