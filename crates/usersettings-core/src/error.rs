// Error types for settings operations

use thiserror::Error;

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while loading or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failure reported by the persistence store.
    ///
    /// Transparent: the store's own message and source chain are surfaced as-is.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    /// Caller supplied an unusable identifier
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SettingsError {
    /// Create a storage error
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        SettingsError::Storage(err.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SettingsError::InvalidInput(msg.into())
    }

    /// Whether this error was caused by the caller rather than the store
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SettingsError::InvalidInput(_))
    }
}
