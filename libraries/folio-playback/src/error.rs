//! Error types for media navigation

use thiserror::Error;

/// Media navigation errors
///
/// Transport commands never fail: an inactive session is routine and reported
/// as `false`. These errors only surface when setting a navigator up.
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// Invalid navigator configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Publication model error
    #[error(transparent)]
    Core(#[from] folio_core::FolioError),

    /// The driver task owning the navigator has stopped
    #[error("Navigator driver is closed")]
    DriverClosed,
}

/// Result type for media navigation
pub type Result<T> = std::result::Result<T, NavigatorError>;
