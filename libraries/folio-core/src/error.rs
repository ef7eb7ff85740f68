/// Core error types for Folio
use thiserror::Error;

/// Result type alias using `FolioError`
pub type Result<T> = std::result::Result<T, FolioError>;

/// Core error type for Folio
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    /// Reading order index outside of the publication
    #[error("Invalid reading order index {index} (reading order has {len} resources)")]
    InvalidIndex { index: usize, len: usize },

    /// No reading order resource has this href
    #[error("Resource not found in reading order: {0}")]
    HrefNotFound(String),

    /// Media id is not of the form `<publication id>#<href>`
    #[error("Invalid media id: {0}")]
    InvalidMediaId(String),
}

impl FolioError {
    /// Create an invalid media id error
    pub fn invalid_media_id(id: impl Into<String>) -> Self {
        Self::InvalidMediaId(id.into())
    }
}
