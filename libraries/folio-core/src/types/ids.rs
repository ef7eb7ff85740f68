/// ID types for Folio entities
use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication identifier
///
/// Identifies a publication loaded into a (possibly shared) media session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(String);

impl PublicationId {
    /// Create a new publication ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Media identifier of a reading order resource inside a media session
///
/// Formatted as `<publication id>#<href>` so that a session shared by several
/// publications can route a resource back to its publication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaId {
    publication_id: PublicationId,
    href: String,
}

impl MediaId {
    /// Create a media ID for a resource of a publication
    pub fn new(publication_id: PublicationId, href: impl Into<String>) -> Self {
        Self {
            publication_id,
            href: href.into(),
        }
    }

    /// Parse a `<publication id>#<href>` string
    ///
    /// Splits on the first `#`, the href keeps any further `#`.
    pub fn parse(id: &str) -> Result<Self> {
        match id.split_once('#') {
            Some((publication_id, href)) if !publication_id.is_empty() => {
                Ok(Self::new(PublicationId::new(publication_id), href))
            }
            _ => Err(FolioError::invalid_media_id(id)),
        }
    }

    /// Publication part of the media ID
    pub fn publication_id(&self) -> &PublicationId {
        &self.publication_id
    }

    /// Resource href part of the media ID
    pub fn href(&self) -> &str {
        &self.href
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.publication_id, self.href)
    }
}

impl TryFrom<String> for MediaId {
    type Error = FolioError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MediaId> for String {
    fn from(id: MediaId) -> Self {
        id.to_string()
    }
}
