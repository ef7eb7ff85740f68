/// Publication link type
use crate::types::Locator;
use serde::{Deserialize, Serialize};

/// A resource of a publication (reading order entry or auxiliary resource)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Resource reference, unique within the publication
    pub href: String,

    /// Media type of the resource (e.g. `audio/mpeg`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Human readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Relations (e.g. `cover`)
    #[serde(rename = "rel", default, skip_serializing_if = "Vec::is_empty")]
    pub rels: Vec<String>,

    /// Duration in seconds, for time-based resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Link {
    /// Create a link with only an href
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    /// Set the media type
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Add a relation
    #[must_use]
    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rels.push(rel.into());
        self
    }

    /// Whether the link has the given relation
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r == rel)
    }

    /// Bare locator pointing at the start of this resource
    pub fn to_locator(&self) -> Locator {
        let mut locator = Locator::new(
            self.href.clone(),
            self.media_type.clone().unwrap_or_default(),
        );
        locator.title = self.title.clone();
        locator
    }
}
