/// Publication domain type
use crate::types::Link;
use serde::{Deserialize, Serialize};

/// Publication level metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Publication title
    pub title: String,
}

/// A loaded publication
///
/// Immutable once loaded. The reading order is the linear listening sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Publication metadata
    pub metadata: Metadata,

    /// Ordered resources (chapters / audio tracks)
    pub reading_order: Vec<Link>,

    /// Auxiliary resources (cover, etc.)
    #[serde(default)]
    pub resources: Vec<Link>,
}

impl Publication {
    /// Create a publication from its title and reading order
    pub fn new(title: impl Into<String>, reading_order: Vec<Link>) -> Self {
        Self {
            metadata: Metadata {
                title: title.into(),
            },
            reading_order,
            resources: Vec::new(),
        }
    }

    /// Add auxiliary resources
    #[must_use]
    pub fn with_resources(mut self, resources: Vec<Link>) -> Self {
        self.resources = resources;
        self
    }

    /// First link with the given relation, reading order first
    pub fn link_with_rel(&self, rel: &str) -> Option<&Link> {
        self.links().find(|link| link.has_rel(rel))
    }

    /// First link with the given href, reading order first
    pub fn link_with_href(&self, href: &str) -> Option<&Link> {
        self.links().find(|link| link.href == href)
    }

    fn links(&self) -> impl Iterator<Item = &Link> {
        self.reading_order.iter().chain(self.resources.iter())
    }
}
