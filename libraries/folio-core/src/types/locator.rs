/// Locator domain type
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix of a temporal media fragment (`t=<seconds>`)
const TIME_FRAGMENT_PREFIX: &str = "t=";

/// A pointer into a publication
///
/// Locators are rebuilt on every position update, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locator {
    /// Reading order resource reference
    pub href: String,

    /// Media type of the resource
    #[serde(rename = "type")]
    pub media_type: String,

    /// Title of the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Position inside the resource and the publication
    #[serde(default)]
    pub locations: Locations,
}

/// Location of a [`Locator`] inside its resource and publication
///
/// Fractions are not clamped. A sampling race around a track transition may
/// produce a value slightly above 1.0; display code clamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    /// Media fragment, e.g. `t=42`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,

    /// Fraction of the resource consumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression: Option<f64>,

    /// Fraction of the whole publication consumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_progression: Option<f64>,
}

impl Locator {
    /// Create a bare locator without location
    pub fn new(href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: media_type.into(),
            title: None,
            locations: Locations::default(),
        }
    }

    /// Whether this is the placeholder published before any position is known
    pub fn is_placeholder(&self) -> bool {
        self.href == "#" && self.media_type.is_empty()
    }

    /// Copy of this locator with new locations
    #[must_use]
    pub fn with_locations(&self, locations: Locations) -> Self {
        Self {
            locations,
            ..self.clone()
        }
    }
}

impl Default for Locator {
    /// Placeholder locator, `{href: "#", type: ""}`
    fn default() -> Self {
        Self::new("#", "")
    }
}

impl Locations {
    /// Time offset carried by a `t=<seconds>` fragment
    ///
    /// Accepts the media fragment range form `t=<start>,<end>` and returns the
    /// start. Anything else, including negative or non-finite values, is `None`.
    pub fn time(&self) -> Option<Duration> {
        let value = self
            .fragment
            .as_deref()?
            .trim()
            .strip_prefix(TIME_FRAGMENT_PREFIX)?;
        let start = value.split(',').next()?.trim();
        let seconds: f64 = start.parse().ok()?;
        if seconds < 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(seconds).ok()
    }

    /// `t=<seconds>` fragment for a time offset, rounded to the second
    pub fn time_fragment(position: Duration) -> String {
        format!(
            "{}{}",
            TIME_FRAGMENT_PREFIX,
            position.as_secs_f64().round() as u64
        )
    }
}
