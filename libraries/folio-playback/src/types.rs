//! Core types for media navigation

use folio_core::MediaId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{NavigatorError, Result};

/// Transport state reported by a media session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    /// Nothing prepared
    Idle,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Stopped
    Stopped,

    /// Waiting for data
    Buffering,

    /// Playback failed
    Error,
}

/// Transport sample of a media session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionPlaybackState {
    /// Transport state
    pub state: TransportState,

    /// Elapsed position in the current track
    pub elapsed_position: Duration,

    /// Playback speed multiplier
    pub playback_rate: f64,
}

impl SessionPlaybackState {
    /// Create a sample at normal speed
    pub fn new(state: TransportState, elapsed_position: Duration) -> Self {
        Self {
            state,
            elapsed_position,
            playback_rate: 1.0,
        }
    }

    /// Check if the session is playing
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }
}

impl Default for SessionPlaybackState {
    fn default() -> Self {
        Self::new(TransportState::Idle, Duration::ZERO)
    }
}

/// Metadata of the item loaded in a media session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// `<publication id>#<href>` of the loaded resource
    pub media_id: Option<String>,

    /// Display title
    pub title: Option<String>,

    /// Cover art URI
    pub icon_uri: Option<String>,
}

impl MediaMetadata {
    /// Metadata for a media ID
    pub fn new(media_id: &MediaId) -> Self {
        Self {
            media_id: Some(media_id.to_string()),
            ..Self::default()
        }
    }

    /// Href of the reading order resource, if the media ID carries one
    pub fn resource_href(&self) -> Option<&str> {
        let (_, href) = self.media_id.as_deref()?.split_once('#')?;
        Some(href)
    }
}

/// Playback position on the timeline of the current track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Played time, never past `duration` when the duration is known
    pub position: Duration,

    /// Duration of the current track
    pub duration: Option<Duration>,

    /// Buffered position (not reported yet)
    pub buffered: Option<Duration>,
}

/// Summary of the playback, published to observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSummary {
    /// Transport state
    pub state: TransportState,

    /// Playback speed multiplier
    pub rate: f64,

    /// Position in the current track
    pub timeline: Timeline,
}

/// Configuration for a media session navigator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Rate at which the position is sampled while playing, in Hz (default: 2.0)
    pub position_refresh_rate: f64,

    /// Skip applied by `go_forward` (default: 30s)
    pub skip_forward_interval: Duration,

    /// Skip applied by `go_backward` (default: 30s)
    pub skip_backward_interval: Duration,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            position_refresh_rate: 2.0,
            skip_forward_interval: Duration::from_secs(30),
            skip_backward_interval: Duration::from_secs(30),
        }
    }
}

impl NavigatorConfig {
    /// Check the configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.position_refresh_rate.is_finite() || self.position_refresh_rate <= 0.0 {
            return Err(NavigatorError::InvalidConfig(format!(
                "position_refresh_rate must be a positive number of Hz, got {}",
                self.position_refresh_rate
            )));
        }
        if self.position_refresh_interval().is_zero() {
            return Err(NavigatorError::InvalidConfig(format!(
                "position_refresh_rate {} Hz is too high",
                self.position_refresh_rate
            )));
        }
        Ok(())
    }

    /// Delay between two position samples
    pub fn position_refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.position_refresh_rate).unwrap_or_default()
    }
}
