//! Media session collaborator
//!
//! Abstracts the platform media session (audio engine + OS media controls).
//! A single session may be shared by several navigators, one per publication;
//! only the navigator whose publication is loaded in the session is active.

use crate::types::{MediaMetadata, SessionPlaybackState};
use folio_core::{Locator, MediaId, PublicationId};
use std::time::Duration;

/// Remote playback session
///
/// Commands are fire-and-forget: their effect is reported back later through
/// [`SessionEvent`]s.
#[cfg_attr(test, mockall::automock)]
pub trait MediaSession: Send + Sync {
    /// Publication currently loaded in the session
    fn publication_id(&self) -> Option<PublicationId>;

    /// Latest transport sample
    fn playback_state(&self) -> SessionPlaybackState;

    /// Elapsed position in the current track
    fn elapsed_position(&self) -> Duration {
        self.playback_state().elapsed_position
    }

    /// Playback speed multiplier
    fn playback_rate(&self) -> f64 {
        self.playback_state().playback_rate
    }

    /// Start or resume playback
    fn play(&self);

    /// Pause playback
    fn pause(&self);

    /// Stop playback
    fn stop(&self);

    /// Seek in the current track
    fn seek_to(&self, position: Duration);

    /// Load and play a resource
    ///
    /// `locator` is forwarded untouched so the session can seek to the exact
    /// position it carries.
    fn play_from_media_id(&self, media_id: &MediaId, locator: Locator);

    /// Change the playback speed
    fn set_playback_rate(&self, rate: f64);
}

/// Events delivered by a media session, in delivery order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Metadata of the loaded item changed
    MetadataChanged(MediaMetadata),

    /// Transport state changed
    PlaybackStateChanged(SessionPlaybackState),

    /// A publication was loaded in the session
    PublicationChanged(PublicationId),

    /// Session specific event without meaning for navigation
    Custom(String),
}
