//! Playback session state
//!
//! Keeps the latest metadata, transport sample and position of a media
//! session, and republishes the derived locator and playback summary each
//! time one of them changes.

use crate::types::{MediaMetadata, PlaybackSummary, SessionPlaybackState, Timeline, TransportState};
use folio_core::{Locator, LocatorTranslator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tracing::{debug, error};

/// Latest known values of a media session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    /// Metadata of the loaded resource
    pub metadata: Option<MediaMetadata>,

    /// Last transport sample
    pub transport: Option<SessionPlaybackState>,

    /// Position in the current track, sampled or optimistically set by a seek
    pub position: Duration,
}

/// Snapshot of a media session plus its derived, observable values
///
/// The locator is withheld until metadata is known, and then only replaced by
/// another resolvable locator: an href missing from the reading order keeps
/// the last good value. Both published values are only sent when they change.
pub struct PlaybackSessionState {
    translator: Arc<LocatorTranslator>,
    snapshot: PlaybackSnapshot,
    locator_tx: watch::Sender<Locator>,
    playback_tx: watch::Sender<Option<PlaybackSummary>>,
}

impl PlaybackSessionState {
    /// Create an empty state publishing the placeholder locator
    pub fn new(translator: Arc<LocatorTranslator>) -> Self {
        let (locator_tx, _) = watch::channel(Locator::default());
        let (playback_tx, _) = watch::channel(None);
        Self {
            translator,
            snapshot: PlaybackSnapshot::default(),
            locator_tx,
            playback_tx,
        }
    }

    /// Latest known values
    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    /// Position in the current track
    pub fn position(&self) -> Duration {
        self.snapshot.position
    }

    /// Whether the last transport sample says playing
    pub fn is_playing(&self) -> bool {
        self.snapshot
            .transport
            .is_some_and(|transport| transport.state == TransportState::Playing)
    }

    /// Last published locator
    pub fn current_locator(&self) -> Locator {
        self.locator_tx.borrow().clone()
    }

    /// Last published playback summary
    pub fn current_playback(&self) -> Option<PlaybackSummary> {
        *self.playback_tx.borrow()
    }

    /// Observe the current locator
    pub fn subscribe_locator(&self) -> watch::Receiver<Locator> {
        self.locator_tx.subscribe()
    }

    /// Observe the raw playback summary (`None` until metadata and transport are known)
    pub fn subscribe_playback(&self) -> watch::Receiver<Option<PlaybackSummary>> {
        self.playback_tx.subscribe()
    }

    /// Stream of playback summaries, see [`playback_stream`]
    pub fn playback(&self) -> impl Stream<Item = PlaybackSummary> + Send + 'static {
        playback_stream(self.subscribe_playback())
    }

    /// Record new session metadata
    pub fn ingest_metadata(&mut self, metadata: MediaMetadata) {
        self.snapshot.metadata = Some(metadata);
        self.publish();
    }

    /// Record a new transport sample
    pub fn ingest_transport(&mut self, transport: SessionPlaybackState) {
        self.snapshot.transport = Some(transport);
        self.publish();
    }

    /// Record a new position, sampled or set ahead of a seek
    pub fn ingest_position(&mut self, position: Duration) {
        if self.snapshot.position == position {
            return;
        }
        self.snapshot.position = position;
        self.publish();
    }

    fn publish(&self) {
        if let Some(locator) = self.derive_locator() {
            self.locator_tx.send_if_modified(|current| {
                if *current == locator {
                    return false;
                }
                *current = locator;
                true
            });
        }

        let summary = self.derive_summary();
        if summary.is_some() {
            self.playback_tx.send_if_modified(|current| {
                if *current == summary {
                    return false;
                }
                *current = summary;
                true
            });
        }
    }

    fn resource_href(&self) -> Option<&str> {
        self.snapshot.metadata.as_ref()?.resource_href()
    }

    fn derive_locator(&self) -> Option<Locator> {
        let href = self.resource_href()?;
        let Some(index) = self.translator.index_of(href) else {
            debug!(href, "Resource is not in the reading order, keeping last locator");
            return None;
        };
        match self.translator.to_locator(index, Some(self.snapshot.position)) {
            Ok(locator) => Some(locator),
            Err(e) => {
                debug!(error = %e, "Failed to build locator");
                None
            }
        }
    }

    fn derive_summary(&self) -> Option<PlaybackSummary> {
        self.snapshot.metadata.as_ref()?;
        let transport = self.snapshot.transport?;

        let duration = match self.resource_href() {
            Some(href) => match self.translator.index_of(href) {
                Some(index) => self.translator.index().duration_of(index),
                None => {
                    error!(href, "Playing a resource outside of the reading order");
                    None
                }
            },
            None => None,
        };
        let position = self.snapshot.position;

        Some(PlaybackSummary {
            state: transport.state,
            rate: transport.playback_rate,
            timeline: Timeline {
                // A sample taken right at a track transition can overshoot.
                position: duration.map_or(position, |duration| position.min(duration)),
                duration,
                buffered: None,
            },
        })
    }
}

/// Playback summaries as a stream
///
/// Starts with the current summary, if any. A slow consumer only sees the
/// latest value, and never two identical summaries in a row.
pub fn playback_stream(
    rx: watch::Receiver<Option<PlaybackSummary>>,
) -> impl Stream<Item = PlaybackSummary> + Send + 'static {
    let mut last = None;
    WatchStream::new(rx).filter_map(move |summary| {
        let summary = summary?;
        if last == Some(summary) {
            return None;
        }
        last = Some(summary);
        Some(summary)
    })
}
