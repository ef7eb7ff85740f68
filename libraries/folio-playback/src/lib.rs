//! Folio - Media Session Navigation
//!
//! Keeps a publication's reading position and a media session in sync.
//!
//! This crate provides:
//! - Media session navigator (transport commands gated on the active publication)
//! - Position sampling while playing (configurable refresh rate)
//! - Locator and playback summary observers (deduplicated)
//! - Optimistic seeks and relative skips
//! - Deferred play until the session loads the publication
//! - Session side preparation (metadata, `play_from_media_id` resolution)
//!
//! # Architecture
//!
//! `folio-playback` does not talk to any audio engine itself:
//! - The platform media session is abstracted by the [`MediaSession`] trait
//! - Session events are fed to the navigator as [`SessionEvent`]s
//! - [`MediaSessionNavigator`] is synchronous and has a single owner
//! - [`NavigatorHandle`] runs it on a tokio task and fires the poll ticks
//!
//! # Example: Driving a navigator
//!
//! ```rust,no_run
//! use folio_core::{Link, Publication, PublicationId};
//! use folio_playback::{
//!     MediaSession, MediaSessionNavigator, NavigatorConfig, NavigatorHandle, SessionEvent,
//! };
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! # async fn run(session: Arc<dyn MediaSession>) -> folio_playback::Result<()> {
//! let publication = Arc::new(Publication::new(
//!     "Book",
//!     vec![
//!         Link::new("c1.mp3").with_duration(100.0),
//!         Link::new("c2.mp3").with_duration(200.0),
//!     ],
//! ));
//!
//! let navigator = MediaSessionNavigator::new(
//!     publication,
//!     PublicationId::new("book"),
//!     session,
//!     NavigatorConfig::default(),
//! )?;
//!
//! // The platform forwards its session callbacks here
//! let (events_tx, events_rx) = mpsc::unbounded_channel::<SessionEvent>();
//! let handle = NavigatorHandle::spawn(navigator, events_rx);
//!
//! let mut locator = handle.current_locator();
//! handle.play().await;
//! locator.changed().await.ok();
//! println!("Now at {:?}", locator.borrow().locations);
//!
//! handle.shutdown().await;
//! # drop(events_tx);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod driver;
mod error;
mod navigator;
mod poller;
mod preparer;
mod session;
mod state;
pub mod types;

// Public exports
pub use driver::NavigatorHandle;
pub use error::{NavigatorError, Result};
pub use navigator::{MediaSessionNavigator, Transport};
pub use poller::{PollTicket, PositionPoller};
pub use preparer::{PlaybackPreparer, SeekTarget};
pub use session::{MediaSession, SessionEvent};
pub use state::{playback_stream, PlaybackSessionState, PlaybackSnapshot};
pub use types::{
    MediaMetadata, NavigatorConfig, PlaybackSummary, SessionPlaybackState, Timeline,
    TransportState,
};
