//! Shared helpers for navigator integration tests

#![allow(dead_code)]

use folio_core::{Link, Locator, MediaId, Publication, PublicationId};
use folio_playback::{
    MediaMetadata, MediaSession, MediaSessionNavigator, NavigatorConfig, SessionEvent,
    SessionPlaybackState, TransportState,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

pub const BOOK: &str = "book";

static INIT: Once = Once::new();

/// Route navigator logs to the test output
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    });
}

/// Command received by the fake session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Play,
    Pause,
    Stop,
    SeekTo(Duration),
    PlayFromMediaId(String, Locator),
    SetPlaybackRate(f64),
}

#[derive(Default)]
struct Inner {
    publication_id: Option<PublicationId>,
    state: SessionPlaybackState,
    commands: Vec<SessionCommand>,
}

/// In-memory media session recording every command
#[derive(Default)]
pub struct FakeSession {
    inner: Mutex<Inner>,
    state_queries: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Session with `publication_id` already loaded
    pub fn loaded(publication_id: &str) -> Arc<Self> {
        let session = Self::new();
        session.load(publication_id);
        session
    }

    pub fn load(&self, publication_id: &str) {
        self.inner.lock().unwrap().publication_id = Some(PublicationId::new(publication_id));
    }

    pub fn set_state(&self, state: TransportState, elapsed: Duration) {
        self.inner.lock().unwrap().state = SessionPlaybackState::new(state, elapsed);
    }

    pub fn set_elapsed(&self, elapsed: Duration) {
        self.inner.lock().unwrap().state.elapsed_position = elapsed;
    }

    pub fn commands(&self) -> Vec<SessionCommand> {
        self.inner.lock().unwrap().commands.clone()
    }

    pub fn count(&self, command: &SessionCommand) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }

    /// Number of `playback_state` calls so far
    pub fn state_queries(&self) -> usize {
        self.state_queries.load(Ordering::SeqCst)
    }

    fn record(&self, command: SessionCommand) {
        self.inner.lock().unwrap().commands.push(command);
    }
}

impl MediaSession for FakeSession {
    fn publication_id(&self) -> Option<PublicationId> {
        self.inner.lock().unwrap().publication_id.clone()
    }

    fn playback_state(&self) -> SessionPlaybackState {
        self.state_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.lock().unwrap().state
    }

    fn play(&self) {
        self.record(SessionCommand::Play);
    }

    fn pause(&self) {
        self.record(SessionCommand::Pause);
    }

    fn stop(&self) {
        self.record(SessionCommand::Stop);
    }

    fn seek_to(&self, position: Duration) {
        self.record(SessionCommand::SeekTo(position));
    }

    fn play_from_media_id(&self, media_id: &MediaId, locator: Locator) {
        self.record(SessionCommand::PlayFromMediaId(media_id.to_string(), locator));
    }

    fn set_playback_rate(&self, rate: f64) {
        self.record(SessionCommand::SetPlaybackRate(rate));
    }
}

/// Two chapters: 100s and 200s
pub fn two_chapters() -> Arc<Publication> {
    Arc::new(Publication::new(
        "Book",
        vec![
            Link::new("c1.mp3")
                .with_media_type("audio/mpeg")
                .with_title("Chapter 1")
                .with_duration(100.0),
            Link::new("c2.mp3")
                .with_media_type("audio/mpeg")
                .with_title("Chapter 2")
                .with_duration(200.0),
        ],
    ))
}

pub fn navigator(session: Arc<FakeSession>) -> MediaSessionNavigator {
    init_tracing();
    MediaSessionNavigator::new(
        two_chapters(),
        PublicationId::new(BOOK),
        session,
        NavigatorConfig::default(),
    )
    .unwrap()
}

pub fn metadata(href: &str) -> SessionEvent {
    SessionEvent::MetadataChanged(MediaMetadata::new(&MediaId::new(
        PublicationId::new(BOOK),
        href,
    )))
}

pub fn transport(state: TransportState, elapsed: Duration) -> SessionEvent {
    SessionEvent::PlaybackStateChanged(SessionPlaybackState::new(state, elapsed))
}

pub fn secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}
