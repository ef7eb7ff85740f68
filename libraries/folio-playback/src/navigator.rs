//! Media session navigator - core orchestration
//!
//! Ties one publication to a (possibly shared) media session: ingests session
//! events, samples the playback position while playing, publishes the current
//! locator and issues transport commands while its publication is the one
//! loaded in the session.

use crate::{
    error::{NavigatorError, Result},
    poller::{PollTicket, PositionPoller},
    session::{MediaSession, SessionEvent},
    state::PlaybackSessionState,
    types::{MediaMetadata, NavigatorConfig, PlaybackSummary, SessionPlaybackState},
};
use chrono::TimeDelta;
use folio_core::{Link, Locator, LocatorTranslator, MediaId, Publication, PublicationId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::Stream;
use tracing::{debug, trace, warn};

/// A transport command, as sent to a navigator owned by a driver task
#[derive(Debug, Clone, PartialEq)]
pub enum Transport {
    /// Jump to a locator
    Go(Locator),
    /// Skip forward by the configured interval
    GoForward,
    /// Skip backward by the configured interval
    GoBackward,
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between play and pause
    PlayPause,
    /// Stop playback
    Stop,
    /// Seek in the current track
    SeekTo(Duration),
    /// Seek relative to the current position
    SeekRelative(TimeDelta),
    /// Change the playback speed
    SetPlaybackRate(f64),
}

/// Navigator over a media session for one publication
///
/// Every command checks first that this publication is the one loaded in the
/// session. Commands on an inactive session do nothing and return `false`,
/// except [`play`](Self::play) which is remembered and replayed once the
/// session reports that it loaded this publication.
pub struct MediaSessionNavigator {
    publication: Arc<Publication>,
    publication_id: PublicationId,
    session: Arc<dyn MediaSession>,
    config: NavigatorConfig,
    translator: Arc<LocatorTranslator>,
    state: PlaybackSessionState,
    poller: PositionPoller,

    // Play requested while another publication was loaded
    play_when_ready: bool,
}

impl MediaSessionNavigator {
    /// Create a navigator for a publication played through `session`
    pub fn new(
        publication: Arc<Publication>,
        publication_id: PublicationId,
        session: Arc<dyn MediaSession>,
        config: NavigatorConfig,
    ) -> Result<Self> {
        config.validate()?;

        if publication.reading_order.is_empty() {
            return Err(NavigatorError::InvalidConfig(format!(
                "publication {publication_id} has an empty reading order"
            )));
        }

        let translator = Arc::new(LocatorTranslator::new(publication.reading_order.clone()));
        let poller = PositionPoller::new(config.position_refresh_interval());

        debug!(
            %publication_id,
            resources = publication.reading_order.len(),
            "Created media session navigator"
        );

        Ok(Self {
            state: PlaybackSessionState::new(Arc::clone(&translator)),
            publication,
            publication_id,
            session,
            config,
            translator,
            poller,
            play_when_ready: false,
        })
    }

    /// Publication navigated by this instance
    pub fn publication(&self) -> &Publication {
        &self.publication
    }

    /// Identifier of the publication in the media session
    pub fn publication_id(&self) -> &PublicationId {
        &self.publication_id
    }

    /// Navigator configuration
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Whether the session currently has this publication loaded
    pub fn is_active(&self) -> bool {
        self.session.publication_id().as_ref() == Some(&self.publication_id)
    }

    // ===== Observers =====

    /// Last resolved locator (placeholder before the first one)
    pub fn current_locator(&self) -> Locator {
        self.state.current_locator()
    }

    /// Observe the current locator
    pub fn subscribe_locator(&self) -> watch::Receiver<Locator> {
        self.state.subscribe_locator()
    }

    /// Observe the raw playback summary
    pub fn subscribe_playback(&self) -> watch::Receiver<Option<PlaybackSummary>> {
        self.state.subscribe_playback()
    }

    /// Deduplicated, conflated stream of playback summaries
    pub fn playback(&self) -> impl Stream<Item = PlaybackSummary> + Send + 'static {
        self.state.playback()
    }

    /// Whether the last transport state received is `playing`
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Position in the current track, including not yet confirmed seeks
    pub fn position(&self) -> Duration {
        self.state.position()
    }

    /// Whether a play request is waiting for this publication to be loaded
    pub fn is_play_pending(&self) -> bool {
        self.play_when_ready
    }

    /// Whether the position sampling chain is alive
    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    // ===== Session events =====

    /// Ingest an event delivered by the media session
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::MetadataChanged(metadata) => self.on_metadata_changed(metadata),
            SessionEvent::PlaybackStateChanged(state) => self.on_playback_state_changed(state),
            SessionEvent::PublicationChanged(publication_id) => {
                self.on_publication_changed(&publication_id);
            }
            SessionEvent::Custom(name) => trace!(event = %name, "Ignoring custom session event"),
        }
    }

    fn on_metadata_changed(&mut self, metadata: MediaMetadata) {
        if !self.is_active() || metadata.resource_href().is_none() {
            return;
        }
        self.state.ingest_metadata(metadata);
    }

    fn on_playback_state_changed(&mut self, state: SessionPlaybackState) {
        if !self.is_active() {
            return;
        }

        self.state.ingest_transport(state);
        if state.is_playing() {
            self.play_when_ready = false;
            let generation = self.poller.start();
            self.update_playback_position(generation);
        } else {
            self.poller.cancel();
            self.state.ingest_position(state.elapsed_position);
        }
    }

    fn on_publication_changed(&mut self, publication_id: &PublicationId) {
        if *publication_id != self.publication_id || !self.play_when_ready {
            return;
        }
        if self.session.playback_state().is_playing() {
            return;
        }

        debug!(publication_id = %self.publication_id, "Publication loaded, resuming requested playback");
        self.play_when_ready = false;
        self.play();
    }

    // ===== Position sampling =====

    /// Fire a poll ticket whose delay elapsed
    ///
    /// Stale tickets (poller cancelled or restarted since) are ignored.
    pub fn on_poll_tick(&mut self, ticket: PollTicket) {
        if !self.poller.accept(&ticket) {
            trace!(generation = ticket.generation(), "Dropping stale poll ticket");
            return;
        }
        self.update_playback_position(ticket.generation());
    }

    /// Ticket scheduled since the last call, to be fired after its delay
    pub fn take_scheduled_poll(&mut self) -> Option<PollTicket> {
        self.poller.take_scheduled()
    }

    fn update_playback_position(&mut self, generation: u64) {
        if !self.is_active() {
            self.poller.cancel();
            return;
        }

        let sample = self.session.playback_state();
        self.state.ingest_position(sample.elapsed_position);

        if sample.is_playing() {
            self.poller.reschedule(generation);
        } else {
            trace!(state = ?sample.state, "Playback not running, position sampling stopped");
            self.poller.cancel();
        }
    }

    // ===== Navigation =====

    /// Apply a transport command
    pub fn apply(&mut self, transport: Transport) -> bool {
        match transport {
            Transport::Go(locator) => self.go(locator),
            Transport::GoForward => self.go_forward(),
            Transport::GoBackward => self.go_backward(),
            Transport::Play => self.play(),
            Transport::Pause => self.pause(),
            Transport::PlayPause => self.play_pause(),
            Transport::Stop => self.stop(),
            Transport::SeekTo(position) => self.seek_to(position),
            Transport::SeekRelative(offset) => self.seek_relative(offset),
            Transport::SetPlaybackRate(rate) => self.set_playback_rate(rate),
        }
    }

    /// Play from a locator
    ///
    /// The whole locator travels with the command so the session can seek to
    /// the exact position it carries.
    pub fn go(&mut self, locator: Locator) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.translator.index_of(&locator.href).is_none() {
            debug!(href = %locator.href, "Cannot go to a resource outside of the reading order");
            return false;
        }

        let media_id = MediaId::new(self.publication_id.clone(), locator.href.clone());
        self.session.play_from_media_id(&media_id, locator);
        true
    }

    /// Play from the start of a link
    pub fn go_to_link(&mut self, link: &Link) -> bool {
        self.go(link.to_locator())
    }

    /// Skip forward by the configured interval
    pub fn go_forward(&mut self) -> bool {
        self.seek_by(self.config.skip_forward_interval, false)
    }

    /// Skip backward by the configured interval
    pub fn go_backward(&mut self) -> bool {
        self.seek_by(self.config.skip_backward_interval, true)
    }

    // ===== Transport =====

    /// Start or resume playback
    ///
    /// On an inactive session the request is kept until the session loads
    /// this publication.
    pub fn play(&mut self) -> bool {
        if !self.is_active() {
            self.play_when_ready = true;
            return false;
        }
        self.session.play();
        true
    }

    /// Pause playback
    pub fn pause(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.session.pause();
        true
    }

    /// Pause if the session is playing, play otherwise
    pub fn play_pause(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.session.playback_state().is_playing() {
            self.session.pause();
        } else {
            self.session.play();
        }
        true
    }

    /// Stop playback
    pub fn stop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.session.stop();
        true
    }

    /// Seek in the current track
    ///
    /// The position is published locally before the session confirms it, so
    /// successive skips build on each other without waiting for a sample.
    pub fn seek_to(&mut self, position: Duration) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state.ingest_position(position);
        self.session.seek_to(position);
        true
    }

    /// Seek relative to the current position; a negative offset goes back
    ///
    /// Targets before the start of the track are clamped to zero.
    pub fn seek_relative(&mut self, offset: TimeDelta) -> bool {
        let millis = offset.num_milliseconds();
        self.seek_by(Duration::from_millis(millis.unsigned_abs()), millis < 0)
    }

    fn seek_by(&mut self, magnitude: Duration, backward: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        let position = self.state.position();
        let target = if backward {
            position.saturating_sub(magnitude)
        } else {
            position.saturating_add(magnitude)
        };
        self.seek_to(target)
    }

    /// Change the playback speed
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        if !rate.is_finite() || rate <= 0.0 {
            warn!(rate, "Ignoring invalid playback rate");
            return false;
        }
        self.session.set_playback_rate(rate);
        true
    }

    /// Stop sampling and drop any pending play request
    ///
    /// Poll tickets still in flight become no-ops.
    pub fn shutdown(&mut self) {
        self.poller.cancel();
        self.play_when_ready = false;
        debug!(publication_id = %self.publication_id, "Media session navigator shut down");
    }
}
