//! Navigator driver
//!
//! Runs a [`MediaSessionNavigator`] on its own tokio task, the single owner of
//! its state. Session events, handle commands and poll deadlines are processed
//! one at a time in delivery order, so the navigator needs no locking.

use crate::{
    error::{NavigatorError, Result},
    navigator::{MediaSessionNavigator, Transport},
    poller::PollTicket,
    session::SessionEvent,
    state::playback_stream,
    types::PlaybackSummary,
};
use chrono::TimeDelta;
use folio_core::{Link, Locator};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

enum Command {
    Transport(Transport, oneshot::Sender<bool>),
    IsPlaying(oneshot::Sender<bool>),
    Position(oneshot::Sender<Duration>),
}

/// Handle to a navigator running on a driver task
///
/// Commands resolve to `false` once the driver has stopped.
pub struct NavigatorHandle {
    commands: mpsc::UnboundedSender<Command>,
    locator_rx: watch::Receiver<Locator>,
    playback_rx: watch::Receiver<Option<PlaybackSummary>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl NavigatorHandle {
    /// Spawn the driver task for `navigator`
    ///
    /// `events` carries the session events; closing it stops the driver.
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        navigator: MediaSessionNavigator,
        events: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> Self {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let locator_rx = navigator.subscribe_locator();
        let playback_rx = navigator.subscribe_playback();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(navigator, events, commands_rx, cancel.clone()));

        Self {
            commands,
            locator_rx,
            playback_rx,
            cancel,
            task,
        }
    }

    // ===== Observers =====

    /// Observe the current locator
    pub fn current_locator(&self) -> watch::Receiver<Locator> {
        self.locator_rx.clone()
    }

    /// Deduplicated, conflated stream of playback summaries
    ///
    /// Each call starts a new stream from the current summary.
    pub fn playback(&self) -> impl Stream<Item = PlaybackSummary> + Send + 'static {
        playback_stream(self.playback_rx.clone())
    }

    /// Whether the last transport state received is `playing`
    pub async fn is_playing(&self) -> bool {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::IsPlaying(tx)).is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// Position in the current track, including not yet confirmed seeks
    pub async fn position(&self) -> Result<Duration> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Position(tx))
            .map_err(|_| NavigatorError::DriverClosed)?;
        rx.await.map_err(|_| NavigatorError::DriverClosed)
    }

    /// Whether the driver task has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    // ===== Commands =====

    /// Play from a locator
    pub async fn go(&self, locator: Locator) -> bool {
        self.transport(Transport::Go(locator)).await
    }

    /// Play from the start of a link
    pub async fn go_to_link(&self, link: &Link) -> bool {
        self.go(link.to_locator()).await
    }

    /// Skip forward by the configured interval
    pub async fn go_forward(&self) -> bool {
        self.transport(Transport::GoForward).await
    }

    /// Skip backward by the configured interval
    pub async fn go_backward(&self) -> bool {
        self.transport(Transport::GoBackward).await
    }

    /// Start or resume playback
    pub async fn play(&self) -> bool {
        self.transport(Transport::Play).await
    }

    /// Pause playback
    pub async fn pause(&self) -> bool {
        self.transport(Transport::Pause).await
    }

    /// Toggle between play and pause
    pub async fn play_pause(&self) -> bool {
        self.transport(Transport::PlayPause).await
    }

    /// Stop playback
    pub async fn stop(&self) -> bool {
        self.transport(Transport::Stop).await
    }

    /// Seek in the current track
    pub async fn seek_to(&self, position: Duration) -> bool {
        self.transport(Transport::SeekTo(position)).await
    }

    /// Seek relative to the current position
    pub async fn seek_relative(&self, offset: TimeDelta) -> bool {
        self.transport(Transport::SeekRelative(offset)).await
    }

    /// Change the playback speed
    pub async fn set_playback_rate(&self, rate: f64) -> bool {
        self.transport(Transport::SetPlaybackRate(rate)).await
    }

    async fn transport(&self, transport: Transport) -> bool {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Transport(transport, tx)).is_err() {
            debug!("Navigator driver is closed, dropping command");
            return false;
        }
        rx.await.unwrap_or(false)
    }

    /// Stop the driver and wait for it to finish
    ///
    /// Pending poll deadlines are dropped and session events are no longer read.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!("Navigator driver task failed: {}", e);
        }
    }
}

async fn run(
    mut navigator: MediaSessionNavigator,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    cancel: CancellationToken,
) {
    info!(publication_id = %navigator.publication_id(), "Starting media navigator");

    let mut next_poll: Option<(Instant, PollTicket)> = None;

    loop {
        arm_poll(&mut navigator, &mut next_poll);
        let poll_deadline = next_poll.map(|(deadline, _)| deadline);

        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                debug!("Media navigator cancelled");
                break;
            }
            event = events.recv() => match event {
                Some(event) => navigator.handle_event(event),
                None => {
                    debug!("Session event channel closed");
                    break;
                }
            },
            command = commands.recv() => match command {
                Some(command) => dispatch(&mut navigator, command),
                None => break,
            },
            () = sleep_until(poll_deadline.unwrap_or_else(Instant::now)), if poll_deadline.is_some() => {
                if let Some((_, ticket)) = next_poll.take() {
                    navigator.on_poll_tick(ticket);
                }
            }
        }
    }

    navigator.shutdown();
    info!(publication_id = %navigator.publication_id(), "Media navigator stopped");
}

/// Track the deadline of the latest scheduled ticket, or none once sampling stopped
fn arm_poll(navigator: &mut MediaSessionNavigator, next_poll: &mut Option<(Instant, PollTicket)>) {
    if let Some(ticket) = navigator.take_scheduled_poll() {
        *next_poll = Some((Instant::now() + ticket.delay(), ticket));
    } else if !navigator.is_polling() {
        *next_poll = None;
    }
}

fn dispatch(navigator: &mut MediaSessionNavigator, command: Command) {
    // A dropped reply only means the caller stopped waiting.
    match command {
        Command::Transport(transport, reply) => {
            let _ = reply.send(navigator.apply(transport));
        }
        Command::IsPlaying(reply) => {
            let _ = reply.send(navigator.is_playing());
        }
        Command::Position(reply) => {
            let _ = reply.send(navigator.position());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MockMediaSession;
    use crate::types::{NavigatorConfig, SessionPlaybackState, TransportState};
    use folio_core::{Publication, PublicationId};
    use std::sync::Arc;

    fn playing_navigator() -> MediaSessionNavigator {
        let mut session = MockMediaSession::new();
        session
            .expect_publication_id()
            .returning(|| Some(PublicationId::new("book")));
        session
            .expect_playback_state()
            .returning(|| SessionPlaybackState::new(TransportState::Playing, Duration::ZERO));

        MediaSessionNavigator::new(
            Arc::new(Publication::new(
                "Book",
                vec![Link::new("c1.mp3").with_duration(100.0)],
            )),
            PublicationId::new("book"),
            Arc::new(session),
            NavigatorConfig::default(),
        )
        .unwrap()
    }

    fn transport(state: TransportState) -> SessionEvent {
        SessionEvent::PlaybackStateChanged(SessionPlaybackState::new(state, Duration::ZERO))
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_follows_scheduled_ticket() {
        let mut navigator = playing_navigator();
        let mut next_poll = None;

        navigator.handle_event(transport(TransportState::Playing));
        arm_poll(&mut navigator, &mut next_poll);

        let (deadline, ticket) = next_poll.unwrap();
        assert_eq!(deadline, Instant::now() + Duration::from_millis(500));
        assert_eq!(ticket.delay(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_disarms_pending_deadline() {
        let mut navigator = playing_navigator();
        let mut next_poll = None;

        navigator.handle_event(transport(TransportState::Playing));
        arm_poll(&mut navigator, &mut next_poll);
        assert!(next_poll.is_some());

        navigator.handle_event(transport(TransportState::Paused));
        arm_poll(&mut navigator, &mut next_poll);
        assert!(next_poll.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_kept_between_ticks() {
        let mut navigator = playing_navigator();
        let mut next_poll = None;

        navigator.handle_event(transport(TransportState::Playing));
        arm_poll(&mut navigator, &mut next_poll);
        let armed = next_poll;

        // Nothing new scheduled while the chain is alive.
        arm_poll(&mut navigator, &mut next_poll);
        assert_eq!(next_poll, armed);
    }
}
