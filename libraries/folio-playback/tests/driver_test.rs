//! Integration tests for the navigator driver task
//!
//! Run on a paused clock: timers fire as soon as the runtime is idle, so poll
//! ticks are deterministic.

mod common;

use chrono::TimeDelta;
use common::{metadata, navigator, secs, transport, FakeSession, SessionCommand, BOOK};
use folio_core::PublicationId;
use folio_playback::{NavigatorError, NavigatorHandle, SessionEvent, TransportState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::StreamExt;

fn spawn(session: &Arc<FakeSession>) -> (NavigatorHandle, mpsc::UnboundedSender<SessionEvent>) {
    let (events, events_rx) = mpsc::unbounded_channel();
    let handle = NavigatorHandle::spawn(navigator(Arc::clone(session)), events_rx);
    (handle, events)
}

#[tokio::test(start_paused = true)]
async fn samples_position_every_refresh_interval() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);

    session.set_state(TransportState::Playing, Duration::ZERO);
    events.send(metadata("c1.mp3")).unwrap();
    events.send(transport(TransportState::Playing, Duration::ZERO)).unwrap();
    assert!(handle.is_playing().await);

    session.set_elapsed(secs(1));
    sleep(Duration::from_millis(600)).await;
    assert_eq!(handle.position().await.unwrap(), secs(1));

    session.set_elapsed(secs(2));
    sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.position().await.unwrap(), secs(2));
    assert_eq!(
        handle.current_locator().borrow().locations.fragment.as_deref(),
        Some("t=2")
    );

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn sampling_stops_after_pause() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);

    session.set_state(TransportState::Playing, Duration::ZERO);
    events.send(transport(TransportState::Playing, Duration::ZERO)).unwrap();
    sleep(Duration::from_millis(1200)).await;
    assert!(session.state_queries() >= 3);

    session.set_state(TransportState::Paused, secs(1));
    events.send(transport(TransportState::Paused, secs(1))).unwrap();
    assert!(!handle.is_playing().await);
    let queries = session.state_queries();

    sleep(secs(5)).await;
    assert_eq!(session.state_queries(), queries);
    assert_eq!(handle.position().await.unwrap(), secs(1));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn locator_receiver_sees_updates() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);
    let mut locator = handle.current_locator();
    assert!(locator.borrow_and_update().is_placeholder());

    events.send(metadata("c2.mp3")).unwrap();
    locator.changed().await.unwrap();
    assert_eq!(locator.borrow_and_update().href, "c2.mp3");

    assert!(handle.seek_relative(TimeDelta::seconds(50)).await);
    locator.changed().await.unwrap();
    let current = locator.borrow_and_update().clone();
    assert_eq!(current.locations.progression, Some(0.25));
    assert_eq!(current.locations.total_progression, Some(0.5));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn playback_stream_reports_summaries() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);
    let mut playback = Box::pin(handle.playback());

    events.send(metadata("c1.mp3")).unwrap();
    events.send(transport(TransportState::Paused, secs(10))).unwrap();

    let summary = playback.next().await.unwrap();
    assert_eq!(summary.state, TransportState::Paused);
    assert_eq!(summary.timeline.position, secs(10));
    assert_eq!(summary.timeline.duration, Some(secs(100)));

    assert!(handle.seek_to(secs(20)).await);
    let summary = playback.next().await.unwrap();
    assert_eq!(summary.timeline.position, secs(20));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn driver_survives_a_seek_to_the_largest_duration() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);

    events.send(metadata("c2.mp3")).unwrap();
    assert!(handle.seek_to(Duration::MAX).await);
    assert_eq!(handle.position().await.unwrap(), Duration::MAX);

    assert!(handle.play().await);
    assert!(!handle.is_closed());

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn commands_are_forwarded_to_the_session() {
    let session = FakeSession::loaded(BOOK);
    let (handle, _events) = spawn(&session);

    assert!(handle.play().await);
    assert!(handle.pause().await);
    assert!(handle.set_playback_rate(1.5).await);
    assert!(!handle.set_playback_rate(-1.0).await);
    assert!(handle.stop().await);

    assert_eq!(
        session.commands(),
        vec![
            SessionCommand::Play,
            SessionCommand::Pause,
            SessionCommand::SetPlaybackRate(1.5),
            SessionCommand::Stop,
        ]
    );

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn deferred_play_through_the_driver() {
    let session = FakeSession::loaded("other-book");
    let (handle, events) = spawn(&session);

    assert!(!handle.play().await);
    assert!(session.commands().is_empty());

    session.load(BOOK);
    events
        .send(SessionEvent::PublicationChanged(PublicationId::new(BOOK)))
        .unwrap();
    // Events are handled before the query below.
    handle.is_playing().await;

    assert_eq!(session.commands(), vec![SessionCommand::Play]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_reading_events() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);

    session.set_state(TransportState::Playing, Duration::ZERO);
    events.send(transport(TransportState::Playing, Duration::ZERO)).unwrap();
    assert!(handle.is_playing().await);

    handle.shutdown().await;
    let queries = session.state_queries();

    assert!(events.send(metadata("c1.mp3")).is_err());
    sleep(secs(5)).await;
    assert_eq!(session.state_queries(), queries);
}

#[tokio::test(start_paused = true)]
async fn closing_the_event_channel_stops_the_driver() {
    let session = FakeSession::loaded(BOOK);
    let (handle, events) = spawn(&session);
    drop(events);

    assert!(!handle.play().await);
    assert!(matches!(
        handle.position().await,
        Err(NavigatorError::DriverClosed)
    ));
    assert!(handle.is_closed());
    assert!(session.commands().is_empty());
}
