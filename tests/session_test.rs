//! Session lifecycle against the real engine. Only local behaviour is
//! asserted; STUN servers may be unreachable from the test machine.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use webrtc_demo_lib::config::FactoryOptions;
use webrtc_demo_lib::peer::connection::new_peer;
use webrtc_demo_lib::peer::engine::{build_factory, initialization_count};
use webrtc_demo_lib::peer::negotiation::{LOCAL_DESCRIPTION_SET, LOCAL_SDP_CREATED};
use webrtc_demo_lib::peer::{NegotiationObserver, NegotiationState};
use webrtc_demo_lib::{DemoError, EventLog, Session, SessionConfig, SessionState};

const WAIT: Duration = Duration::from_secs(10);

fn loopback_config() -> SessionConfig {
    let mut config = SessionConfig::default();
    config.factory = FactoryOptions {
        include_loopback_candidate: true,
        ..FactoryOptions::default()
    };
    config
}

async fn wait_for_line(log: &EventLog, wanted: &str) -> bool {
    let mut rx = log.subscribe();
    let found = timeout(WAIT, async {
        loop {
            if rx.borrow_and_update().iter().any(|l| l == wanted) {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    found.is_ok() && log.snapshot().iter().any(|l| l == wanted)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_with_two_stun_servers_succeeds() {
    let log = EventLog::new();
    let session = Session::create(SessionConfig::default(), Arc::new(log.clone()))
        .await
        .expect("session should be created");

    assert_eq!(session.state(), SessionState::Created);
    assert_eq!(session.id().len(), 16);
    assert!(log.is_empty());
    session.dispose().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_is_initialized_once_for_many_sessions() {
    let first = Session::create(SessionConfig::default(), Arc::new(EventLog::new()))
        .await
        .unwrap();
    let second = Session::create(SessionConfig::default(), Arc::new(EventLog::new()))
        .await
        .unwrap();

    assert_eq!(initialization_count(), 1);

    first.dispose().await.unwrap();
    second.dispose().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_config_is_rejected_before_touching_the_engine() {
    let config = SessionConfig {
        ice_servers: vec![],
        ..SessionConfig::default()
    };
    let result = Session::create(config, Arc::new(EventLog::new())).await;
    assert!(matches!(result, Err(DemoError::InvalidConfig(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gathering_installs_an_audio_only_offer() {
    let log = EventLog::new();
    let session = Session::create(loopback_config(), Arc::new(log.clone()))
        .await
        .unwrap();

    session.gather_candidates().await.unwrap();
    assert_eq!(session.state(), SessionState::Gathering);
    assert!(wait_for_line(&log, LOCAL_DESCRIPTION_SET).await);

    let lines = log.snapshot();
    let created = lines.iter().position(|l| l == LOCAL_SDP_CREATED).unwrap();
    let set = lines.iter().position(|l| l == LOCAL_DESCRIPTION_SET).unwrap();
    assert!(created < set);
    assert_eq!(lines.iter().filter(|l| *l == LOCAL_SDP_CREATED).count(), 1);
    assert_eq!(lines.iter().filter(|l| *l == LOCAL_DESCRIPTION_SET).count(), 1);

    // Every other line is a forwarded candidate.
    assert!(lines
        .iter()
        .filter(|l| *l != LOCAL_SDP_CREATED && *l != LOCAL_DESCRIPTION_SET)
        .all(|l| l.starts_with("New ICE candidate: candidate:")));

    let sdp = session.local_sdp().await.unwrap().expect("local description");
    assert!(sdp.contains("m=audio"));
    assert!(!sdp.contains("m=video"));
    assert!(sdp.contains("a=recvonly"));

    session.dispose().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gathering_twice_is_refused() {
    let session = Session::create(SessionConfig::default(), Arc::new(EventLog::new()))
        .await
        .unwrap();
    session.gather_candidates().await.unwrap();
    assert!(matches!(
        session.gather_candidates().await,
        Err(DemoError::AlreadyGathering)
    ));
    session.dispose().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disposed_session_refuses_further_use() {
    let log = EventLog::new();
    let session = Session::create(SessionConfig::default(), Arc::new(log.clone()))
        .await
        .unwrap();

    session.dispose().await.unwrap();
    assert_eq!(session.state(), SessionState::Disposed);

    assert!(matches!(
        session.gather_candidates().await,
        Err(DemoError::Disposed)
    ));
    assert!(matches!(session.local_sdp().await, Err(DemoError::Disposed)));
    assert!(matches!(
        session.dispose().await,
        Err(DemoError::AlreadyDisposed)
    ));
    assert!(log.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn no_events_after_dispose() {
    let log = EventLog::new();
    let slow = log.clone();
    // Holds each line long enough for dispose to land mid-emit.
    let sink = move |line: String| {
        std::thread::sleep(Duration::from_millis(300));
        slow.append(line);
    };
    let session = Session::create(loopback_config(), Arc::new(sink))
        .await
        .unwrap();
    session.gather_candidates().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.dispose().await.unwrap();

    let at_dispose = log.snapshot();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(log.snapshot(), at_dispose);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_without_dispose_silences_the_session() {
    let log = EventLog::new();
    let session = Session::create(loopback_config(), Arc::new(log.clone()))
        .await
        .unwrap();
    session.gather_candidates().await.unwrap();
    drop(session);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let frozen = log.len();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(log.len(), frozen);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_url_the_engine_rejects_fails_initialization() {
    let mut config = SessionConfig::default();
    config.ice_servers.truncate(1);
    config.ice_servers[0].url = "stun:".into();
    assert!(config.validate().is_ok());

    let log = EventLog::new();
    let result = Session::create(config, Arc::new(log.clone())).await;
    assert!(matches!(result, Err(DemoError::Initialization(_))));
    assert!(log.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_offer_creation_adds_no_lines() {
    let config = SessionConfig::default();
    webrtc_demo_lib::peer::initialize(&config.init);
    let api = build_factory(&config.factory).unwrap();
    let (pc, _events) = new_peer(&api, &config, "closed").await.unwrap();
    pc.close().await.unwrap();

    let log = EventLog::new();
    let outcome = NegotiationObserver::new(Arc::new(log.clone()))
        .run(pc)
        .await;

    assert_eq!(outcome, NegotiationState::Failed);
    assert!(log.is_empty());
}
