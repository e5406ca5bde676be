//! Presence poller integration tests (paused tokio time).

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use common::{ScriptedRoster, online, wait_until};
use lectern_api::ServiceError;
use lectern_session::{DemoRosterSource, PresencePoller, RosterSource};

fn poller(source: &Arc<ScriptedRoster>) -> PresencePoller {
    PresencePoller::new(Arc::clone(source) as Arc<dyn RosterSource>)
}

#[tokio::test(start_paused = true)]
async fn cycle_replaces_roster_and_keeps_join_time() {
    let source = Arc::new(ScriptedRoster::new([
        Ok(vec![online("a"), online("b")]),
        Ok(vec![online("a")]),
    ]));
    let poller = poller(&source);
    let mut rx = poller.subscribe();
    poller.start("lec-1", Duration::from_secs(10));

    let first = rx.wait_for(|view| view.cycle >= 1).await.unwrap().clone();
    assert_eq!(first.attendees.len(), 2);
    let joined_a = first.attendees[0].joined_at;
    assert!(joined_a.is_some());

    let second = rx.wait_for(|view| view.cycle >= 2).await.unwrap().clone();
    assert_eq!(second.attendees.len(), 1);
    assert_eq!(second.attendees[0].id, "a");
    assert_eq!(second.attendees[0].joined_at, joined_a);
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn no_second_fetch_while_first_is_pending() {
    let source = Arc::new(ScriptedRoster::new([Ok(vec![online("a")])]).gated(1));
    let poller = poller(&source);
    let mut rx = poller.subscribe();
    poller.start("lec-1", Duration::from_secs(1));

    wait_until(|| source.calls() == 1).await;
    assert!(poller.is_fetching());
    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(source.calls(), 1);

    source.release();
    rx.wait_for(|view| view.cycle >= 2).await.unwrap();
    assert_eq!(source.max_in_flight(), 1);
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn failed_cycle_keeps_roster_and_flags_error_once() {
    let source = Arc::new(ScriptedRoster::new([
        Ok(vec![online("a")]),
        Err(ServiceError::Unavailable {
            status: 503,
            message: "maintenance".into(),
        }),
        Ok(vec![online("a")]),
    ]));
    let poller = poller(&source);
    let mut rx = poller.subscribe();
    poller.start("lec-1", Duration::from_secs(10));

    let failed = rx.wait_for(|view| view.cycle >= 2).await.unwrap().clone();
    assert_eq!(failed.attendees.len(), 1);
    assert_eq!(
        failed.last_error.as_deref(),
        Some("backend error (503): maintenance")
    );

    let recovered = rx.wait_for(|view| view.cycle >= 3).await.unwrap().clone();
    assert!(recovered.last_error.is_none());
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn result_after_stop_is_discarded() {
    let source = Arc::new(ScriptedRoster::new([Ok(vec![online("a")])]).gated(1));
    let poller = poller(&source);
    poller.start("lec-1", Duration::from_secs(1));

    wait_until(|| source.calls() == 1).await;
    poller.stop();
    source.release();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tokio::time::advance(Duration::from_secs(5)).await;

    assert_eq!(poller.roster().cycle, 0);
    assert!(poller.roster().attendees.is_empty());
    assert_eq!(source.calls(), 1);
    assert!(!poller.is_running());
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn refresh_now_is_skipped_while_fetching() {
    let source = Arc::new(
        ScriptedRoster::new([Ok(vec![online("a")]), Ok(vec![online("b")])]).gated(1),
    );
    let poller = poller(&source);
    let mut rx = poller.subscribe();
    poller.start("lec-1", Duration::from_secs(60));

    wait_until(|| source.calls() == 1).await;
    assert!(!poller.refresh_now());

    source.release();
    rx.wait_for(|view| view.cycle >= 1).await.unwrap();

    let before = tokio::time::Instant::now();
    assert!(poller.refresh_now());
    let view = rx.wait_for(|view| view.cycle >= 2).await.unwrap().clone();
    assert!(before.elapsed() < Duration::from_secs(60));
    assert_eq!(view.attendees[0].id, "b");
    assert_eq!(source.calls(), 2);
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn restart_mid_fetch_keeps_new_loop_marked_fetching() {
    let source = Arc::new(ScriptedRoster::new([Ok(vec![online("b")])]).gated(2));
    let poller = poller(&source);
    let mut rx = poller.subscribe();
    poller.start("lec-1", Duration::from_secs(60));
    wait_until(|| source.calls() == 1).await;

    poller.start("lec-2", Duration::from_secs(60));
    wait_until(|| source.calls() == 2).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(poller.is_fetching());
    assert!(!poller.refresh_now());

    source.release();
    let view = rx.wait_for(|view| view.cycle >= 1).await.unwrap().clone();
    assert_eq!(view.attendees[0].id, "b");
    assert!(!poller.is_fetching());
    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn demo_source_is_an_explicit_roster() {
    let poller = PresencePoller::new(Arc::new(DemoRosterSource::new()));
    let mut rx = poller.subscribe();
    poller.start("lec-demo", Duration::from_secs(10));

    let first = rx.wait_for(|view| view.cycle >= 1).await.unwrap().clone();
    let third = rx.wait_for(|view| view.cycle >= 3).await.unwrap().clone();
    assert_eq!(third.attendees.len() + 1, first.attendees.len());
    assert!(third.last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_stops_it() {
    let source = Arc::new(ScriptedRoster::new([]));
    let poller = poller(&source);
    poller.start("lec-1", Duration::from_secs(1));
    wait_until(|| source.calls() == 1).await;
    drop(poller);

    tokio::time::advance(Duration::from_secs(10)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(source.calls(), 1);
}
