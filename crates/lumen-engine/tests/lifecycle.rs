use std::sync::Arc;
use std::time::Duration;

use lumen_core::{LumenError, SessionId};
use lumen_engine::{EngineConfig, SessionManager, SessionRequest, SessionStatus};
use tokio::time::sleep;

fn manager() -> SessionManager {
    SessionManager::new(EngineConfig::default())
}

#[tokio::test(start_paused = true)]
async fn generic_session_runs_completes_and_is_reaped() {
    let manager = manager();
    let ticket = manager
        .start_session(
            SessionRequest::generic("I am calm")
                .with_duration(2)
                .with_frequency(10.0),
        )
        .unwrap();
    let id = ticket.session_id;

    sleep(Duration::from_millis(500)).await;
    let record = manager.status(&id).unwrap();
    assert_eq!(record.status(), SessionStatus::Running);
    assert!(record.remaining_seconds < 2);
    assert!(record.progress.iterations > 0);
    assert!(record.progress.last_pulse.is_some());
    assert!(record.progress.fields.contains_key("activationKey"));

    sleep(Duration::from_millis(2_600)).await;
    let record = manager.status(&id).unwrap();
    assert_eq!(record.status(), SessionStatus::Completed);
    assert_eq!(record.remaining_seconds, 0);
    assert_eq!(manager.active_count(), 0);

    sleep(Duration::from_secs(302)).await;
    assert!(manager.status(&id).is_none());
}

#[tokio::test(start_paused = true)]
async fn remaining_never_increases_and_freezes_after_completion() {
    let manager = manager();
    let id = manager
        .start_session(SessionRequest::scalar("steady").with_duration(3).with_frequency(4.0))
        .unwrap()
        .session_id;

    let mut last = u64::MAX;
    loop {
        sleep(Duration::from_millis(125)).await;
        let record = manager.status(&id).unwrap();
        assert!(record.remaining_seconds <= last);
        last = record.remaining_seconds;
        if record.is_terminal() {
            break;
        }
    }

    let frozen = manager.status(&id).unwrap();
    sleep(Duration::from_secs(5)).await;
    let later = manager.status(&id).unwrap();
    assert_eq!(later.status(), SessionStatus::Completed);
    assert_eq!(later.progress, frozen.progress);
    assert_eq!(later.remaining_seconds, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stops_succeed_exactly_once() {
    let manager = Arc::new(manager());
    let id = manager
        .start_session(SessionRequest::generic("hold").with_duration(60).with_frequency(10.0))
        .unwrap()
        .session_id;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let id = id.clone();
            tokio::spawn(async move { manager.stop(&id) })
        })
        .collect();

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(manager.status(&id).unwrap().status(), SessionStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn stopped_session_visible_during_grace_period() {
    let manager = manager();
    let id = manager
        .start_session(SessionRequest::blessing())
        .unwrap()
        .session_id;

    sleep(Duration::from_secs(1)).await;
    assert!(manager.stop(&id));
    assert!(!manager.stop(&id));

    sleep(Duration::from_secs(299)).await;
    let record = manager.status(&id).unwrap();
    assert_eq!(record.status(), SessionStatus::Stopped);

    sleep(Duration::from_secs(2)).await;
    assert!(manager.status(&id).is_none());
}

#[tokio::test(start_paused = true)]
async fn stopped_session_receives_no_further_writes() {
    let manager = manager();
    let id = manager
        .start_session(SessionRequest::past_life())
        .unwrap()
        .session_id;

    sleep(Duration::from_secs(2)).await;
    assert!(manager.stop(&id));
    let at_stop = manager.status(&id).unwrap();

    sleep(Duration::from_secs(3)).await;
    let later = manager.status(&id).unwrap();
    assert_eq!(later.progress, at_stop.progress);
    assert_eq!(later.remaining_seconds, at_stop.remaining_seconds);
}

#[tokio::test]
async fn empty_seeds_never_create_sessions() {
    let manager = manager();
    for request in [
        SessionRequest::generic(""),
        SessionRequest::scalar(" \t "),
        SessionRequest::harmonization(""),
    ] {
        let err = manager.start_session(request).unwrap_err();
        assert!(matches!(err, LumenError::InvalidInput(_)));
    }
    assert!(manager.registry().is_empty());
}

#[tokio::test(start_paused = true)]
async fn admission_limit_rejects_then_recovers() {
    let config = EngineConfig {
        max_active_sessions: 2,
        ..EngineConfig::default()
    };
    let manager = SessionManager::new(config);

    let first = manager
        .start_session(SessionRequest::generic("one").with_duration(30))
        .unwrap()
        .session_id;
    let _ = manager
        .start_session(SessionRequest::generic("two").with_duration(30))
        .unwrap();

    let err = manager
        .start_session(SessionRequest::generic("three"))
        .unwrap_err();
    assert_eq!(err, LumenError::CapacityExceeded { active: 2, limit: 2 });

    assert!(manager.stop(&first));
    sleep(Duration::from_millis(10)).await;
    assert!(manager
        .start_session(SessionRequest::generic("three").with_duration(30))
        .is_ok());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let manager = manager();
    let id = SessionId::from_raw("does-not-exist");
    assert!(manager.status(&id).is_none());
    assert!(!manager.stop(&id));
}

#[tokio::test(start_paused = true)]
async fn fixed_kinds_report_their_own_schedule() {
    let manager = manager();
    let id = manager
        .start_session(SessionRequest::auto_resonance("i feel lost"))
        .unwrap()
        .session_id;

    sleep(Duration::from_secs(1)).await;
    let record = manager.status(&id).unwrap();
    assert_eq!(record.duration_seconds, 150);
    assert!((record.frequency - 7.83).abs() < f64::EPSILON);
    assert!(record.progress.fields.contains_key("centerActivation"));
}
