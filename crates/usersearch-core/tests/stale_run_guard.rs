mod support;

use std::sync::Arc;
use std::time::Duration;

use usersearch_core::models::CoreErrorKind;
use usersearch_core::orchestration::{RunOutcome, SharedSearchState};

use support::{FakeDirectory, controller, orchestrator, wait_for_snapshot};

#[tokio::test]
async fn slow_superseded_run_does_not_overwrite_newer_results() {
    let fake = Arc::new(
        FakeDirectory::new()
            .search("octo", &["octo-org"])
            .user("octo-org", 10)
            .user_delay("octo-org", Duration::from_millis(400))
            .search("octocat", &["octocat"])
            .user("octocat", 5000),
    );
    let controller = controller(&fake, Duration::from_millis(50));

    controller.on_query_changed("octo").await;
    // Let the first run start, then move on before it completes.
    tokio::time::sleep(Duration::from_millis(150)).await;
    controller.on_query_changed("octocat").await;

    let snapshot = wait_for_snapshot(&controller, Duration::from_secs(2), |snapshot| {
        !snapshot.results.is_empty()
    })
    .await;
    assert_eq!(snapshot.results[0].login, "octocat");

    // Wait for the slow run to land.
    wait_for_snapshot(&controller, Duration::from_secs(2), |snapshot| !snapshot.loading).await;
    let snapshot = controller.snapshot().await;

    assert_eq!(fake.search_queries(), vec!["octo".to_string(), "octocat".to_string()]);
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].login, "octocat");
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn superseded_run_reports_superseded_and_keeps_loading_accurate() {
    let fake = Arc::new(
        FakeDirectory::new()
            .search("old", &["old-user"])
            .user("old-user", 1)
            .user_delay("old-user", Duration::from_millis(200)),
    );
    let state = SharedSearchState::new();
    state.set_query("old").await;

    let run_state = state.clone();
    let run_orchestrator = orchestrator(&fake);
    let run = tokio::spawn(async move { run_orchestrator.run_search(&run_state, "old").await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    state.set_query("new").await;
    assert!(state.is_loading().await);

    let outcome = run.await.unwrap().unwrap();
    assert_eq!(outcome, RunOutcome::Superseded);

    let snapshot = state.snapshot().await;
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.loading);
    assert!(snapshot.last_completed_run.is_none());
}

#[tokio::test]
async fn superseded_failure_is_logged_but_not_surfaced() {
    let fake = Arc::new(
        FakeDirectory::new()
            .search("old", &["old-user"])
            .user_transport_failure("old-user", CoreErrorKind::Network)
            .user_delay("old-user", Duration::from_millis(200)),
    );
    let state = SharedSearchState::new();
    state.set_query("old").await;

    let run_state = state.clone();
    let run_orchestrator = orchestrator(&fake);
    let run = tokio::spawn(async move { run_orchestrator.run_search(&run_state, "old").await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    state.set_query("").await;

    let error = run.await.unwrap().unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::Network);
    assert!(state.snapshot().await.notification.is_none());
}
