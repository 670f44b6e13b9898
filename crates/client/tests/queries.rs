mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{fast_retry, Harness};
use planhaus_client::notify::Notification;
use planhaus_client::query::{QueryCache, QueryOptions, QueryStatus};
use planhaus_client::{AuthRecovery, ClientError, Planner};
use planhaus_core::budget::NewBudgetItem;
use planhaus_core::cache::{budget_key, dashboard_key};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn project() -> Uuid {
    Uuid::nil()
}

fn new_item(category: &str, description: &str) -> NewBudgetItem {
    NewBudgetItem {
        category: category.to_string(),
        description: description.to_string(),
        estimated_cost: 4_500.0,
        actual_cost: None,
        is_paid: false,
        vendor: None,
        notes: None,
    }
}

async fn signed_in() -> Harness {
    let h = Harness::start(AuthRecovery::DemoLogin).await;
    h.api.demo_login().await.unwrap();
    h
}

#[tokio::test]
async fn test_client_error_notifies_with_server_message() {
    let h = signed_in().await;

    let result = h.planner.tasks(project()).load().await;

    assert_eq!(
        result,
        Err(ClientError::Api {
            status: 404,
            message: "Timeline not found".into(),
        })
    );
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::error("Error", "Timeline not found")]
    );
}

#[tokio::test]
async fn test_null_body_is_invalid_response() {
    let h = signed_in().await;

    let result = h.planner.guests(project()).load().await;

    assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    let snapshot = h.planner.guests(project()).snapshot();
    assert!(snapshot.data.is_none());
    assert!(matches!(snapshot.error, Some(ClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let h = signed_in().await;
    h.state().dashboard_failures.store(2, Ordering::SeqCst);

    let stats = h.planner.dashboard(project()).load().await.unwrap();

    assert_eq!(stats.total_spent, 1200.5);
    assert_eq!(stats.days_until_wedding, Some(120));
    assert_eq!(h.state().hits("dashboard"), 3);
    let state = h
        .planner
        .cache()
        .query_state(&dashboard_key(project()))
        .unwrap();
    assert_eq!(state.status, QueryStatus::Success);
    assert_eq!(state.retry_count, 0);
}

#[tokio::test]
async fn test_retry_budget_is_bounded() {
    let h = signed_in().await;
    h.state().dashboard_failures.store(10, Ordering::SeqCst);

    let result = h.planner.dashboard(project()).load().await;

    assert!(matches!(result, Err(ClientError::Api { status: 502, .. })));
    assert_eq!(h.state().hits("dashboard"), 3);
    // 5xx responses are not shown to the user.
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_concurrent_reads_share_one_fetch() {
    let h = signed_in().await;
    let budget = h.planner.budget(project());

    let (a, b, c) = tokio::join!(budget.load(), budget.load(), budget.load());

    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
    assert!(Arc::ptr_eq(&a, &b) && Arc::ptr_eq(&b, &c));
    assert_eq!(h.state().hits("budget"), 1);
}

#[tokio::test]
async fn test_mutation_invalidates_and_refetches() {
    let h = signed_in().await;
    let options = QueryOptions::default()
        .with_stale_time(Duration::from_secs(60))
        .with_retry(fast_retry());
    let planner = Planner::new(h.api.clone(), QueryCache::new(100, options));
    let budget = planner.budget(project());

    assert!(budget.load().await.unwrap().is_empty());
    assert!(budget.load().await.unwrap().is_empty());
    assert_eq!(h.state().hits("budget"), 1);

    let created = budget
        .create(&new_item("  Venue ", "Barn   deposit"))
        .await
        .unwrap();
    assert_eq!(created.category, "Venue");
    assert_eq!(created.description, "Barn deposit");
    assert!(!planner.is_pending());
    assert!(planner
        .cache()
        .query_state(&budget_key(project()))
        .unwrap()
        .is_stale);

    let items = budget.load().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(h.state().hits("budget"), 2);
}

#[tokio::test]
async fn test_invalid_input_is_never_sent() {
    let h = signed_in().await;

    let result = h
        .planner
        .budget(project())
        .create(&new_item("Venue", "   "))
        .await;

    assert!(matches!(
        result,
        Err(ClientError::Validation {
            field: "description",
            ..
        })
    ));
    assert_eq!(h.state().budget_len(), 0);
}

#[tokio::test]
async fn test_prefetch_warms_the_cache() {
    let h = signed_in().await;
    let budget = h.planner.budget(project());

    budget.prefetch().await.unwrap();

    assert_eq!(budget.snapshot().data.map(|d| d.len()), Some(0));
    assert_eq!(h.state().hits("budget"), 1);
}

#[tokio::test]
async fn test_projects_decode_string_amounts() {
    let h = signed_in().await;

    let projects = h.planner.projects().load().await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Spring wedding");
    assert_eq!(projects[0].total_budget, Some(25_000.0));
    assert_eq!(
        projects[0].wedding_date,
        chrono::NaiveDate::from_ymd_opt(2027, 5, 1)
    );
}

#[tokio::test]
async fn test_cancelled_read_leaves_entry_idle() {
    let h = signed_in().await;
    let budget = h.planner.budget(project());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let result = budget.load_with_cancel(&cancel).await;

    assert_eq!(result, Err(ClientError::Cancelled));
    let state = h
        .planner
        .cache()
        .query_state(&budget_key(project()))
        .unwrap();
    assert!(!state.is_fetching);
    assert_eq!(state.status, QueryStatus::Idle);
    assert!(!budget.snapshot().is_loading);

    // A later read starts a fresh fetch.
    assert!(budget.load().await.unwrap().is_empty());
    assert!(!h.planner.cache().query_state(&budget_key(project())).unwrap().is_fetching);
}

#[tokio::test]
async fn test_cancellable_project_read_completes_when_not_cancelled() {
    let h = signed_in().await;
    let cancel = CancellationToken::new();

    let projects = h.planner.projects().load_with_cancel(&cancel).await.unwrap();

    assert_eq!(projects.len(), 1);
    assert!(!cancel.is_cancelled());
}

#[tokio::test]
async fn test_read_with_cancelled_token_fails_fast() {
    let h = signed_in().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = h.planner.projects().get_with_cancel(project(), &cancel).await;

    assert_eq!(result, Err(ClientError::Cancelled));
}
