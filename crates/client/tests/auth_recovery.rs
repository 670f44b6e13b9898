mod common;

use std::sync::atomic::Ordering;

use common::{Harness, CURRENT_LOCATION};
use planhaus_client::notify::Notification;
use planhaus_client::{AuthRecovery, ClientError};
use planhaus_core::auth::{login_redirect_path, Credentials, Session, SessionId, SessionUser};
use planhaus_core::cache::session_user_key;
use planhaus_core::projects::Project;

async fn stored_token(h: &Harness) -> Option<SessionId> {
    h.api
        .session_store()
        .load()
        .await
        .unwrap()
        .map(|s| s.session_id)
}

#[tokio::test]
async fn test_demo_login_recovers_rejected_session() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;
    h.api
        .session_store()
        .save(&Session::new("expired", SessionUser::new("u1")))
        .await
        .unwrap();

    let projects: Vec<Project> = h.api.get("/api/projects").await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].total_budget, Some(25_000.0));
    assert_eq!(h.state().demo_logins.load(Ordering::SeqCst), 1);
    assert_eq!(h.state().hits("/api/projects"), 2);
    assert_eq!(stored_token(&h).await, Some(SessionId::new("demo-1")));
    assert!(h.notifier.notifications().is_empty());
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_missing_session_signs_in_as_demo() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;

    let projects: Vec<Project> = h.api.get("/api/projects").await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(stored_token(&h).await, Some(SessionId::new("demo-1")));
}

#[tokio::test]
async fn test_failed_demo_login_expires_session() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;
    h.state().demo_enabled.store(false, Ordering::SeqCst);
    h.api
        .session_store()
        .save(&Session::new("expired", SessionUser::new("u1")))
        .await
        .unwrap();

    let result = h.api.get::<Vec<Project>>("/api/projects").await;

    assert_eq!(result, Err(ClientError::SessionExpired));
    assert_eq!(stored_token(&h).await, None);
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::error("Session expired", "Please log in again.")]
    );
    assert_eq!(
        h.navigator.redirects(),
        vec![login_redirect_path(CURRENT_LOCATION)]
    );
    assert!(h.navigator.redirects()[0].starts_with("/login?returnTo=%2Fprojects"));
}

#[tokio::test]
async fn test_rejected_retry_does_not_loop() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;
    h.state().reject_all.store(true, Ordering::SeqCst);

    let result = h.api.get::<Vec<Project>>("/api/projects").await;

    assert_eq!(result, Err(ClientError::SessionExpired));
    assert_eq!(h.state().demo_logins.load(Ordering::SeqCst), 1);
    assert_eq!(h.state().hits("/api/projects"), 2);
    assert_eq!(stored_token(&h).await, None);
    assert_eq!(h.navigator.redirects().len(), 1);
}

#[tokio::test]
async fn test_disabled_recovery_expires_immediately() {
    let h = Harness::start(AuthRecovery::Disabled).await;

    let result = h.api.get::<Vec<Project>>("/api/projects").await;

    assert_eq!(result, Err(ClientError::SessionExpired));
    assert_eq!(h.state().demo_logins.load(Ordering::SeqCst), 0);
    assert_eq!(h.navigator.redirects().len(), 1);
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_demo_login() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;

    let (a, b, c) = tokio::join!(
        h.api.get::<Vec<Project>>("/api/projects"),
        h.api.get::<Vec<Project>>("/api/projects"),
        h.api.get::<Vec<Project>>("/api/projects"),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(h.state().demo_logins.load(Ordering::SeqCst), 1);
    assert!(!h.api.is_recovering());
}

#[tokio::test]
async fn test_wrong_password_is_not_a_session_expiry() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;

    let result = h
        .api
        .login(&Credentials {
            username: "ana".into(),
            password: "wrong".into(),
        })
        .await;

    assert_eq!(
        result,
        Err(ClientError::Api {
            status: 401,
            message: "Invalid username or password".into(),
        })
    );
    assert_eq!(h.state().demo_logins.load(Ordering::SeqCst), 0);
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_blank_credentials_are_rejected_locally() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;

    let result = h
        .api
        .login(&Credentials {
            username: "  ".into(),
            password: "secret".into(),
        })
        .await;

    assert!(matches!(
        result,
        Err(ClientError::Validation {
            field: "username",
            ..
        })
    ));
}

#[tokio::test]
async fn test_login_seeds_user_and_logout_forgets_everything() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;
    let auth = h.planner.auth();

    let session = auth
        .login(&Credentials {
            username: "ana".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(stored_token(&h).await, Some(session.session_id.clone()));
    let cached = h
        .planner
        .cache()
        .get_query_data::<SessionUser>(&session_user_key());
    assert_eq!(cached.as_deref(), Some(&session.user));

    h.planner.projects().load().await.unwrap();
    assert!(!h.planner.cache().is_empty());

    auth.logout().await.unwrap();
    assert_eq!(stored_token(&h).await, None);
    assert!(h.planner.cache().is_empty());
}

#[tokio::test]
async fn test_failed_retry_after_demo_login_expires_but_keeps_new_session() {
    let h = Harness::start(AuthRecovery::DemoLogin).await;
    h.api
        .session_store()
        .save(&Session::new("expired", SessionUser::new("u1")))
        .await
        .unwrap();

    // Answers 404 once authorized.
    let path = format!("/api/projects/{}/tasks", uuid::Uuid::nil());
    let result = h.api.get::<serde_json::Value>(&path).await;

    assert_eq!(result, Err(ClientError::SessionExpired));
    assert_eq!(h.state().demo_logins.load(Ordering::SeqCst), 1);
    assert_eq!(stored_token(&h).await, Some(SessionId::new("demo-1")));
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::error("Session expired", "Please log in again.")]
    );
    assert_eq!(
        h.navigator.redirects(),
        vec![login_redirect_path(CURRENT_LOCATION)]
    );
}
