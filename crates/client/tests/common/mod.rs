//! In-process planhaus API used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use planhaus_client::http::ApiClient;
use planhaus_client::notify::{RecordingNotifier, StaticNavigator};
use planhaus_client::query::{QueryCache, QueryOptions, RetryPolicy};
use planhaus_client::session::MemorySessionStore;
use planhaus_client::{AuthRecovery, Planner};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Location the fake navigator reports.
pub const CURRENT_LOCATION: &str = "/projects/budget?tab=items";

#[derive(Default)]
pub struct MockState {
    tokens: Mutex<HashSet<String>>,
    pub demo_enabled: AtomicBool,
    pub demo_logins: AtomicUsize,
    /// Reject even freshly issued tokens.
    pub reject_all: AtomicBool,
    hits: Mutex<HashMap<String, usize>>,
    budget: Mutex<Vec<Value>>,
    /// Failures left before the dashboard answers.
    pub dashboard_failures: AtomicUsize,
    pub last_upload: Mutex<Option<(String, String, usize)>>,
}

impl MockState {
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn budget_len(&self) -> usize {
        self.budget.lock().unwrap().len()
    }

    pub fn issue_token(&self, token: &str) {
        self.tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn revoke_all(&self) {
        self.tokens.lock().unwrap().clear();
    }

    fn hit(&self, path: &str) {
        *self.hits.lock().unwrap().entry(path.to_string()).or_default() += 1;
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        if self.reject_all.load(Ordering::SeqCst) {
            return false;
        }
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| self.tokens.lock().unwrap().contains(token))
    }
}

type Shared = Arc<MockState>;

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

fn session_json(token: &str) -> Value {
    json!({
        "sessionId": token,
        "user": { "id": "demo-user", "name": "Demo Couple", "hasCompletedIntake": true }
    })
}

async fn demo_login(State(state): State<Shared>) -> Response {
    let n = state.demo_logins.fetch_add(1, Ordering::SeqCst) + 1;
    if !state.demo_enabled.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Demo mode is off" })),
        )
            .into_response();
    }
    let token = format!("demo-{}", n);
    state.issue_token(&token);
    Json(session_json(&token)).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid username or password" })),
        )
            .into_response();
    }
    let token = format!("user-{}", Uuid::new_v4());
    state.issue_token(&token);
    Json(session_json(&token)).into_response()
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(session_json("")["user"].clone()).into_response()
}

async fn projects(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.hit("/api/projects");
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        { "id": Uuid::nil(), "name": "Spring wedding", "weddingDate": "2027-05-01", "totalBudget": "25000" }
    ]))
    .into_response()
}

async fn list_budget(
    State(state): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    state.hit("budget");
    if !state.authorized(&headers) {
        return unauthorized();
    }
    // Slow enough for concurrent readers to overlap.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let items: Vec<Value> = state
        .budget
        .lock()
        .unwrap()
        .iter()
        .filter(|i| i["projectId"] == json!(id))
        .cloned()
        .collect();
    Json(items).into_response()
}

async fn create_budget(
    State(state): State<Shared>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if body["category"] == "" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Category is required" })),
        )
            .into_response();
    }
    let mut item = body.clone();
    item["id"] = json!(Uuid::new_v4());
    item["projectId"] = json!(id);
    state.budget.lock().unwrap().push(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn guests(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, [("content-type", "application/json")], "null").into_response()
}

async fn tasks(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Timeline not found" })),
    )
        .into_response()
}

async fn dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.hit("dashboard");
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let left = state.dashboard_failures.load(Ordering::SeqCst);
    if left > 0 {
        state.dashboard_failures.store(left - 1, Ordering::SeqCst);
        return (StatusCode::BAD_GATEWAY, "upstream hiccup").into_response();
    }
    Json(json!({
        "totalBudget": 25000, "totalSpent": "1200.5", "totalGuests": 80,
        "confirmedGuests": 40, "totalTasks": 10, "completedTasks": 4,
        "totalVendors": 6, "bookedVendors": 2, "daysUntilWedding": 120
    }))
    .into_response()
}

async fn analyze(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let mime = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default();
        if name.contains("slow") {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        let analysis = format!("{} ({}, {} bytes)", name, mime, bytes.len());
        *state.last_upload.lock().unwrap() = Some((name, mime, bytes.len()));
        return Json(json!({ "analysis": analysis })).into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "No file uploaded" })),
    )
        .into_response()
}

/// A running mock server.
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl MockServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(MockState::default());
        state.demo_enabled.store(true, Ordering::SeqCst);

        let app = Router::new()
            .route("/api/auth/demo-login", post(demo_login))
            .route("/api/auth/login", post(login))
            .route("/api/auth/user", get(current_user))
            .route("/api/projects", get(projects))
            .route(
                "/api/projects/{id}/budget",
                get(list_budget).post(create_budget),
            )
            .route("/api/projects/{id}/guests", get(guests))
            .route("/api/projects/{id}/tasks", get(tasks))
            .route("/api/projects/{id}/dashboard", get(dashboard))
            .route("/api/documents/analyze", post(analyze))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Client wired to the mock server with recording seams.
pub struct Harness {
    pub server: MockServer,
    pub api: ApiClient,
    pub planner: Planner,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<StaticNavigator>,
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        retries: 2,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
    }
}

impl Harness {
    pub async fn start(recovery: AuthRecovery) -> Self {
        let server = MockServer::start().await;
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(StaticNavigator::new(CURRENT_LOCATION));
        let api = ApiClient::builder(server.url())
            .session_store(Arc::new(MemorySessionStore::new()))
            .notifier(notifier.clone())
            .navigator(navigator.clone())
            .recovery(recovery)
            .build()
            .unwrap();
        let cache = QueryCache::new(100, QueryOptions::default().with_retry(fast_retry()));
        let planner = Planner::new(api.clone(), cache);
        Self {
            server,
            api,
            planner,
            notifier,
            navigator,
        }
    }

    pub fn state(&self) -> &MockState {
        &self.server.state
    }
}
