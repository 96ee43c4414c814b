// tests/test_helpers.rs
#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU16, Ordering},
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use shadowme::{
    api::http_router,
    auth::SqliteAuth,
    llm::{CompletionSettings, GatewayClient},
    orchestrator::Orchestrator,
    state::AppState,
    store::{
        SqliteStore,
        db::{create_memory_pool, run_migrations},
    },
};

/// Fake chat-completions endpoint. Answers "Hi there!" while its status is
/// 200, otherwise fails with the configured status. Every body is recorded.
#[derive(Clone, Default)]
pub struct MockGateway {
    requests: Arc<Mutex<Vec<Value>>>,
    status: Arc<AtomicU16>,
}

impl MockGateway {
    pub fn fail_with(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// `messages` of the most recent gateway call
    pub fn last_messages(&self) -> Vec<Value> {
        self.requests()
            .last()
            .and_then(|body| body["messages"].as_array().cloned())
            .unwrap_or_default()
    }
}

async fn completion(State(mock): State<MockGateway>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    mock.requests.lock().unwrap().push(body);
    match mock.status.load(Ordering::SeqCst) {
        200 => (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"role": "assistant", "content": "Hi there!"}}]})),
        ),
        status => (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"error": "upstream says no"})),
        ),
    }
}

async fn spawn_gateway() -> (MockGateway, String) {
    let mock = MockGateway::default();
    mock.fail_with(200);

    let app = Router::new()
        .route("/v1/chat/completions", post(completion))
        .with_state(mock.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (mock, format!("http://{addr}/v1/chat/completions"))
}

pub struct TestApp {
    pub router: Router,
    pub gateway: MockGateway,
    pub auth: SqliteAuth,
    pub pool: SqlitePool,
    pub token: String,
}

/// Router over an in-memory database with one signed-up user
pub async fn create_test_app() -> TestApp {
    let pool = create_memory_pool().await.expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");

    let auth = SqliteAuth::new(pool.clone());
    let user = auth.create_user("me@example.com").await.unwrap();
    let token = auth.issue_token(&user.id).await.unwrap();

    let (gateway, url) = spawn_gateway().await;
    let client = GatewayClient::new(
        url,
        "test-key",
        CompletionSettings::default(),
        Duration::from_secs(5),
        Duration::from_secs(2),
    )
    .unwrap();

    let orchestrator = Orchestrator::new(
        Arc::new(SqliteStore::new(pool.clone())),
        Arc::new(auth.clone()),
        Arc::new(client),
    );
    let router = http_router(Arc::new(AppState::new(orchestrator, "test-model")));

    TestApp {
        router,
        gateway,
        auth,
        pool,
        token,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Request authenticated as the seeded user
    pub async fn authed(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(method, uri, Some(&self.token), body).await
    }

    pub async fn new_conversation(&self, mirror_mode: bool) -> String {
        let (status, body) = self
            .authed("POST", "/conversations", Some(json!({"mirrorMode": mirror_mode})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}
