#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::post;
use rstest::fixture;
use serde_json::{Value, json};
use tracing::info;

use reddit_client::{Credentials, RedditClient, RedditClientBuilder};

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "s3cret";
pub const APP_ID: &str = "app-id";
pub const APP_SECRET: &str = "app-secret";
pub const TOKEN_PATH: &str = "/api/v1/access_token";

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A request received by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// The canned answer of a route.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Reply {
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::raw(status, body.to_string())
    }

    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn send(self) -> impl IntoResponse {
        tokio::time::sleep(self.delay).await;
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
    }
}

#[derive(Debug)]
struct MockState {
    token_reply: Reply,
    api_reply: Reply,
    token_requests: Vec<RecordedRequest>,
    api_requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    state.lock().expect("mock state poisoned")
}

async fn token_handler(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let reply = {
        let mut state = lock(&state);
        state.token_requests.push(RecordedRequest {
            method,
            uri,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        state.token_reply.clone()
    };
    reply.send().await
}

async fn api_handler(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let reply = {
        let mut state = lock(&state);
        state.api_requests.push(RecordedRequest {
            method,
            uri,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        state.api_reply.clone()
    };
    reply.send().await
}

/// An in-process stand-in for the token endpoint and the API.
#[derive(Debug, Clone)]
pub struct MockReddit {
    addr: SocketAddr,
    state: SharedState,
}

impl MockReddit {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(Mutex::new(MockState {
            token_reply: Reply::json(
                StatusCode::OK,
                &json!({
                    "access_token": "abc123",
                    "token_type": "bearer",
                    "expires_in": 3600,
                    "scope": "*"
                }),
            ),
            api_reply: Reply::json(
                StatusCode::OK,
                &json!({"kind": "t2", "data": {"name": USERNAME}}),
            ),
            token_requests: vec![],
            api_requests: vec![],
        }));

        let app = Router::new()
            .route(TOKEN_PATH, post(token_handler))
            .fallback(api_handler)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        info!(%addr, "launching mock server");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server launched");
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client_builder(&self) -> RedditClientBuilder {
        RedditClient::builder(credentials())
            .with_token_url(format!("{}{TOKEN_PATH}", self.base_url()))
            .with_api_base_url(self.base_url())
    }

    pub fn client(&self) -> RedditClient {
        self.client_builder().build().expect("valid client")
    }

    pub fn set_token_reply(&self, reply: Reply) {
        lock(&self.state).token_reply = reply;
    }

    pub fn set_api_reply(&self, reply: Reply) {
        lock(&self.state).api_reply = reply;
    }

    pub fn token_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).token_requests.clone()
    }

    pub fn api_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).api_requests.clone()
    }

    pub fn last_api_request(&self) -> RecordedRequest {
        self.api_requests()
            .pop()
            .expect("at least one API request")
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(USERNAME, PASSWORD, APP_ID, APP_SECRET)
}

/// An address nobody listens on.
pub async fn closed_address() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

#[fixture]
pub async fn reddit() -> MockReddit {
    init_tracing();
    match MockReddit::start().await {
        Ok(reddit) => reddit,
        Err(error) => {
            panic!("fail to start mock server: {error:?}");
        }
    }
}
