//! Throwaway analysis service for tests.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct StubReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl StubReply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    // Served in order; the last one repeats.
    replies: Arc<Vec<StubReply>>,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub(crate) struct Stub {
    pub base_url: String,
    state: StubState,
}

impl Stub {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}

async fn analyze(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    state
        .seen
        .lock()
        .unwrap()
        .push(SeenRequest { content_type, body });

    let reply = state
        .replies
        .get(n)
        .or_else(|| state.replies.last())
        .cloned()
        .expect("stub configured without replies");
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

/// Start a stub service on an ephemeral port.
pub(crate) async fn spawn_stub(replies: Vec<StubReply>) -> Stub {
    let state = StubState {
        replies: Arc::new(replies),
        hits: Arc::new(AtomicUsize::new(0)),
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/analyze", post(analyze))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        base_url: format!("http://{addr}"),
        state,
    }
}

pub(crate) fn sample_body(facts: &[&str]) -> Value {
    json!({
        "profile_url": "https://www.linkedin.com/in/john-smith",
        "insights": {
            "professional_summary": "Staff engineer working on search at Google.",
            "personal_background": "Grew up in Oslo and studied in Zurich.",
            "interesting_facts": facts,
        }
    })
}
