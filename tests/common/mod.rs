#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use linklab::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Canned answer for one link id.
#[derive(Clone)]
pub enum FakeReply {
    Json(Value),
    Status(u16),
    Empty,
    Raw(String),
}

/// One request seen by the fake API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub link_id: String,
    pub domain: Option<String>,
}

/// Raw request line and headers of one request.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    pub path: String,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Default)]
struct FakeState {
    replies: Mutex<HashMap<String, FakeReply>>,
    hits: Mutex<Vec<Hit>>,
    wire: Mutex<Vec<Wire>>,
}

/// In-process LinkLab API serving `GET /api/links/{id}`.
///
/// Unknown ids answer 404.
pub struct FakeLinkLabApi {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeLinkLabApi {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/api/links/{id}", get(lookup))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    pub fn reply(&self, link_id: &str, reply: FakeReply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(link_id.to_string(), reply);
    }

    /// Serves a minimal valid link body for `link_id`.
    pub fn link(&self, link_id: &str, full_link: &str) {
        self.reply(link_id, FakeReply::Json(link_body(link_id, full_link)));
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    pub fn wire(&self) -> Vec<Wire> {
        self.state.wire.lock().unwrap().clone()
    }

    pub fn config(&self) -> Config {
        Config::default().with_api_base_url(&self.base_url)
    }
}

async fn lookup(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.wire.lock().unwrap().push(Wire {
        path: uri.path().to_string(),
        accept: header_value(header::ACCEPT),
        user_agent: header_value(header::USER_AGENT),
    });
    state.hits.lock().unwrap().push(Hit {
        link_id: id.clone(),
        domain: query.get("domain").cloned(),
    });

    let reply = state.replies.lock().unwrap().get(&id).cloned();
    match reply {
        Some(FakeReply::Json(body)) => (StatusCode::OK, Json(body)).into_response(),
        Some(FakeReply::Status(code)) => StatusCode::from_u16(code).unwrap().into_response(),
        Some(FakeReply::Empty) => StatusCode::OK.into_response(),
        Some(FakeReply::Raw(body)) => (StatusCode::OK, body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn link_body(link_id: &str, full_link: &str) -> Value {
    json!({
        "id": link_id,
        "fullLink": full_link,
        "userId": "user-1",
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-02T10:00:00.000Z",
        "domainType": "linklab",
        "domain": "linklab.cc"
    })
}

/// Base URL with nothing listening on it.
pub fn unreachable_config() -> Config {
    Config::default()
        .with_api_base_url("http://127.0.0.1:1/api")
        .with_timeout_secs(2)
}

/// Listener that forwards every result into a channel.
pub fn channel_listener() -> (Arc<dyn LinkListener>, mpsc::UnboundedReceiver<LinkResult>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener: Arc<dyn LinkListener> = Arc::new(move |result: &LinkResult| {
        let _ = tx.send(result.clone());
    });
    (listener, rx)
}

/// Collects every result delivered so far.
///
/// Resolves a foreign URI first and waits for it, so everything queued
/// before the call has been dispatched.
pub async fn drain(linklab: &LinkLab, rx: &mut mpsc::UnboundedReceiver<LinkResult>) -> Vec<LinkResult> {
    linklab.resolve("https://flush.invalid/").wait().await;
    let mut results = Vec::new();
    while let Ok(result) = rx.try_recv() {
        results.push(result);
    }
    let flush = results.pop();
    assert_eq!(
        flush.and_then(|r| r.link().map(|l| l.full_link().to_string())),
        Some("https://flush.invalid/".to_string())
    );
    results
}
