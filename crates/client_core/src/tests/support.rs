//! In-process stand-ins for the upload and query endpoints.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::Mutex};
use url::Url;

#[derive(Debug, Clone)]
pub(crate) struct ReceivedUpload {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub(crate) struct StubState {
    pub uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    pub queries: Arc<Mutex<Vec<Value>>>,
    upload_reply: (StatusCode, Value),
    query_reply: (StatusCode, Value),
}

pub(crate) struct StubServer {
    pub base_url: String,
    pub state: StubState,
}

impl StubServer {
    pub fn upload_url(&self) -> Url {
        Url::parse(&format!("{}/upload", self.base_url)).expect("upload url")
    }

    pub fn query_url(&self) -> Url {
        Url::parse(&format!("{}/query", self.base_url)).expect("query url")
    }

    pub async fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.uploads.lock().await.clone()
    }

    pub async fn queries(&self) -> Vec<Value> {
        self.state.queries.lock().await.clone()
    }
}

async fn handle_upload(
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.expect("field bytes").to_vec();
        state.uploads.lock().await.push(ReceivedUpload {
            field: name,
            filename,
            content_type,
            bytes,
        });
    }
    let (status, body) = state.upload_reply.clone();
    (status, Json(body))
}

async fn handle_query(
    State(state): State<StubState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.queries.lock().await.push(payload);
    let (status, body) = state.query_reply.clone();
    (status, Json(body))
}

pub(crate) async fn spawn_stub_server(
    upload_reply: (StatusCode, Value),
    query_reply: (StatusCode, Value),
) -> StubServer {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = StubState {
        uploads: Arc::new(Mutex::new(Vec::new())),
        queries: Arc::new(Mutex::new(Vec::new())),
        upload_reply,
        query_reply,
    };
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route("/query", post(handle_query))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    StubServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Base URL of a port that was bound and released, so connections are refused.
pub(crate) async fn unreachable_base_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
