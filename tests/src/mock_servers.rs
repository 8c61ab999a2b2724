//! In-process fakes of the HTTP services the pipeline talks to.
//!
//! Each server binds `127.0.0.1:0`, runs on the test's tokio runtime and
//! exposes its recorded requests through shared state.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::PeerInfo;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

/// URL nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

// =============================================================================
// LEDGER GATEWAY
// =============================================================================

/// Recorded state of the fake gateway.
#[derive(Default)]
pub struct GatewayState {
    /// Serialized blocks by number.
    pub blocks: Mutex<BTreeMap<u64, Vec<u8>>>,
    /// Membership returned by the peers endpoint.
    pub peers: Mutex<Vec<PeerInfo>>,
    /// Raw query strings of block requests.
    pub block_queries: Mutex<Vec<String>>,
    /// `(org, user)` identity headers of every request.
    pub identities: Mutex<Vec<(String, String)>>,
}

impl GatewayState {
    fn record_identity(&self, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        self.identities
            .lock()
            .push((header("x-fabric-org"), header("x-fabric-user")));
    }
}

async fn gateway_peers(
    State(state): State<Arc<GatewayState>>,
    Path(_channel): Path<String>,
    headers: HeaderMap,
) -> Json<Vec<PeerInfo>> {
    state.record_identity(&headers);
    Json(state.peers.lock().clone())
}

async fn gateway_block(
    State(state): State<Arc<GatewayState>>,
    Path((_channel, number)): Path<(String, u64)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.record_identity(&headers);
    state.block_queries.lock().push(query.unwrap_or_default());
    let block = state.blocks.lock().get(&number).cloned();
    match block {
        Some(bytes) => bytes.into_response(),
        None => (StatusCode::NOT_FOUND, format!("block {} not found", number)).into_response(),
    }
}

/// Start a fake ledger gateway.
pub async fn start_gateway() -> (String, Arc<GatewayState>) {
    let state = Arc::new(GatewayState::default());
    let app = Router::new()
        .route("/channels/:channel/peers", get(gateway_peers))
        .route("/channels/:channel/blocks/:number", get(gateway_block))
        .with_state(Arc::clone(&state));
    (serve(app).await, state)
}

// =============================================================================
// ELASTICSEARCH
// =============================================================================

/// Recorded state of the fake Elasticsearch node.
pub struct ElasticState {
    /// NDJSON bodies of every bulk request.
    pub bulk_bodies: Mutex<Vec<String>>,
    /// `Authorization` header of every bulk request.
    pub auth_headers: Mutex<Vec<Option<String>>>,
    /// Status and body returned by the bulk endpoint.
    pub response: Mutex<(StatusCode, Value)>,
}

impl Default for ElasticState {
    fn default() -> Self {
        Self {
            bulk_bodies: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
            response: Mutex::new((StatusCode::OK, json!({"took": 1, "errors": false, "items": []}))),
        }
    }
}

impl ElasticState {
    /// Make the bulk endpoint answer with `status` and `body`.
    pub fn respond_with(&self, status: StatusCode, body: Value) {
        *self.response.lock() = (status, body);
    }
}

async fn elastic_bulk(
    State(state): State<Arc<ElasticState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.bulk_bodies.lock().push(body);
    state.auth_headers.lock().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    let (status, body) = state.response.lock().clone();
    (status, Json(body)).into_response()
}

/// Start a fake Elasticsearch node.
pub async fn start_elasticsearch() -> (String, Arc<ElasticState>) {
    let state = Arc::new(ElasticState::default());
    let app = Router::new()
        .route("/_bulk", post(elastic_bulk))
        .with_state(Arc::clone(&state));
    (serve(app).await, state)
}

// =============================================================================
// MEILISEARCH
// =============================================================================

/// Recorded state of the fake Meilisearch server. Tasks complete instantly.
#[derive(Default)]
pub struct MeiliState {
    /// Primary key of every created index.
    pub indexes: Mutex<HashMap<String, String>>,
    /// Ranking rules set per index.
    pub ranking_rules: Mutex<HashMap<String, Vec<String>>>,
    /// Documents per index, by `_fabric_id`.
    pub documents: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    /// Index creation requests received.
    pub create_requests: AtomicU64,
    /// Task ids whose status has been polled.
    pub polled_tasks: Mutex<HashSet<u64>>,
    /// `Authorization` header of every request.
    pub auth_headers: Mutex<Vec<Option<String>>>,
    /// Report every task as failed.
    pub fail_tasks: AtomicBool,
    /// Failure message of tasks rejected on their content.
    rejected_tasks: Mutex<HashMap<u64, String>>,
    next_task: AtomicU64,
}

fn is_meili_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl MeiliState {
    fn enqueue(&self, headers: &HeaderMap) -> Response {
        self.enqueue_checked(headers, None)
    }

    /// Enqueue a task that will fail with `rejection` once polled.
    fn enqueue_checked(&self, headers: &HeaderMap, rejection: Option<String>) -> Response {
        self.auth_headers.lock().push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
        let uid = self.next_task.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = rejection {
            self.rejected_tasks.lock().insert(uid, message);
        }
        (
            StatusCode::ACCEPTED,
            Json(json!({"taskUid": uid, "status": "enqueued"})),
        )
            .into_response()
    }

    /// Documents currently stored in `index`.
    pub fn documents_in(&self, index: &str) -> BTreeMap<String, Value> {
        self.documents.lock().get(index).cloned().unwrap_or_default()
    }
}

async fn meili_get_index(
    State(state): State<Arc<MeiliState>>,
    Path(uid): Path<String>,
) -> Response {
    let primary_key = state.indexes.lock().get(&uid).cloned();
    match primary_key {
        Some(primary_key) => Json(json!({"uid": uid, "primaryKey": primary_key})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"code": "index_not_found", "message": "Index not found"})),
        )
            .into_response(),
    }
}

async fn meili_create_index(
    State(state): State<Arc<MeiliState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.create_requests.fetch_add(1, Ordering::SeqCst);
    let uid = body["uid"].as_str().unwrap_or_default().to_string();
    if !is_meili_id(&uid) {
        return state.enqueue_checked(&headers, Some(format!("`{}` is not a valid index uid", uid)));
    }
    let primary_key = body["primaryKey"].as_str().unwrap_or_default().to_string();
    state.indexes.lock().insert(uid, primary_key);
    state.enqueue(&headers)
}

async fn meili_settings(
    State(state): State<Arc<MeiliState>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let rules = body["rankingRules"]
        .as_array()
        .map(|rules| {
            rules
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    state.ranking_rules.lock().insert(uid, rules);
    state.enqueue(&headers)
}

async fn meili_add_documents(
    State(state): State<Arc<MeiliState>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
    Json(docs): Json<Vec<Value>>,
) -> Response {
    let invalid = docs
        .iter()
        .filter_map(|doc| doc["_fabric_id"].as_str())
        .find(|id| !is_meili_id(id))
        .map(str::to_string);
    if let Some(id) = invalid {
        return state.enqueue_checked(&headers, Some(format!("`{}` is not a valid document id", id)));
    }
    {
        let mut documents = state.documents.lock();
        let index = documents.entry(uid).or_default();
        for doc in docs {
            let id = doc["_fabric_id"].as_str().unwrap_or_default().to_string();
            index.insert(id, doc);
        }
    }
    state.enqueue(&headers)
}

async fn meili_delete_documents(
    State(state): State<Arc<MeiliState>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
    Json(ids): Json<Vec<String>>,
) -> Response {
    {
        let mut documents = state.documents.lock();
        let index = documents.entry(uid).or_default();
        for id in ids {
            index.remove(&id);
        }
    }
    state.enqueue(&headers)
}

async fn meili_task(State(state): State<Arc<MeiliState>>, Path(uid): Path<u64>) -> Json<Value> {
    state.polled_tasks.lock().insert(uid);
    let rejection = state.rejected_tasks.lock().get(&uid).cloned();
    if let Some(message) = rejection {
        Json(json!({
            "uid": uid,
            "status": "failed",
            "error": {"message": message, "code": "invalid_document_id"}
        }))
    } else if state.fail_tasks.load(Ordering::SeqCst) {
        Json(json!({
            "uid": uid,
            "status": "failed",
            "error": {"message": "simulated failure", "code": "internal"}
        }))
    } else {
        Json(json!({"uid": uid, "status": "succeeded"}))
    }
}

/// Start a fake Meilisearch server.
pub async fn start_meilisearch() -> (String, Arc<MeiliState>) {
    let state = Arc::new(MeiliState::default());
    let app = Router::new()
        .route("/indexes", post(meili_create_index))
        .route("/indexes/:uid", get(meili_get_index))
        .route("/indexes/:uid/settings", axum::routing::patch(meili_settings))
        .route("/indexes/:uid/documents", post(meili_add_documents))
        .route("/indexes/:uid/documents/delete-batch", post(meili_delete_documents))
        .route("/tasks/:uid", get(meili_task))
        .with_state(Arc::clone(&state));
    (serve(app).await, state)
}
