//! Local mock of the Immutable X API shared by the integration tests

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use imx_toolkit::{ClientConfig, ImxClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wallet of the only registered user
pub const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
pub const KEY_ONE_ADDRESS: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

/// Wallet with no registered user
pub const KEY_TWO: &str = "0x0000000000000000000000000000000000000000000000000000000000000002";

pub const SIGNABLE_MESSAGE: &str = "Only sign this key linking request from Immutable X";
pub const PAYLOAD_HASH: &str = "0x5ec3f6d3b5b2";

#[derive(Clone, Default)]
pub struct Recorder {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    headers: Arc<Mutex<Vec<(String, String)>>>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    /// Query strings of list requests, in arrival order
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }

    /// Last value seen for each auth header
    pub fn headers(&self) -> HashMap<String, String> {
        self.headers.lock().unwrap().iter().cloned().collect()
    }

    /// Bodies received under `label`
    pub fn bodies(&self, label: &str) -> Vec<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .filter(|(seen, _)| seen == label)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Single-record lookups, as `"<kind> <id>"`
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    fn record_body(&self, label: impl Into<String>, body: Value) {
        self.bodies.lock().unwrap().push((label.into(), body));
    }

    fn record_hit(&self, hit: String) {
        self.hits.lock().unwrap().push(hit);
    }

    fn record_auth(&self, headers: &HeaderMap) {
        for name in ["imx-signature", "imx-timestamp"] {
            if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
                self.headers
                    .lock()
                    .unwrap()
                    .push((name.to_string(), value.to_string()));
            }
        }
    }
}

async fn list_orders(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    recorder.queries.lock().unwrap().push(query.clone());
    match query.get("cursor").map(String::as_str) {
        None => Ok(Json(json!({
            "result": [{"order_id": 1}, {"order_id": 2}],
            "cursor": "c1",
            "remaining": 1
        }))),
        Some("c1") => Ok(Json(json!({
            "result": [{"order_id": 3}],
            "cursor": "",
            "remaining": 0
        }))),
        Some(_) => Err(StatusCode::BAD_REQUEST),
    }
}

async fn list_trades(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    recorder.queries.lock().unwrap().push(query.clone());
    match query.get("cursor") {
        None => Ok(Json(json!({
            "result": [{"transaction_id": 10}],
            "cursor": "t1",
            "remaining": true
        }))),
        Some(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn list_assets(
    State(recorder): State<Recorder>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    recorder.queries.lock().unwrap().push(query);
    Json(json!({"result": [], "cursor": "", "remaining": 0}))
}

async fn list_balances(
    State(recorder): State<Recorder>,
    Path(owner): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    recorder.queries.lock().unwrap().push(query);
    Json(json!({
        "result": [{"symbol": "ETH", "owner": owner}, {"symbol": "IMX", "owner": owner}],
        "cursor": "",
        "remaining": false
    }))
}

fn lookup(recorder: &Recorder, kind: &str, id: String) -> Json<Value> {
    recorder.record_hit(format!("{kind} {id}"));
    Json(json!({"kind": kind, "id": id}))
}

async fn get_order(State(recorder): State<Recorder>, Path(id): Path<String>) -> Json<Value> {
    lookup(&recorder, "order", id)
}

async fn get_trade(State(recorder): State<Recorder>, Path(id): Path<String>) -> Json<Value> {
    lookup(&recorder, "trade", id)
}

async fn get_mint(State(recorder): State<Recorder>, Path(id): Path<String>) -> Json<Value> {
    lookup(&recorder, "mint", id)
}

async fn get_balance(
    State(recorder): State<Recorder>,
    Path((owner, token)): Path<(String, String)>,
) -> Json<Value> {
    recorder.record_hit(format!("balance {owner} {token}"));
    Json(json!({"symbol": token, "balance": "0"}))
}

async fn get_user(Path(address): Path<String>) -> Result<Json<Value>, StatusCode> {
    if address == KEY_ONE_ADDRESS {
        Ok(Json(json!({"accounts": ["0xstark"]})))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn signable_registration(
    State(recorder): State<Recorder>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record_body("signable", body);
    Json(json!({
        "signable_message": SIGNABLE_MESSAGE,
        "payload_hash": PAYLOAD_HASH
    }))
}

async fn register_user(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Json<Value> {
    recorder.record_body("register", body);
    Json(json!({"tx_hash": ""}))
}

async fn create_project(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record_auth(&headers);
    let name = body["name"].clone();
    recorder.record_body("project", body);
    Json(json!({"id": 9, "name": name}))
}

async fn create_collection(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record_auth(&headers);
    let address = body["contract_address"].clone();
    recorder.record_body("collection", body);
    Json(json!({"address": address}))
}

async fn add_metadata_schema(
    State(recorder): State<Recorder>,
    Path(address): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record_auth(&headers);
    recorder.record_body(format!("metadata add {address}"), body);
    Json(json!({"result": "ok"}))
}

async fn update_metadata_schema(
    State(recorder): State<Recorder>,
    Path((address, name)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.record_auth(&headers);
    recorder.record_body(format!("metadata update {address} {name}"), body);
    Json(json!({"result": "ok"}))
}

async fn create_mints(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Json<Value> {
    recorder.record_body("mint", body);
    Json(json!({"results": [{"token_id": "1", "tx_id": 77}]}))
}

/// Serve the mock on an ephemeral port and return a client pointed at it
pub async fn spawn_mock() -> (ImxClient, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/v1/orders", get(list_orders))
        .route("/v1/trades", get(list_trades))
        .route("/v1/assets", get(list_assets))
        .route("/v1/orders/:id", get(get_order))
        .route("/v1/trades/:id", get(get_trade))
        .route("/v1/mints/:id", get(get_mint))
        .route("/v2/balances/:owner", get(list_balances))
        .route("/v2/balances/:owner/:token", get(get_balance))
        .route("/v1/users/:address", get(get_user))
        .route("/v1/users", post(register_user))
        .route("/v1/signable-registration-offchain", post(signable_registration))
        .route("/v1/projects", post(create_project))
        .route("/v1/collections", post(create_collection))
        .route(
            "/v1/collections/:address/metadata-schema",
            post(add_metadata_schema),
        )
        .route(
            "/v1/collections/:address/metadata-schema/:name",
            patch(update_metadata_schema),
        )
        .route("/v2/mints", post(create_mints))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ImxClient::with_config(ClientConfig {
        base_url: format!("http://{addr}"),
        initial_retry_delay: Duration::from_millis(1),
        max_retry_delay: Duration::from_millis(5),
        ..Default::default()
    })
    .unwrap();

    (client, recorder)
}
