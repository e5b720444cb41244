use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrateRecord {
    pub name: String,
    pub max_version: String,
}

pub type Db = Arc<HashMap<String, CrateRecord>>;

/// Registry API routes, seeded with `serde` and `tokio`.
pub fn app() -> Router {
    app_with(["serde", "tokio"].map(|name| CrateRecord {
        name: name.to_string(),
        max_version: "1.0.0".to_string(),
    }))
}

pub fn app_with(crates: impl IntoIterator<Item = CrateRecord>) -> Router {
    let db: Db = Arc::new(crates.into_iter().map(|c| (c.name.clone(), c)).collect());
    Router::new()
        .route("/api/v1/crates/{name}", get(get_crate))
        .route("/api/v1/moved/{name}", get(moved_crate))
        .route("/api/v1/status/{code}", get(fixed_status))
        .route("/api/v1/broken", get(broken_envelope))
        .route("/api/v1/large/{mib}", get(large_crate))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"errors": [{"detail": "Not Found"}]})),
    )
        .into_response()
}

async fn get_crate(State(db): State<Db>, Path(name): Path<String>) -> Response {
    match db.get(&name) {
        Some(record) => Json(json!({ "crate": record })).into_response(),
        None => not_found(),
    }
}

async fn moved_crate(Path(name): Path<String>) -> Redirect {
    Redirect::temporary(&format!("/api/v1/crates/{name}"))
}

/// Answers with any status code; the body carries control bytes so the
/// diagnostic dump has something to escape.
async fn fixed_status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, "maintenance\r\n\x1b[0m").into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// A valid crate document padded to `mib` MiB.
async fn large_crate(Path(mib): Path<usize>) -> Json<serde_json::Value> {
    let padding = "x".repeat(mib * 1024 * 1024);
    Json(json!({"crate": {"name": "large", "padding": padding}}))
}

/// A 404 whose envelope has an empty error list.
async fn broken_envelope() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"errors": []}))).into_response()
}
