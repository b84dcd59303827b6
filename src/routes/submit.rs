use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::SharedState;
use crate::storage::WriteReceipt;

pub async fn index() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /submit: parse the body, dispatch to the active backend, map the
/// receipt onto the wire. The backend write is the only blocking I/O.
pub async fn submit(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("invalid json".to_string()))?;

    if is_empty_payload(&payload) {
        return Err(AppError::BadRequest("invalid json".to_string()));
    }

    let receipt = state
        .backend
        .write(&payload)
        .await
        .map_err(|e| AppError::Backend(e.to_string()))?;

    let body = match receipt {
        WriteReceipt::Row { id, created_at } => json!({
            "id": id,
            "created_at": created_at,
        }),
        WriteReceipt::Remote { records } => json!({
            "ok": true,
            "data": records,
        }),
    };

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// CORS preflight: answered before any parsing, never reaches storage. The
/// CORS headers themselves are applied app-wide.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// A body that parses but carries nothing (null, "", {}, []) is rejected the
/// same way as one that does not parse.
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
