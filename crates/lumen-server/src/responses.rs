//! JSON envelope shared by every route: `{ success, ... }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lumen_core::LumenError;
use serde_json::{json, Value};

pub type ApiResult = Result<Json<Value>, ApiError>;

/// Merge `success: true` into an object body.
pub fn success(body: Value) -> Json<Value> {
    envelope(true, body)
}

/// A handled negative outcome answered with 200, e.g. "no code found".
pub fn failure(message: impl Into<String>) -> Json<Value> {
    envelope(false, json!({ "message": message.into() }))
}

fn envelope(ok: bool, body: Value) -> Json<Value> {
    let mut map = match body {
        Value::Object(map) => map,
        Value::Null => serde_json::Map::new(),
        other => {
            let mut map = serde_json::Map::new();
            let _ = map.insert("data".into(), other);
            map
        }
    };
    let _ = map.insert("success".into(), Value::Bool(ok));
    Json(Value::Object(map))
}

/// Error answered with the status code of its [`LumenError`].
#[derive(Debug)]
pub struct ApiError(pub LumenError);

impl ApiError {
    fn message(&self) -> String {
        match &self.0 {
            LumenError::InvalidInput(msg) | LumenError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<LumenError> for ApiError {
    fn from(err: LumenError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(LumenError::invalid(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::warn!(error_kind = self.0.error_kind(), error = %self.0, "request failed");
        } else {
            tracing::debug!(error_kind = self.0.error_kind(), error = %self.0, "request rejected");
        }
        let body = json!({
            "success": false,
            "message": self.message(),
            "error": self.0.error_kind(),
        });
        (status, Json(body)).into_response()
    }
}
