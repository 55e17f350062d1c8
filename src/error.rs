//! Shared HTTP error body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Every rejection leaves the API as `{ "message": ... }`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";
