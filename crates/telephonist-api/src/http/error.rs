//! Application error type mapping to HTTP status codes.
//!
//! Error bodies use the same `{ "status": ... }` shape as successful
//! responses so callers read one field either way.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const WRONG_BODY_FORMAT: &str = "WRONG_BODY_FORMAT";
pub const EMPTY_USER_ID: &str = "EMPTY_USER_ID";
pub const EMPTY_KEY: &str = "EMPTY_KEY";
pub const EMPTY_INPUT: &str = "EMPTY_INPUT";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// One or more request validation codes, reported newline-joined.
    Validation(Vec<&'static str>),
}

impl AppError {
    /// The text reported in the `status` field.
    pub fn status_text(&self) -> String {
        match self {
            AppError::Validation(codes) => codes.join("\n"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(json!({ "status": self.status_text() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_codes_are_newline_joined() {
        let err = AppError::Validation(vec![EMPTY_USER_ID, EMPTY_KEY]);
        assert_eq!(err.status_text(), "EMPTY_USER_ID\nEMPTY_KEY");
    }

    #[test]
    fn validation_is_bad_request() {
        let response = AppError::Validation(vec![EMPTY_INPUT]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
