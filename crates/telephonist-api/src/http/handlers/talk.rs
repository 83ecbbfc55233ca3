//! Conversation endpoints.
//!
//! POST   /  -- one turn: `{user_id, key, input}` -> `{answer, status}`
//! DELETE /  -- hang up: `{user_id}` -> `{dialog_id, status}`
//!
//! `user_id` may be a JSON string or a non-negative integer. The LLM key
//! travels with every turn and is wrapped in a `SecretString` as soon as it
//! is parsed.

use std::fmt;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::http::error::{AppError, EMPTY_INPUT, EMPTY_KEY, EMPTY_USER_ID, WRONG_BODY_FORMAT};
use crate::state::AppState;

/// Reported in `status` on success.
const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl UserId {
    fn into_key(self) -> Option<String> {
        match self {
            UserId::Number(n) => Some(n.to_string()),
            UserId::Text(s) if s.trim().is_empty() => None,
            UserId::Text(s) => Some(s),
        }
    }
}

/// Raw body of `POST /`.
#[derive(Deserialize)]
pub struct TalkPayload {
    pub user_id: Option<UserId>,
    pub key: Option<String>,
    pub input: Option<String>,
}

impl fmt::Debug for TalkPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TalkPayload")
            .field("user_id", &self.user_id)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("input", &self.input)
            .finish()
    }
}

/// A validated turn.
pub struct TalkRequest {
    pub user_id: String,
    pub key: SecretString,
    pub input: String,
}

impl TalkPayload {
    /// Check every field, collecting all missing ones.
    pub fn validate(self) -> Result<TalkRequest, AppError> {
        let user_id = self.user_id.and_then(UserId::into_key);
        let key = self.key.filter(|k| !k.is_empty());
        let input = self.input.filter(|i| !i.trim().is_empty());

        let mut codes = Vec::new();
        if user_id.is_none() {
            codes.push(EMPTY_USER_ID);
        }
        if key.is_none() {
            codes.push(EMPTY_KEY);
        }
        if input.is_none() {
            codes.push(EMPTY_INPUT);
        }

        match (user_id, key, input) {
            (Some(user_id), Some(key), Some(input)) => Ok(TalkRequest {
                user_id,
                key: SecretString::from(key),
                input,
            }),
            _ => Err(AppError::Validation(codes)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TalkResponse {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub answer: String,
    pub status: String,
}

/// Raw body of `DELETE /`.
#[derive(Debug, Deserialize)]
pub struct HangUpPayload {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
pub struct HangUpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_id: Option<String>,
    pub status: String,
}

fn body_or_reject<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Malformed request body");
        AppError::Validation(vec![WRONG_BODY_FORMAT])
    })
}

/// POST / -- run one conversational turn.
///
/// Provider failures are not errors here: the engine answers `""` and the
/// response simply carries no `answer`.
pub async fn talk(
    State(state): State<AppState>,
    payload: Result<Json<TalkPayload>, JsonRejection>,
) -> Result<Json<TalkResponse>, AppError> {
    let request = body_or_reject(payload)?.validate().inspect_err(|e| {
        tracing::info!(status = %e.status_text(), "Rejected talk request");
    })?;

    tracing::debug!(user_id = %request.user_id, input = %request.input, "Talk request");
    let answer = state
        .engine
        .talk(&request.user_id, &request.key, &request.input)
        .await;

    Ok(Json(TalkResponse {
        answer,
        status: STATUS_OK.to_string(),
    }))
}

/// DELETE / -- close the caller's session and archive it.
///
/// Persistence failures are reported in `status` with a 200, matching how
/// callers already treat this endpoint as fire-and-forget.
pub async fn hang_up(
    State(state): State<AppState>,
    payload: Result<Json<HangUpPayload>, JsonRejection>,
) -> Result<Json<HangUpResponse>, AppError> {
    let user_id = body_or_reject(payload)?
        .user_id
        .and_then(UserId::into_key)
        .ok_or(AppError::Validation(vec![EMPTY_USER_ID]))?;

    let response = match state.engine.stop(&user_id).await {
        Ok(dialog_id) => HangUpResponse {
            dialog_id,
            status: STATUS_OK.to_string(),
        },
        Err(e) => HangUpResponse {
            dialog_id: None,
            status: e.to_string(),
        },
    };
    Ok(Json(response))
}
