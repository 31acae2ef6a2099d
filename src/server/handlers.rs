//! Request handlers for the proxy endpoints
//!
//! Error mapping follows the browser-facing contract: validation failures
//! are 400 `{error}`, everything else is 500 `{error}` (with `detail` for
//! upstream Data Foundry write failures). Upstream completion failures are
//! surfaced as errors, never masked as empty completions.

use crate::error::TemporalError;
use crate::providers::PromptMessage;
use crate::server::AppState;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Value};

/// Body of `POST /api/df-session`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRequest {
    /// Session identifier, used as the remote resource id
    #[serde(default)]
    pub session_id: String,
    /// Optional `token` header value; defaults to the configured one
    #[serde(default)]
    pub token: Option<String>,
    /// Partial object to merge (GET → merge → PUT)
    #[serde(default)]
    pub data: Value,
}

/// Body of `POST /api/openai-chat`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProxyRequest {
    /// System prompt injected as the first message
    #[serde(default)]
    pub system_prompt: String,
    /// Ordered user/assistant history
    #[serde(default)]
    pub messages: Vec<PromptMessage>,
}

/// `POST /api/df-session` — merge-upsert a partial session document
pub async fn upsert_session(
    State(state): State<AppState>,
    Json(body): Json<UpsertRequest>,
) -> impl IntoResponse {
    // Config guard runs before any validation or network call
    if !state.config.datafoundry.has_credentials() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Missing Data Foundry dataset id or API token" })),
        );
    }

    let session_id = body.session_id.trim();
    if session_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing sessionId" })),
        );
    }

    match state
        .df_client
        .upsert_session(session_id, body.token.as_deref(), body.data)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(json!({ "ok": true, "result": result }))),
        Err(e) => match e.downcast_ref::<TemporalError>() {
            Some(TemporalError::Dataset { status, detail }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("DF PUT failed ({})", status),
                    "detail": detail,
                })),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ),
        },
    }
}

/// `POST /api/openai-chat` — forward a prompt to the completion backend
pub async fn chat_completion(
    State(state): State<AppState>,
    Json(body): Json<ChatProxyRequest>,
) -> impl IntoResponse {
    match state
        .backend
        .complete(&body.system_prompt, &body.messages)
        .await
    {
        Ok(content) => (StatusCode::OK, Json(json!({ "content": content }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}
