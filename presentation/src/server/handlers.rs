//! Route handlers for the chat server.

use super::AppState;
use super::error::{AppError, bad_request, not_found};
use super::session::{SessionCookie, read_session};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chorus_application::{AskInput, AskOutcome};
use chorus_domain::{
    AggregationResult, Contributions, Language, ProviderName, SessionKey, SharedConversation,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

// ============ GET /health ============

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /chat ============

/// Body of `POST /chat`.
///
/// With `saveConversation` set, `response` and `contributions` are stored
/// as a shared conversation instead of asking the providers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub message: String,
    pub language: Option<String>,
    pub save_conversation: bool,
    pub response: Option<String>,
    pub contributions: Option<Contributions>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub raw_responses: BTreeMap<ProviderName, String>,
    pub contributions: Contributions,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rejected: bool,
}

impl ChatResponse {
    fn answered(result: AggregationResult) -> Self {
        Self {
            response: result.final_text,
            raw_responses: result.raw_responses,
            contributions: result.contributions,
            degraded: result.degraded,
            rejected: false,
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            response: message,
            raw_responses: BTreeMap::new(),
            contributions: Contributions::empty(),
            degraded: false,
            rejected: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResponse {
    pub conversation_id: String,
}

pub async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let session = SessionCookie::from_headers(&headers);

    let mut response = if request.save_conversation {
        save_conversation(&state, request)?.into_response()
    } else {
        ask(&state, &session.id, request).await?.into_response()
    };

    if let Some(cookie) = session.set_cookie() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

async fn ask(
    state: &AppState,
    session: &str,
    request: ChatRequest,
) -> Result<Json<ChatResponse>, AppError> {
    let mut input = AskInput::new(session, request.message);
    if let Some(language) = request
        .language
        .as_deref()
        .filter(|language| !language.trim().is_empty())
    {
        input = input.with_language(language.parse::<Language>().unwrap_or_default());
    }

    let body = match state.ask.execute(input).await? {
        AskOutcome::Answered(result) => ChatResponse::answered(result),
        AskOutcome::Rejected(message) => ChatResponse::rejected(message),
    };
    Ok(Json(body))
}

fn save_conversation(state: &AppState, request: ChatRequest) -> Result<Json<SavedResponse>, AppError> {
    let response = request
        .response
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| bad_request("response must not be empty"))?;

    let id = Uuid::new_v4().to_string();
    let shared = SharedConversation::new(
        id.clone(),
        response,
        request.contributions.unwrap_or_default(),
        state.clock.now(),
    );
    state.ask.store().save_shared(shared);
    info!(conversation_id = %id, "Saved shared conversation");

    Ok(Json(SavedResponse {
        conversation_id: id,
    }))
}

// ============ POST /clear ============

pub async fn handle_clear(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let id = read_session(&headers).ok_or_else(|| bad_request("session not found"))?;
    let key = SessionKey::new(id).map_err(|e| bad_request(e.to_string()))?;
    state.ask.store().clear(&key);
    Ok(StatusCode::OK)
}

// ============ GET /conversation/{id} ============

pub async fn handle_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SharedConversation>, AppError> {
    state
        .ask
        .store()
        .shared(&id)
        .map(Json)
        .ok_or_else(|| not_found(format!("no conversation with id: {}", id)))
}
