//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions            - Create a session
//! - GET  /api/v1/sessions/{id}/turns - Turns so far (initializes on first use)
//! - POST /api/v1/sessions/{id}/ask   - Submit a question

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vasculargpt_core::pipeline::AnswerPipeline;
use vasculargpt_types::chat::ChatTurn;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Result of one submission.
///
/// `submitted` is false for an empty question, in which case nothing was
/// appended and `answer`/`top_source` are null.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub submitted: bool,
    pub answer: Option<String>,
    pub top_source: Option<String>,
    pub turn_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub id: Uuid,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/sessions - Create an empty session.
pub async fn create_session<P: AnswerPipeline + 'static>(
    State(state): State<AppState<P>>,
) -> Json<ApiResponse<CreatedSession>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = state.sessions.create();

    let elapsed = start.elapsed().as_millis() as u64;
    Json(
        ApiResponse::success(CreatedSession { id }, request_id, elapsed)
            .with_link("turns", &format!("/api/v1/sessions/{id}/turns"))
            .with_link("ask", &format!("/api/v1/sessions/{id}/ask")),
    )
}

/// GET /api/v1/sessions/{id}/turns - The session's turns in order.
pub async fn get_turns<P: AnswerPipeline + 'static>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatTurn>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let turns = state.sessions.acquire(id).await.turns.clone();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(turns, request_id, elapsed)))
}

/// POST /api/v1/sessions/{id}/ask - Run one submission against the session.
///
/// The session lock is held for the whole pipeline call, so concurrent
/// submissions to one session are processed one at a time.
pub async fn ask<P: AnswerPipeline + 'static>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AskResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let Json(request) = payload?;
    let mut session = state.sessions.acquire(id).await;

    let rendered = state.controller.submit(&mut session, &request.question).await?;

    let response = AskResponse {
        submitted: rendered.is_some(),
        answer: rendered.as_ref().map(|r| r.answer.clone()),
        top_source: rendered.map(|r| r.top_source),
        turn_count: session.len(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    tracing::debug!(session_id = %id, elapsed_ms = elapsed, "Handled ask request");
    Ok(Json(ApiResponse::success(response, request_id, elapsed)))
}
