//! Page shell and page-text handlers.
//!
//! Endpoints:
//! - GET /             - Chat page
//! - GET /api/v1/page  - Static page texts from configuration

use std::time::Instant;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use uuid::Uuid;

use vasculargpt_core::pipeline::AnswerPipeline;
use vasculargpt_types::config::PageConfig;

use crate::http::response::ApiResponse;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../../web/index.html");

/// GET / - The chat page. Texts are fetched from `/api/v1/page` at load.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/v1/page - Titles, descriptions and the input label.
pub async fn page_texts<P: AnswerPipeline + 'static>(
    State(state): State<AppState<P>>,
) -> Json<ApiResponse<PageConfig>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let page = state.config.page.clone();

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(page, request_id, elapsed))
}
