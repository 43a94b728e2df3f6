//! Axum router configuration with middleware.
//!
//! The chat page is served at `/`, the JSON API under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::http::Uri;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use vasculargpt_core::pipeline::AnswerPipeline;

use crate::http::handlers;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router<P: AnswerPipeline + 'static>(state: AppState<P>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/page", get(handlers::page::page_texts::<P>))
        .route("/sessions", post(handlers::session::create_session::<P>))
        .route("/sessions/{id}/turns", get(handlers::session::get_turns::<P>))
        .route("/sessions/{id}/ask", post(handlers::session::ask::<P>));

    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> ApiResponse<()> {
    ApiResponse::error(
        "NOT_FOUND",
        &format!("No route for {}", uri.path()),
        Uuid::now_v7().to_string(),
        0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use vasculargpt_types::chat::{ChatTurn, PipelineAnswer, RetrievedPassage};
    use vasculargpt_types::config::AppConfig;
    use vasculargpt_types::error::{PipelineError, RetrievalError};
    use vasculargpt_types::llm::LlmError;

    #[derive(Clone, Copy)]
    enum Scripted {
        Answer,
        NoSources,
        ServiceFailure,
        MissingIndex,
    }

    impl AnswerPipeline for Scripted {
        async fn invoke(
            &self,
            question: &str,
            history: &[ChatTurn],
        ) -> Result<PipelineAnswer, PipelineError> {
            match self {
                Scripted::Answer => Ok(PipelineAnswer {
                    answer: Some(format!("{question} / {} turns", history.len())),
                    source_documents: vec![
                        RetrievedPassage::new("top passage"),
                        RetrievedPassage::new("second passage"),
                    ],
                }),
                Scripted::NoSources => Ok(PipelineAnswer::default()),
                Scripted::ServiceFailure => {
                    Err(PipelineError::Llm(LlmError::Overloaded("busy".to_string())))
                }
                Scripted::MissingIndex => Err(PipelineError::Retrieval(
                    RetrievalError::IndexNotFound("vasculargpt".to_string()),
                )),
            }
        }
    }

    fn router(pipeline: Scripted) -> Router {
        build_router(AppState::new(pipeline, AppConfig::default()))
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn ask_request(id: &str, question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{id}/ask"))
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "question": question }).to_string(),
            ))
            .unwrap()
    }

    async fn create_session(router: &Router) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/sessions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&router(Scripted::Answer), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_page_is_html() {
        let response = router(Scripted::Answer)
            .oneshot(get_request("/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Source (Top Document):"));
    }

    #[tokio::test]
    async fn test_page_texts() {
        let (status, body) = send(&router(Scripted::Answer), get_request("/api/v1/page")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Welcome to VascularGPT");
        assert_eq!(body["data"]["input_label"], "Enter your question here:");
    }

    #[tokio::test]
    async fn test_ask_appends_turns() {
        let router = router(Scripted::Answer);
        let id = create_session(&router).await;

        let (status, body) = send(&router, ask_request(&id, "What is atherosclerosis?")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["submitted"], true);
        // History passed to the pipeline includes the pending turn.
        assert_eq!(body["data"]["answer"], "What is atherosclerosis? / 1 turns");
        assert_eq!(body["data"]["top_source"], "top passage");
        assert_eq!(body["data"]["turn_count"], 1);

        let (_, body) = send(&router, ask_request(&id, "How is it treated?")).await;
        assert_eq!(body["data"]["answer"], "How is it treated? / 2 turns");

        let (status, body) = send(&router, get_request(&format!("/api/v1/sessions/{id}/turns"))).await;
        assert_eq!(status, StatusCode::OK);
        let turns = body["data"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["question"], "What is atherosclerosis?");
        assert_eq!(turns[0]["answer"], "What is atherosclerosis? / 1 turns");
    }

    #[tokio::test]
    async fn test_empty_question_is_ignored() {
        let router = router(Scripted::Answer);
        let id = create_session(&router).await;

        let (status, body) = send(&router, ask_request(&id, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["submitted"], false);
        assert!(body["data"]["answer"].is_null());
        assert_eq!(body["data"]["turn_count"], 0);
    }

    #[tokio::test]
    async fn test_placeholders_when_pipeline_returns_nothing() {
        let router = router(Scripted::NoSources);
        let id = create_session(&router).await;

        let (_, body) = send(&router, ask_request(&id, "Anything?")).await;
        assert_eq!(body["data"]["answer"], "No answer found.");
        assert_eq!(body["data"]["top_source"], "No source document found.");
    }

    #[tokio::test]
    async fn test_service_failure_leaves_pending_turn() {
        let router = router(Scripted::ServiceFailure);
        let id = create_session(&router).await;

        let (status, body) = send(&router, ask_request(&id, "What is an aneurysm?")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["errors"][0]["code"], "SERVICE_ERROR");

        let (_, body) = send(&router, get_request(&format!("/api/v1/sessions/{id}/turns"))).await;
        let turns = body["data"].as_array().unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0]["question"], "What is an aneurysm?");
        assert_eq!(turns[0]["answer"], "");
    }

    #[tokio::test]
    async fn test_configuration_failure() {
        let router = router(Scripted::MissingIndex);
        let id = create_session(&router).await;

        let (status, body) = send(&router, ask_request(&id, "q")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"][0]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_ask_body_uses_envelope() {
        let router = router(Scripted::Answer);
        let id = create_session(&router).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{id}/ask"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"q": "missing field"}"#))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{id}/ask"))
            .body(Body::from("What is atherosclerosis?"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (_, body) = send(&router, get_request(&format!("/api/v1/sessions/{id}/turns"))).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_initializes_on_first_use() {
        let router = router(Scripted::Answer);
        let id = Uuid::now_v7();

        let (status, body) = send(&router, get_request(&format!("/api/v1/sessions/{id}/turns"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_session_id() {
        let (status, body) = send(
            &router(Scripted::Answer),
            get_request("/api/v1/sessions/not-a-uuid/turns"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(&router(Scripted::Answer), get_request("/api/v1/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "NOT_FOUND");
    }
}
