//! HTTP passthrough endpoint for btca
//!
//! One `POST /question` route runs the same pipeline as `btca ask`:
//! registry lookup, clone-or-pull, agent delegation. Each inbound
//! connection runs the pipeline independently; the shared [`RepoLocks`]
//! table keeps concurrent requests for the same repo from racing a clone
//! against a pull.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use btca_core::history::{HistoryEntry, HistoryStore};
use btca_core::{agent, ensure_local, Error as CoreError, Registry, RepoLocks};

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for server startup
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error (bind or accept failure)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    registry: Arc<RwLock<Registry>>,
    locks: RepoLocks,
}

impl AppState {
    /// Wrap a registry for serving
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            locks: RepoLocks::new(),
        }
    }
}

/// Inbound question payload
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub repo: String,
    pub question: String,
}

/// Outbound answer payload
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub repo: String,
    pub answer: String,
    pub provider: String,
    pub model: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/question", post(question))
        .with_state(state)
}

/// Serve the question endpoint until the process is stopped
pub async fn serve(registry: Registry, port: u16) -> Result<()> {
    let app = router(AppState::new(registry));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;

    tracing::info!(port, "btca server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn question(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> std::result::Result<Json<QuestionResponse>, ApiError> {
    // snapshot the config so the registry lock is not held across git/agent
    let config = state.registry.read().await.config().clone();

    let resolved = ensure_local(&config, &request.repo, &state.locks).await?;
    let backend = agent::backend_for(&config.provider)?;
    let prompt = agent::build_prompt(&request.question, resolved.special_notes.as_deref());
    let answer = backend.ask(&prompt, &config.model, &resolved.path).await?;

    // history is best-effort from the server; an unwritable store must not
    // fail the request
    match HistoryStore::open_default() {
        Ok(mut history) => {
            let entry = HistoryEntry::new(
                &request.question,
                &answer,
                &resolved.name,
                &config.provider,
                &config.model,
            );
            if let Err(e) = history.push(entry) {
                tracing::warn!(error = %e, "failed to record history entry");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to open history store"),
    }

    Ok(Json(QuestionResponse {
        repo: resolved.name,
        answer,
        provider: config.provider,
        model: config.model,
    }))
}

/// Wrapper mapping core errors onto HTTP responses
pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::AlreadyExists(_)
            | CoreError::ValidationFailed { .. }
            | CoreError::Schema(_)
            | CoreError::LocalPseudoRepo(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::CloneFailed { .. }
            | CoreError::PullFailed { .. }
            | CoreError::FetchFailed { .. }
            | CoreError::RemoteMismatch { .. }
            | CoreError::InvalidClone { .. }
            | CoreError::Timeout { .. }
            | CoreError::Agent(_) => StatusCode::BAD_GATEWAY,
            CoreError::Storage(_) | CoreError::Io(_) | CoreError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        tracing::debug!(status = %status, error = %self.0, "request failed");

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_router(temp: &TempDir) -> Router {
        let registry = Registry::open_at(temp.path().join("config.json")).unwrap();
        router(AppState::new(registry))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_repo_is_404() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let request = Request::builder()
            .method("POST")
            .uri("/question")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"repo": "no-such-repo", "question": "hello?"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("no-such-repo"));
    }
}
