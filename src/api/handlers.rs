//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, CreateFileRequest, EditFileRequest, ErrorResponse,
    SessionResponse, SuccessResponse,
};
use super::AppState;
use crate::runtime::{RuntimeError, SseEvent, StreamGuard};
use crate::state_machine::Event;
use crate::workspace::{FileRecord, FileStoreError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the SPA
        .route("/", get(serve_spa))
        .route("/assets/*path", get(serve_static))
        // Session lifecycle
        .route("/api/sessions/new", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/close", post(close_session))
        // Change stream
        .route("/api/sessions/:id/stream", get(stream_session))
        // Chat
        .route("/api/sessions/:id/chat", post(send_chat))
        // Files
        .route("/api/sessions/:id/files/new", post(create_file))
        .route("/api/sessions/:id/files/:index/select", post(select_file))
        .route("/api/sessions/:id/files/active", put(edit_active_file))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// SPA Handler
// ============================================================

async fn serve_spa() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.runtime.create_session().await;
    Json(SessionResponse { session })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.runtime.view(&id).await?;
    Ok(Json(SessionResponse { session }))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.close(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (view, broadcast_rx) = state.runtime.subscribe(&id).await?;
    let guard = StreamGuard::new(state.runtime.clone(), id);
    Ok(sse_stream(SseEvent::Init { view }, broadcast_rx, guard))
}

// ============================================================
// Chat
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let view = state.runtime.view(&id).await?;

    // Mirrors the disabled send button; the controller enforces it as well
    if req.text.trim().is_empty() || view.awaiting_response {
        return Ok(Json(ChatResponse { queued: false }));
    }

    state
        .runtime
        .send_event(&id, Event::UserMessage { text: req.text })
        .await?;

    Ok(Json(ChatResponse { queued: true }))
}

// ============================================================
// Files
// ============================================================

async fn create_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<CreateFileRequest>>,
) -> Result<Json<SuccessResponse>, AppError> {
    let event = match body {
        Some(Json(req)) => Event::CreateFile {
            file: FileRecord::new(req.name, req.language, req.content),
        },
        None => Event::NewFile,
    };
    state.runtime.send_event(&id, event).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn select_file(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<SuccessResponse>, AppError> {
    // Files never shrink, so an index valid now stays valid
    let view = state.runtime.view(&id).await?;
    if index >= view.files.len() {
        return Err(AppError::BadRequest(
            FileStoreError::OutOfRange {
                index,
                len: view.files.len(),
            }
            .to_string(),
        ));
    }

    state
        .runtime
        .send_event(&id, Event::SelectFile { index })
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn edit_active_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditFileRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .runtime
        .send_event(
            &id,
            Event::EditActiveFile {
                index: req.index,
                content: req.content,
            },
        )
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("codepad ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::SessionNotFound(_) => AppError::NotFound(e.to_string()),
            RuntimeError::SessionClosed(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
