use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use shared::{CreateTaskRequest, MessageResponse, Task, INCOMPLETE_LIST_LIMIT};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

/// Routes for the task API. When `static_dir` is set, unmatched paths fall
/// through to the compiled client.
pub fn build_router(state: AppState, static_dir: Option<&FsPath>) -> Router {
    let router = Router::new()
        .route("/", get(welcome))
        .route("/tasks", get(list_incomplete_tasks).post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/done", put(mark_task_done))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn welcome() -> &'static str {
    "Welcome to Todo API"
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(request) = payload?;
    let (title, description) = request.require_fields()?;

    let task = state.store.insert(&title, &description).await?;
    info!(id = %task.id, "task created");

    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_incomplete_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.list_incomplete(INCOMPLETE_LIST_LIMIT).await?;
    Ok(Json(tasks))
}

async fn get_task(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    match state.store.find(id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound),
    }
}

async fn mark_task_done(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.mark_done(id).await? {
        return Err(ApiError::NotFound);
    }

    info!(%id, "task marked done");
    Ok(Json(MessageResponse::new("Task marked as done successfully")))
}

/// A malformed id can never match a stored task, so it is reported as not found.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}
