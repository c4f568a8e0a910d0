use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crypta_core::{SubmitRequest, arch, platform, uptime_seconds};
use crypta_model::{JobKind, ModelError, TaskId};

use crate::{
    dto::{
        CancelResponse, GenerateRequest, GenerateResponse, HealthResponse, ListTasksParams,
        ListTasksResponse, SolveRequest, SolveResponse, StatusResponse,
    },
    error::ApiError,
    handler::ApiHandler,
};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /api/v1/cryptator/health - Liveness and load
    /// - POST /api/v1/cryptator/solve - Solve a cryptarithm
    /// - POST /api/v1/cryptagen/generate - Generate cryptarithms from words
    /// - POST /api/v1/cryptagen/generate-doubly-true - Generate from number words
    /// - GET /api/v1/tasks - List running tasks (`?kind=SOLVE|GENERATE`)
    /// - GET /api/v1/tasks/stats - Registry and admission load
    /// - GET /api/v1/tasks/{id} - Task snapshot, 404 if unknown
    /// - GET /api/v1/tasks/{id}/status - Task status, never 404
    /// - POST /api/v1/tasks/{id}/cancel - Cancel a running task
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/cryptator/health", get(health::<H>))
            .route("/api/v1/cryptator/solve", post(solve::<H>))
            .route("/api/v1/cryptagen/generate", post(generate::<H>))
            .route(
                "/api/v1/cryptagen/generate-doubly-true",
                post(generate_doubly_true::<H>),
            )
            .route("/api/v1/tasks", get(list_tasks::<H>))
            .route("/api/v1/tasks/stats", get(stats::<H>))
            .route("/api/v1/tasks/{id}", get(get_task::<H>))
            .route("/api/v1/tasks/{id}/status", get(get_task_status::<H>))
            .route("/api/v1/tasks/{id}/cancel", post(cancel_task::<H>))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.handler)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/cryptator/health
async fn health<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let load = handler.load().await?;
    Ok(Json(HealthResponse {
        status: "UP",
        uptime_seconds: uptime_seconds(),
        platform: platform(),
        arch: arch(),
        running_tasks: load.running_tasks,
        capacity: load.capacity,
        available: load.available,
    }))
}

/// POST /api/v1/cryptator/solve
async fn solve<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<SolveRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    debug!(cryptarithm = %req.spec.cryptarithm, "solve requested");
    let cryptarithm = req.spec.cryptarithm.clone();
    let report = handler
        .submit_job(SubmitRequest {
            task_id: req.task_id,
            spec: req.spec.into(),
        })
        .await?;

    Ok(Json(SolveResponse::from_report(cryptarithm, report)))
}

/// POST /api/v1/cryptagen/generate
async fn generate<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    debug!(words = req.spec.words.len(), operator = ?req.spec.operator, "generate requested");
    let report = handler
        .submit_job(SubmitRequest {
            task_id: req.task_id,
            spec: req.spec.into(),
        })
        .await?;

    Ok(Json(GenerateResponse::from(report)))
}

/// POST /api/v1/cryptagen/generate-doubly-true
///
/// Words are ignored; the word source is the number-word range.
async fn generate_doubly_true<H>(
    State(handler): State<Arc<H>>,
    Json(mut req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    if !req.spec.is_doubly_true() {
        return Err(ModelError::MissingDoublyTrueBounds.into());
    }
    req.spec.words.clear();

    let report = handler
        .submit_job(SubmitRequest {
            task_id: req.task_id,
            spec: req.spec.into(),
        })
        .await?;

    Ok(Json(GenerateResponse::from(report)))
}

/// GET /api/v1/tasks
async fn list_tasks<H>(
    State(handler): State<Arc<H>>,
    Query(params): Query<ListTasksParams>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let kind = params
        .kind
        .as_deref()
        .map(str::parse::<JobKind>)
        .transpose()?;

    let tasks = handler.list_tasks(kind).await?;
    debug!(count = tasks.len(), "tasks listed");

    Ok(Json(ListTasksResponse {
        total: tasks.len(),
        tasks,
    }))
}

/// GET /api/v1/tasks/stats
async fn stats<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.load().await?))
}

/// GET /api/v1/tasks/{id}
async fn get_task<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let task_id = TaskId::from(id);
    match handler.get_task_status(&task_id).await? {
        Some(info) => Ok(Json(info)),
        None => Err(ApiError::TaskNotFound(task_id.into_inner())),
    }
}

/// GET /api/v1/tasks/{id}/status
async fn get_task_status<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let task_id = TaskId::from(id);
    let info = handler.get_task_status(&task_id).await?;
    Ok(Json(StatusResponse::new(task_id, info)))
}

/// POST /api/v1/tasks/{id}/cancel
async fn cancel_task<H>(
    State(handler): State<Arc<H>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    if id.trim().is_empty() {
        return Err(ApiError::InvalidRequest("task_id cannot be empty".into()));
    }

    let task_id = TaskId::from(id);
    let found = handler.cancel_task(&task_id).await?;
    debug!(%task_id, found, "cancel requested");

    Ok(Json(CancelResponse::new(task_id, found)))
}
