//! Router and handlers for the persons API.
//!
//! # Responsibility
//! - Translate HTTP requests into `PersonService` calls and back.
//! - Scope one SQLite connection to each request.
//!
//! # Invariants
//! - Service work runs on the blocking pool; handlers never hold a
//!   connection across an await point.
//! - Only the database path is shared between requests.

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use staffskills_core::db::open_db;
use staffskills_core::{
    core_version, PersonId, PersonRequestDto, PersonResponseDto, PersonService, ServiceResult,
    SqlitePersonRepository,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

const PERSONS_PATH: &str = "/api/v1/persons";

/// Shared, immutable handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    /// Creates state pointing at an already migrated database file.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }
}

/// Liveness probe payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(PERSONS_PATH, get(list_persons).post(create_person))
        .route(
            "/api/v1/persons/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serves the router on `listener` until the process ends.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Serves the router until `shutdown` resolves, then drains in-flight requests.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: core_version().to_string(),
    })
}

async fn list_persons(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonResponseDto>>, ApiError> {
    let persons = with_person_service(&state, "person_list", |service| service.list_all()).await?;
    Ok(Json(persons))
}

async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<PersonId>,
) -> Result<Json<PersonResponseDto>, ApiError> {
    with_person_service(&state, "person_get", move |service| service.get_by_id(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<PersonRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let created = with_person_service(&state, "person_create", move |service| {
        service.create(&request)
    })
    .await?;

    let location = format!("{PERSONS_PATH}/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<PersonId>,
    payload: Result<Json<PersonRequestDto>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    match with_person_service(&state, "person_update", move |service| {
        service.update(id, &request)
    })
    .await?
    {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::NotFound(id)),
    }
}

async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<PersonId>,
) -> Result<StatusCode, ApiError> {
    if with_person_service(&state, "person_delete", move |service| service.delete(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

/// Opens a request-scoped connection, runs `f` on the blocking pool and
/// drops the connection before returning.
async fn with_person_service<T, F>(state: &AppState, op: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut PersonService<SqlitePersonRepository<'_>>) -> ServiceResult<T>
        + Send
        + 'static,
{
    let db_path = Arc::clone(&state.db_path);
    tokio::task::spawn_blocking(move || {
        let mut conn = open_db(db_path.as_path()).map_err(|err| ApiError::internal(op, err))?;
        let repo = SqlitePersonRepository::try_new(&mut conn)
            .map_err(|err| ApiError::internal(op, err))?;
        let mut service = PersonService::new(repo);
        f(&mut service).map_err(|err| ApiError::from_service(op, err))
    })
    .await
    .map_err(|err| ApiError::internal(op, err))?
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
