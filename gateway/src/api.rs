//! HTTP handlers for the admin gateway.
//!
//! Every endpoint takes the same string parameters the query builder
//! understands (`kind`, `ancestor`, repeatable `filter`, `limit`);
//! translation failures come back as 400 with the offending input
//! named, store failures as 500.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use canopy_query::{build_query, QueryError};
use canopy_store::{delete_in_batches, EntityStore, FetchOptions, StoreError};
use canopy_types::Row;
use tracing::info;

use crate::params::RequestParams;

const DEFAULT_LIST_LIMIT: usize = 100;
const DEFAULT_COUNT_LIMIT: usize = 10_000;
const DEFAULT_DELETE_LIMIT: usize = 10_000;

/// Shared handler state: the injected store handle.
#[derive(Clone)]
pub struct GatewayState {
    store: Arc<dyn EntityStore>,
}

impl GatewayState {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }
}

/// Build the HTTP router over the given state.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/db/entity", get(list_entities).delete(delete_entities))
        .route("/db/entity/count", get(count_entities))
        .route("/db/kind", get(list_kinds))
        .with_state(state)
}

async fn list_entities(
    State(state): State<GatewayState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Row>>, ApiError> {
    let params = RequestParams::read(raw.as_deref(), DEFAULT_LIST_LIMIT)
        .map_err(ApiError::BadRequest)?;
    let query = build_query(&params.kind, &params.ancestor, &params.filters)?;
    let options = FetchOptions::for_limit(params.limit);
    info!("list: {:?} {:?}", query, options);

    let entities = state.store.run_query(&query, &options).await?;
    let rows: Vec<Row> = entities.iter().map(Row::project).collect();
    Ok(Json(rows))
}

async fn count_entities(
    State(state): State<GatewayState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<usize>, ApiError> {
    let params = RequestParams::read(raw.as_deref(), DEFAULT_COUNT_LIMIT)
        .map_err(ApiError::BadRequest)?;
    let query = build_query(&params.kind, &params.ancestor, &params.filters)?.keys_only();
    let options = FetchOptions::for_limit(params.limit);
    info!("count: {:?} {:?}", query, options);

    let entities = state.store.run_query(&query, &options).await?;
    Ok(Json(entities.len()))
}

async fn delete_entities(
    State(state): State<GatewayState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<usize>, ApiError> {
    let params = RequestParams::read(raw.as_deref(), DEFAULT_DELETE_LIMIT)
        .map_err(ApiError::BadRequest)?;
    let query = build_query(&params.kind, &params.ancestor, &params.filters)?;
    let options = FetchOptions::for_limit(params.limit);
    info!("delete: {:?} {:?}", query, options);

    let deleted = delete_in_batches(state.store.as_ref(), query, options).await?;
    info!("deleted {} entities", deleted);
    Ok(Json(deleted))
}

async fn list_kinds(State(state): State<GatewayState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.kinds().await?))
}

/// Errors surfaced to HTTP clients as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
