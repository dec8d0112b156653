//! Response routes: creation, reference-code lookup, triage, stats.

use super::{ApiError, AppState};
use crate::models::{
    NewResponse, PaginatedResponse, Response, ResponseFilter, ResponseListItem, ResponsePriority,
    ResponseStats, ResponseStatus, ResponseUpdate, SuccessResponse,
};
use crate::services::{Pagination, ResponseService};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for GET /responses
#[derive(Debug, Deserialize)]
pub struct ListResponsesQuery {
    page: Option<u32>,
    page_size: Option<u32>,
    status: Option<ResponseStatus>,
    priority: Option<ResponsePriority>,
    form_id: Option<Uuid>,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
    search: Option<String>,
}

/// Query parameters for GET /responses/stats
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    form_id: Option<Uuid>,
}

/// Create the responses router.
pub fn responses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_responses).post(create_response))
        .route("/reference/{reference_code}", get(get_response_by_reference))
        .route("/stats", get(get_response_stats))
        .route(
            "/{response_id}",
            get(get_response).patch(update_response).delete(delete_response),
        )
        .route("/{response_id}/submit", post(submit_response))
}

/// POST /responses - Create a new response.
async fn create_response(
    State(state): State<AppState>,
    Json(new): Json<NewResponse>,
) -> Result<(StatusCode, Json<Response>), ApiError> {
    let response = ResponseService::new(state.storage.clone())
        .create_response(new)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /responses - List responses with pagination and filters.
async fn get_all_responses(
    State(state): State<AppState>,
    Query(query): Query<ListResponsesQuery>,
) -> Result<Json<PaginatedResponse<ResponseListItem>>, ApiError> {
    let pagination = Pagination::new(query.page.unwrap_or(1), query.page_size.unwrap_or(20))?;
    let filter = ResponseFilter {
        status: query.status,
        priority: query.priority,
        form_id: query.form_id,
        date_from: query.date_from,
        date_to: query.date_to,
        search: query.search,
    };

    let page = ResponseService::new(state.storage.clone())
        .get_all_responses(pagination, filter)
        .await?;
    Ok(Json(page))
}

/// GET /responses/reference/:reference_code - Look up by reference code.
async fn get_response_by_reference(
    State(state): State<AppState>,
    Path(reference_code): Path<String>,
) -> Result<Json<Response>, ApiError> {
    let response = ResponseService::new(state.storage.clone())
        .get_response_by_reference(&reference_code)
        .await?;
    Ok(Json(response))
}

/// GET /responses/stats - Aggregate counts, optionally per form.
async fn get_response_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ResponseStats>, ApiError> {
    let stats = ResponseService::new(state.storage.clone())
        .get_response_stats(query.form_id)
        .await?;
    Ok(Json(stats))
}

/// GET /responses/:response_id - Get a response by ID.
async fn get_response(
    State(state): State<AppState>,
    Path(response_id): Path<Uuid>,
) -> Result<Json<Response>, ApiError> {
    let response = ResponseService::new(state.storage.clone())
        .get_response(response_id)
        .await?;
    Ok(Json(response))
}

/// PATCH /responses/:response_id - Partially update a response.
async fn update_response(
    State(state): State<AppState>,
    Path(response_id): Path<Uuid>,
    Json(update): Json<ResponseUpdate>,
) -> Result<Json<Response>, ApiError> {
    let response = ResponseService::new(state.storage.clone())
        .update_response(response_id, update)
        .await?;
    Ok(Json(response))
}

/// DELETE /responses/:response_id - Delete a response.
async fn delete_response(
    State(state): State<AppState>,
    Path(response_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    ResponseService::new(state.storage.clone())
        .delete_response(response_id)
        .await?;
    Ok(Json(SuccessResponse::new("Response deleted successfully")))
}

/// POST /responses/:response_id/submit - Submit a response.
async fn submit_response(
    State(state): State<AppState>,
    Path(response_id): Path<Uuid>,
) -> Result<Json<Response>, ApiError> {
    let response = ResponseService::new(state.storage.clone())
        .submit_response(response_id)
        .await?;
    Ok(Json(response))
}
