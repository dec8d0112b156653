//! Form routes: CRUD, duplication, activation.

use super::{ApiError, AppState};
use crate::models::{Form, FormListItem, FormUpdate, NewForm, PaginatedResponse, SuccessResponse};
use crate::services::{FormService, Pagination};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for GET /forms
#[derive(Debug, Deserialize)]
pub struct ListFormsQuery {
    page: Option<u32>,
    page_size: Option<u32>,
    is_active: Option<bool>,
}

/// Create the forms router.
pub fn forms_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_forms).post(create_form))
        .route("/active", get(get_active_form))
        .route(
            "/{form_id}",
            get(get_form).patch(update_form).delete(delete_form),
        )
        .route("/{form_id}/duplicate", post(duplicate_form))
        .route("/{form_id}/activate", post(activate_form))
        .route("/{form_id}/deactivate", post(deactivate_form))
}

/// POST /forms - Create a new form.
async fn create_form(
    State(state): State<AppState>,
    Json(new): Json<NewForm>,
) -> Result<(StatusCode, Json<Form>), ApiError> {
    let form = FormService::new(state.storage.clone())
        .create_form(new)
        .await?;
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /forms/active - Get the currently active form.
async fn get_active_form(State(state): State<AppState>) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .get_active_form()
        .await?;
    Ok(Json(form))
}

/// GET /forms - List forms with pagination.
async fn get_all_forms(
    State(state): State<AppState>,
    Query(query): Query<ListFormsQuery>,
) -> Result<Json<PaginatedResponse<FormListItem>>, ApiError> {
    let pagination = Pagination::new(query.page.unwrap_or(1), query.page_size.unwrap_or(20))?;
    let page = FormService::new(state.storage.clone())
        .get_all_forms(pagination, query.is_active)
        .await?;
    Ok(Json(page))
}

/// GET /forms/:form_id - Get a form by ID.
async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .get_form(form_id)
        .await?;
    Ok(Json(form))
}

/// PATCH /forms/:form_id - Partially update a form.
async fn update_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .update_form(form_id, update)
        .await?;
    Ok(Json(form))
}

/// DELETE /forms/:form_id - Delete a form and its responses.
async fn delete_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    FormService::new(state.storage.clone())
        .delete_form(form_id)
        .await?;
    Ok(Json(SuccessResponse::new("Form deleted successfully")))
}

/// POST /forms/:form_id/duplicate - Copy a form.
async fn duplicate_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .duplicate_form(form_id)
        .await?;
    Ok(Json(form))
}

/// POST /forms/:form_id/activate - Activate a form, deactivating all others.
async fn activate_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .activate_form(form_id)
        .await?;
    Ok(Json(form))
}

/// POST /forms/:form_id/deactivate - Deactivate a single form.
async fn deactivate_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .deactivate_form(form_id)
        .await?;
    Ok(Json(form))
}
