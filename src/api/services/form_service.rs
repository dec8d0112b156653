//! Form operations: CRUD, duplication, and the single-active invariant.

use super::Pagination;
use crate::models::{Form, FormListItem, FormUpdate, NewForm, PaginatedResponse};
use crate::routes::error::ApiError;
use crate::storage::StorageBackend;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Maximum title length, matching the VARCHAR(255) column.
const MAX_TITLE_LEN: usize = 255;

/// Form service backed by a storage backend.
pub struct FormService {
    storage: Arc<dyn StorageBackend>,
}

impl FormService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    fn validate_title(title: &str) -> Result<(), ApiError> {
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ApiError::Validation(format!(
                "title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
        Ok(())
    }

    /// Create a new form. A form with zero questions is rejected.
    pub async fn create_form(&self, new: NewForm) -> Result<Form, ApiError> {
        Self::validate_title(&new.title)?;
        if new.questions.is_empty() {
            return Err(ApiError::Validation(
                "Form must have at least one question".to_string(),
            ));
        }

        let form = self.storage.create_form(new).await?;
        info!(form_id = %form.id, "form created");
        Ok(form)
    }

    /// Get form by ID.
    pub async fn get_form(&self, form_id: Uuid) -> Result<Form, ApiError> {
        self.storage
            .get_form(form_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))
    }

    /// Get the active form.
    pub async fn get_active_form(&self) -> Result<Form, ApiError> {
        self.storage
            .get_active_form()
            .await?
            .ok_or_else(|| ApiError::NotFound("No active form found".to_string()))
    }

    /// List forms with pagination and an optional is_active filter.
    pub async fn get_all_forms(
        &self,
        pagination: Pagination,
        is_active: Option<bool>,
    ) -> Result<PaginatedResponse<FormListItem>, ApiError> {
        let (forms, total) = self
            .storage
            .list_forms(pagination.offset(), pagination.page_size as u64, is_active)
            .await?;

        let items = forms.iter().map(FormListItem::from).collect();
        Ok(PaginatedResponse::new(
            items,
            total,
            pagination.page,
            pagination.page_size,
        ))
    }

    /// Apply a partial update. An empty payload returns the current form.
    pub async fn update_form(&self, form_id: Uuid, update: FormUpdate) -> Result<Form, ApiError> {
        if let Some(title) = &update.title {
            Self::validate_title(title)?;
        }

        self.storage
            .update_form(form_id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))
    }

    /// Delete a form, cascading to its responses.
    pub async fn delete_form(&self, form_id: Uuid) -> Result<(), ApiError> {
        if !self.storage.delete_form(form_id).await? {
            return Err(ApiError::NotFound("Form not found".to_string()));
        }
        info!(form_id = %form_id, "form deleted");
        Ok(())
    }

    /// Duplicate a form: fresh id, copy-marked title, never active.
    pub async fn duplicate_form(&self, form_id: Uuid) -> Result<Form, ApiError> {
        let existing = self.get_form(form_id).await?;
        let copy = self.storage.create_form(existing.duplicate_payload()).await?;
        info!(source = %form_id, copy = %copy.id, "form duplicated");
        Ok(copy)
    }

    /// Activate a form, deactivating every other one atomically.
    pub async fn activate_form(&self, form_id: Uuid) -> Result<Form, ApiError> {
        let form = self
            .storage
            .activate_form(form_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;
        info!(form_id = %form_id, "form activated");
        Ok(form)
    }

    /// Deactivate a single form. Zero active forms is a legal state.
    pub async fn deactivate_form(&self, form_id: Uuid) -> Result<Form, ApiError> {
        let form = self
            .storage
            .deactivate_form(form_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Form not found".to_string()))?;
        info!(form_id = %form_id, "form deactivated");
        Ok(form)
    }
}
