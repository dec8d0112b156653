//! Response operations: creation with reference codes, triage updates,
//! submission, and statistics.

use super::Pagination;
use crate::models::{
    NewResponse, PaginatedResponse, Response, ResponseFilter, ResponseListItem, ResponseStats,
    ResponseUpdate,
};
use crate::reference_code;
use crate::routes::error::ApiError;
use crate::storage::StorageBackend;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Response service backed by a storage backend.
pub struct ResponseService {
    storage: Arc<dyn StorageBackend>,
}

impl ResponseService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Create a response against an existing form. The storage backend
    /// assigns a uniqueness-checked reference code.
    pub async fn create_response(&self, new: NewResponse) -> Result<Response, ApiError> {
        if self.storage.get_form(new.form_id).await?.is_none() {
            return Err(ApiError::NotFound("Form not found".to_string()));
        }

        let response = self.storage.create_response(new).await?;
        info!(
            response_id = %response.id,
            reference_code = %response.reference_code,
            "response created"
        );
        Ok(response)
    }

    /// Get response by ID.
    pub async fn get_response(&self, response_id: Uuid) -> Result<Response, ApiError> {
        self.storage
            .get_response(response_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Response not found".to_string()))
    }

    /// Get response by reference code. Malformed codes are rejected
    /// before storage is consulted.
    pub async fn get_response_by_reference(&self, code: &str) -> Result<Response, ApiError> {
        if !reference_code::validate_format(code) {
            return Err(ApiError::Validation(
                "Invalid reference code format".to_string(),
            ));
        }

        self.storage
            .get_response_by_reference(code)
            .await?
            .ok_or_else(|| ApiError::NotFound("Response not found".to_string()))
    }

    /// List responses with pagination and filters.
    pub async fn get_all_responses(
        &self,
        pagination: Pagination,
        filter: ResponseFilter,
    ) -> Result<PaginatedResponse<ResponseListItem>, ApiError> {
        let (responses, total) = self
            .storage
            .list_responses(pagination.offset(), pagination.page_size as u64, &filter)
            .await?;

        let items = responses.iter().map(ResponseListItem::from).collect();
        Ok(PaginatedResponse::new(
            items,
            total,
            pagination.page,
            pagination.page_size,
        ))
    }

    /// Apply a partial update. An empty payload returns the current
    /// response unchanged.
    pub async fn update_response(
        &self,
        response_id: Uuid,
        update: ResponseUpdate,
    ) -> Result<Response, ApiError> {
        self.storage
            .update_response(response_id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound("Response not found".to_string()))
    }

    /// Delete a response.
    pub async fn delete_response(&self, response_id: Uuid) -> Result<(), ApiError> {
        if !self.storage.delete_response(response_id).await? {
            return Err(ApiError::NotFound("Response not found".to_string()));
        }
        info!(response_id = %response_id, "response deleted");
        Ok(())
    }

    /// Submit a response: forces submitted status and re-stamps
    /// submitted_at every time, unlike the update path.
    pub async fn submit_response(&self, response_id: Uuid) -> Result<Response, ApiError> {
        let response = self
            .storage
            .submit_response(response_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Response not found".to_string()))?;
        info!(response_id = %response_id, "response submitted");
        Ok(response)
    }

    /// Aggregate counts by status and priority, optionally per form.
    pub async fn get_response_stats(
        &self,
        form_id: Option<Uuid>,
    ) -> Result<ResponseStats, ApiError> {
        Ok(self.storage.response_stats(form_id).await?)
    }
}
