//! Storage trait definitions for the API storage backends.

use crate::models::{
    Form, FormUpdate, NewForm, NewResponse, Response, ResponseFilter, ResponseStats,
    ResponseUpdate,
};
use uuid::Uuid;

/// Storage backend trait for database operations.
///
/// Each logical operation executes as one atomic unit of work; callers can
/// assume no partial visibility (in particular, form activation never
/// exposes an intermediate zero-active or two-active state to readers).
/// Operations on a missing entity return `Ok(None)` / `Ok(false)`; the
/// service layer turns those into NotFound.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), super::StorageError>;

    /// Create a new form.
    async fn create_form(&self, new: NewForm) -> Result<Form, super::StorageError>;

    /// Get form by ID.
    async fn get_form(&self, form_id: Uuid) -> Result<Option<Form>, super::StorageError>;

    /// Get the active form. If the single-active invariant was ever
    /// violated, returns the most recently created active form.
    async fn get_active_form(&self) -> Result<Option<Form>, super::StorageError>;

    /// List forms ordered by creation time descending, with the total
    /// count of matching rows.
    async fn list_forms(
        &self,
        offset: u64,
        limit: u64,
        is_active: Option<bool>,
    ) -> Result<(Vec<Form>, u64), super::StorageError>;

    /// Apply a partial update to a form.
    async fn update_form(
        &self,
        form_id: Uuid,
        update: FormUpdate,
    ) -> Result<Option<Form>, super::StorageError>;

    /// Delete a form, cascading to its responses. Returns whether a row
    /// was removed.
    async fn delete_form(&self, form_id: Uuid) -> Result<bool, super::StorageError>;

    /// Activate one form and deactivate every other, atomically. Returns
    /// `None` if the form does not exist.
    async fn activate_form(&self, form_id: Uuid) -> Result<Option<Form>, super::StorageError>;

    /// Deactivate a single form, never touching others. Zero active forms
    /// is a legal state.
    async fn deactivate_form(&self, form_id: Uuid) -> Result<Option<Form>, super::StorageError>;

    /// Create a new response with a generated, uniqueness-checked
    /// reference code. Fails with `CodeGenerationExhausted` when the retry
    /// budget runs out.
    async fn create_response(&self, new: NewResponse) -> Result<Response, super::StorageError>;

    /// Get response by ID.
    async fn get_response(
        &self,
        response_id: Uuid,
    ) -> Result<Option<Response>, super::StorageError>;

    /// Get response by reference code.
    async fn get_response_by_reference(
        &self,
        reference_code: &str,
    ) -> Result<Option<Response>, super::StorageError>;

    /// List responses ordered by creation time descending, filtered, with
    /// the total count of matching rows.
    async fn list_responses(
        &self,
        offset: u64,
        limit: u64,
        filter: &ResponseFilter,
    ) -> Result<(Vec<Response>, u64), super::StorageError>;

    /// Apply a partial update to a response, evaluating status side
    /// effects against the persisted prior state.
    async fn update_response(
        &self,
        response_id: Uuid,
        update: ResponseUpdate,
    ) -> Result<Option<Response>, super::StorageError>;

    /// Delete a response. Returns whether a row was removed.
    async fn delete_response(&self, response_id: Uuid) -> Result<bool, super::StorageError>;

    /// Force a response into submitted state, overwriting submitted_at.
    async fn submit_response(
        &self,
        response_id: Uuid,
    ) -> Result<Option<Response>, super::StorageError>;

    /// Count responses by status and priority, optionally scoped to one
    /// form. Full scan of matching rows.
    async fn response_stats(
        &self,
        form_id: Option<Uuid>,
    ) -> Result<ResponseStats, super::StorageError>;
}
