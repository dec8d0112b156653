//! In-memory storage backend implementation.
//!
//! Used by the test suite and when no DATABASE_URL is configured. A single
//! RwLock per table stands in for the database's transaction boundary, so
//! the activate sequence (clear all, set one) happens under one write lock
//! and readers never observe a partial state.

use super::{StorageError, traits::StorageBackend};
use crate::models::{
    Form, FormUpdate, NewForm, NewResponse, Response, ResponseFilter, ResponseStats,
    ResponseUpdate,
};
use crate::reference_code::{self, CodeGenerationError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryStorageBackend {
    forms: RwLock<HashMap<Uuid, Form>>,
    responses: RwLock<HashMap<Uuid, Response>>,
}

impl MemoryStorageBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(mut items: Vec<T>, offset: u64, limit: u64) -> (Vec<T>, u64)
where
    T: Clone,
{
    let total = items.len() as u64;
    let start = (offset as usize).min(items.len());
    let end = (start + limit as usize).min(items.len());
    (items.drain(start..end).collect(), total)
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn create_form(&self, new: NewForm) -> Result<Form, StorageError> {
        let form = Form::from_new(new, Utc::now());
        let mut forms = self.forms.write().await;
        forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn get_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        let forms = self.forms.read().await;
        Ok(forms.get(&form_id).cloned())
    }

    async fn get_active_form(&self) -> Result<Option<Form>, StorageError> {
        let forms = self.forms.read().await;
        Ok(forms
            .values()
            .filter(|f| f.is_active)
            .max_by_key(|f| f.created_at)
            .cloned())
    }

    async fn list_forms(
        &self,
        offset: u64,
        limit: u64,
        is_active: Option<bool>,
    ) -> Result<(Vec<Form>, u64), StorageError> {
        let forms = self.forms.read().await;
        let mut matching: Vec<Form> = forms
            .values()
            .filter(|f| is_active.is_none_or(|active| f.is_active == active))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matching, offset, limit))
    }

    async fn update_form(
        &self,
        form_id: Uuid,
        update: FormUpdate,
    ) -> Result<Option<Form>, StorageError> {
        let mut forms = self.forms.write().await;
        let Some(form) = forms.get_mut(&form_id) else {
            return Ok(None);
        };
        if !update.is_empty() {
            form.apply_update(update, Utc::now());
        }
        Ok(Some(form.clone()))
    }

    async fn delete_form(&self, form_id: Uuid) -> Result<bool, StorageError> {
        let mut forms = self.forms.write().await;
        let removed = forms.remove(&form_id).is_some();
        if removed {
            // Cascade: a deleted form takes its responses with it
            let mut responses = self.responses.write().await;
            responses.retain(|_, r| r.form_id != form_id);
        }
        Ok(removed)
    }

    async fn activate_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        let mut forms = self.forms.write().await;
        if !forms.contains_key(&form_id) {
            return Ok(None);
        }
        let now = Utc::now();
        for form in forms.values_mut() {
            form.is_active = false;
        }
        let form = forms
            .get_mut(&form_id)
            .ok_or_else(|| StorageError::Other("form vanished during activation".to_string()))?;
        form.is_active = true;
        form.updated_at = now;
        Ok(Some(form.clone()))
    }

    async fn deactivate_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        let mut forms = self.forms.write().await;
        let Some(form) = forms.get_mut(&form_id) else {
            return Ok(None);
        };
        form.is_active = false;
        form.updated_at = Utc::now();
        Ok(Some(form.clone()))
    }

    async fn create_response(&self, new: NewResponse) -> Result<Response, StorageError> {
        let mut responses = self.responses.write().await;
        let code = reference_code::generate_unique_code(|candidate| {
            responses.values().any(|r| r.reference_code == candidate)
        })
        .map_err(|CodeGenerationError::Exhausted { attempts }| {
            StorageError::CodeGenerationExhausted { attempts }
        })?;

        let response = Response::from_new(new, code, Utc::now());
        responses.insert(response.id, response.clone());
        Ok(response)
    }

    async fn get_response(&self, response_id: Uuid) -> Result<Option<Response>, StorageError> {
        let responses = self.responses.read().await;
        Ok(responses.get(&response_id).cloned())
    }

    async fn get_response_by_reference(
        &self,
        reference_code: &str,
    ) -> Result<Option<Response>, StorageError> {
        let responses = self.responses.read().await;
        Ok(responses
            .values()
            .find(|r| r.reference_code == reference_code)
            .cloned())
    }

    async fn list_responses(
        &self,
        offset: u64,
        limit: u64,
        filter: &ResponseFilter,
    ) -> Result<(Vec<Response>, u64), StorageError> {
        let responses = self.responses.read().await;
        let mut matching: Vec<Response> = responses
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matching, offset, limit))
    }

    async fn update_response(
        &self,
        response_id: Uuid,
        update: ResponseUpdate,
    ) -> Result<Option<Response>, StorageError> {
        let mut responses = self.responses.write().await;
        let Some(response) = responses.get_mut(&response_id) else {
            return Ok(None);
        };
        response.apply_update(update, Utc::now());
        Ok(Some(response.clone()))
    }

    async fn delete_response(&self, response_id: Uuid) -> Result<bool, StorageError> {
        let mut responses = self.responses.write().await;
        Ok(responses.remove(&response_id).is_some())
    }

    async fn submit_response(
        &self,
        response_id: Uuid,
    ) -> Result<Option<Response>, StorageError> {
        let mut responses = self.responses.write().await;
        let Some(response) = responses.get_mut(&response_id) else {
            return Ok(None);
        };
        response.submit(Utc::now());
        Ok(Some(response.clone()))
    }

    async fn response_stats(
        &self,
        form_id: Option<Uuid>,
    ) -> Result<ResponseStats, StorageError> {
        let responses = self.responses.read().await;
        let mut stats = ResponseStats::default();
        for response in responses
            .values()
            .filter(|r| form_id.is_none_or(|id| r.form_id == id))
        {
            stats.record(response.status, response.priority);
        }
        Ok(stats)
    }
}
