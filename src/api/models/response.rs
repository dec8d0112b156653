use super::enums::{ResponsePriority, ResponseStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// An anonymous submission against a form.
///
/// The reference code is the reporter's only lookup token. It is assigned
/// at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub form_id: Uuid,
    pub data: Map<String, Value>,
    pub reference_code: String,
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ResponsePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a response.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResponse {
    pub form_id: Uuid,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

/// Partial update payload for a response. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseUpdate {
    pub data: Option<Map<String, Value>>,
    pub status: Option<ResponseStatus>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub priority: Option<ResponsePriority>,
}

impl ResponseUpdate {
    /// True when no field is set; such an update is a no-op.
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.tags.is_none()
            && self.priority.is_none()
    }
}

impl Response {
    /// Build a fresh response with an already-vetted reference code.
    ///
    /// Status defaults to submitted; creating in submitted state stamps
    /// submitted_at at creation. Priority defaults to medium.
    pub fn from_new(new: NewResponse, reference_code: String, now: DateTime<Utc>) -> Self {
        let status = new.status.unwrap_or(ResponseStatus::Submitted);
        let submitted_at = (status == ResponseStatus::Submitted).then_some(now);

        Self {
            id: Uuid::new_v4(),
            form_id: new.form_id,
            data: new.data,
            reference_code,
            status,
            priority: Some(ResponsePriority::Medium),
            notes: None,
            tags: None,
            submitted_at,
            reviewed_at: None,
            reviewed_by: None,
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place, evaluating status side effects
    /// against the persisted prior state:
    ///
    /// - into submitted: stamp submitted_at only if previously unset
    /// - into reviewed: re-stamp reviewed_at on every transition
    ///
    /// An empty update leaves the response untouched, including updated_at.
    pub fn apply_update(&mut self, update: ResponseUpdate, now: DateTime<Utc>) {
        if update.is_empty() {
            return;
        }

        if let Some(status) = update.status {
            if status == ResponseStatus::Submitted && self.submitted_at.is_none() {
                self.submitted_at = Some(now);
            }
            if status == ResponseStatus::Reviewed {
                self.reviewed_at = Some(now);
            }
            self.status = status;
        }
        if let Some(data) = update.data {
            self.data = data;
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(tags) = update.tags {
            self.tags = Some(tags);
        }
        if let Some(priority) = update.priority {
            self.priority = Some(priority);
        }
        self.updated_at = now;
    }

    /// The dedicated submit operation: forces status to submitted and
    /// overwrites submitted_at unconditionally, unlike the update path
    /// which stamps it only once.
    pub fn submit(&mut self, now: DateTime<Utc>) {
        self.status = ResponseStatus::Submitted;
        self.submitted_at = Some(now);
        self.updated_at = now;
    }
}

/// Slim response shape for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseListItem {
    pub id: Uuid,
    pub form_id: Uuid,
    pub reference_code: String,
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ResponsePriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Response> for ResponseListItem {
    fn from(response: &Response) -> Self {
        Self {
            id: response.id,
            form_id: response.form_id,
            reference_code: response.reference_code.clone(),
            status: response.status,
            priority: response.priority,
            submitted_at: response.submitted_at,
            created_at: response.created_at,
        }
    }
}

/// Listing filters for responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseFilter {
    pub status: Option<ResponseStatus>,
    pub priority: Option<ResponsePriority>,
    pub form_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl ResponseFilter {
    /// In-memory predicate mirroring the SQL filter clauses.
    pub fn matches(&self, response: &Response) -> bool {
        if let Some(status) = self.status {
            if response.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if response.priority != Some(priority) {
                return false;
            }
        }
        if let Some(form_id) = self.form_id {
            if response.form_id != form_id {
                return false;
            }
        }
        if let Some(date_from) = self.date_from {
            if response.created_at < date_from {
                return false;
            }
        }
        if let Some(date_to) = self.date_to {
            if response.created_at > date_to {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_code = response.reference_code.to_lowercase().contains(&needle);
            let in_notes = response
                .notes
                .as_ref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));
            if !in_code && !in_notes {
                return false;
            }
        }
        true
    }
}

/// Aggregated counts over responses. Built by a full scan of matching
/// rows; administrative scale, O(n).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseStats {
    pub total: u64,
    pub by_status: HashMap<String, u64>,
    pub by_priority: HashMap<String, u64>,
}

impl ResponseStats {
    /// Count one response into the aggregates.
    pub fn record(&mut self, status: ResponseStatus, priority: Option<ResponsePriority>) {
        self.total += 1;
        *self.by_status.entry(status.to_string()).or_insert(0) += 1;
        if let Some(priority) = priority {
            *self.by_priority.entry(priority.to_string()).or_insert(0) += 1;
        }
    }
}
