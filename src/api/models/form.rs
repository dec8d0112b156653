use super::enums::QuestionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Suffix appended to the title of a duplicated form.
pub const COPY_SUFFIX: &str = " (Copy)";

/// A single question embedded in a form.
///
/// Questions are not persisted standalone; the ordered sequence lives in
/// the form's JSONB document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
}

/// A report form presented to anonymous reporters.
///
/// Invariant: at most one form is active across the whole collection,
/// enforced by the storage layer's activate operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewForm {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// Partial update payload for a form. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub is_active: Option<bool>,
}

impl FormUpdate {
    /// True when no field is set; such an update is a no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.questions.is_none()
            && self.is_active.is_none()
    }
}

impl Form {
    /// Build a fresh form from a creation payload.
    pub fn from_new(new: NewForm, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            questions: new.questions,
            is_active: new.is_active,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creation payload for a copy of this form: title suffixed with the
    /// copy marker, same description and questions, never active. The copy
    /// gets a fresh id and version on creation.
    pub fn duplicate_payload(&self) -> NewForm {
        NewForm {
            title: format!("{}{}", self.title, COPY_SUFFIX),
            description: self.description.clone(),
            questions: self.questions.clone(),
            is_active: false,
        }
    }

    /// Apply a partial update in place, bumping updated_at.
    pub fn apply_update(&mut self, update: FormUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(questions) = update.questions {
            self.questions = questions;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

/// Slim form shape for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormListItem {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_count: usize,
    pub response_count: u64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Form> for FormListItem {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id,
            title: form.title.clone(),
            description: form.description.clone(),
            question_count: form.questions.len(),
            response_count: 0,
            is_active: form.is_active,
            created_at: form.created_at,
        }
    }
}
