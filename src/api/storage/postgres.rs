//! PostgreSQL storage backend implementation.
//!
//! Uses sqlx for database operations and implements the StorageBackend
//! trait. Queries go through the runtime API with `FromRow` row structs so
//! the crate builds without a live database.

use super::{StorageError, traits::StorageBackend};
use crate::models::{
    Form, FormUpdate, NewForm, NewResponse, Response, ResponseFilter, ResponseStats,
    ResponseUpdate,
};
use crate::reference_code;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

const FORM_COLUMNS: &str =
    "id, title, description, questions, is_active, version, created_at, updated_at";

const RESPONSE_COLUMNS: &str = "id, form_id, data, reference_code, status, priority, notes, \
     tags, submitted_at, reviewed_at, reviewed_by, metadata, created_at, updated_at";

/// PostgreSQL storage backend implementation.
pub struct PostgresStorageBackend {
    pool: PgPool,
}

impl PostgresStorageBackend {
    /// Create a new PostgreSQL storage backend.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FormRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    questions: serde_json::Value,
    is_active: bool,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FormRow> for Form {
    type Error = StorageError;

    fn try_from(row: FormRow) -> Result<Self, Self::Error> {
        let questions = serde_json::from_value(row.questions)
            .map_err(|e| StorageError::Other(format!("Failed to deserialize questions: {}", e)))?;
        Ok(Form {
            id: row.id,
            title: row.title,
            description: row.description,
            questions,
            is_active: row.is_active,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: Uuid,
    form_id: Uuid,
    data: serde_json::Value,
    reference_code: String,
    status: String,
    priority: Option<String>,
    notes: Option<String>,
    tags: Option<serde_json::Value>,
    submitted_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<Uuid>,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResponseRow> for Response {
    type Error = StorageError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        let data = serde_json::from_value(row.data)
            .map_err(|e| StorageError::Other(format!("Failed to deserialize data: {}", e)))?;
        let status = row.status.parse().map_err(StorageError::Other)?;
        let priority = row
            .priority
            .map(|p| p.parse().map_err(StorageError::Other))
            .transpose()?;
        let tags = row
            .tags
            .map(|t| {
                serde_json::from_value(t)
                    .map_err(|e| StorageError::Other(format!("Failed to deserialize tags: {}", e)))
            })
            .transpose()?;
        let metadata = row
            .metadata
            .map(|m| {
                serde_json::from_value(m).map_err(|e| {
                    StorageError::Other(format!("Failed to deserialize metadata: {}", e))
                })
            })
            .transpose()?;

        Ok(Response {
            id: row.id,
            form_id: row.form_id,
            data,
            reference_code: row.reference_code,
            status,
            priority,
            notes: row.notes,
            tags,
            submitted_at: row.submitted_at,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by,
            metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn connection_error(e: sqlx::Error) -> StorageError {
    StorageError::ConnectionError(e.to_string())
}

fn serialize_error(what: &str, e: serde_json::Error) -> StorageError {
    StorageError::Other(format!("Failed to serialize {}: {}", what, e))
}

fn push_response_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ResponseFilter) {
    let mut prefix = " WHERE ";
    let mut sep = |qb: &mut QueryBuilder<'_, Postgres>| {
        qb.push(prefix);
        prefix = " AND ";
    };

    if let Some(status) = filter.status {
        sep(qb);
        qb.push("status = ").push_bind(status.to_string());
    }
    if let Some(priority) = filter.priority {
        sep(qb);
        qb.push("priority = ").push_bind(priority.to_string());
    }
    if let Some(form_id) = filter.form_id {
        sep(qb);
        qb.push("form_id = ").push_bind(form_id);
    }
    if let Some(date_from) = filter.date_from {
        sep(qb);
        qb.push("created_at >= ").push_bind(date_from);
    }
    if let Some(date_to) = filter.date_to {
        sep(qb);
        qb.push("created_at <= ").push_bind(date_to);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        sep(qb);
        qb.push("(reference_code ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR notes ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl PostgresStorageBackend {
    async fn fetch_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        let row: Option<FormRow> =
            sqlx::query_as(&format!("SELECT {} FROM forms WHERE id = $1", FORM_COLUMNS))
                .bind(form_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(connection_error)?;
        row.map(Form::try_from).transpose()
    }

    async fn fetch_response(&self, response_id: Uuid) -> Result<Option<Response>, StorageError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM responses WHERE id = $1",
            RESPONSE_COLUMNS
        ))
        .bind(response_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(connection_error)?;
        row.map(Response::try_from).transpose()
    }

    /// Write every mutable response column back. The state machine runs in
    /// Rust against the fetched row, so persistence is a plain overwrite.
    async fn store_response_fields(&self, response: &Response) -> Result<(), StorageError> {
        let data = serde_json::to_value(&response.data).map_err(|e| serialize_error("data", e))?;
        let tags = response
            .tags
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| serialize_error("tags", e))?;
        let metadata = response
            .metadata
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| serialize_error("metadata", e))?;

        sqlx::query(
            "UPDATE responses SET data = $1, status = $2, priority = $3, notes = $4, \
             tags = $5, submitted_at = $6, reviewed_at = $7, reviewed_by = $8, \
             metadata = $9, updated_at = $10 WHERE id = $11",
        )
        .bind(data)
        .bind(response.status.to_string())
        .bind(response.priority.map(|p| p.to_string()))
        .bind(&response.notes)
        .bind(tags)
        .bind(response.submitted_at)
        .bind(response.reviewed_at)
        .bind(response.reviewed_by)
        .bind(metadata)
        .bind(response.updated_at)
        .bind(response.id)
        .execute(&self.pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for PostgresStorageBackend {
    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(connection_error)?;
        Ok(())
    }

    async fn create_form(&self, new: NewForm) -> Result<Form, StorageError> {
        let form = Form::from_new(new, Utc::now());
        let questions =
            serde_json::to_value(&form.questions).map_err(|e| serialize_error("questions", e))?;

        sqlx::query(
            "INSERT INTO forms (id, title, description, questions, is_active, version, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(form.id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(questions)
        .bind(form.is_active)
        .bind(form.version)
        .bind(form.created_at)
        .bind(form.updated_at)
        .execute(&self.pool)
        .await
        .map_err(connection_error)?;

        Ok(form)
    }

    async fn get_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        self.fetch_form(form_id).await
    }

    async fn get_active_form(&self) -> Result<Option<Form>, StorageError> {
        let row: Option<FormRow> = sqlx::query_as(&format!(
            "SELECT {} FROM forms WHERE is_active = TRUE ORDER BY created_at DESC LIMIT 1",
            FORM_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(connection_error)?;
        row.map(Form::try_from).transpose()
    }

    async fn list_forms(
        &self,
        offset: u64,
        limit: u64,
        is_active: Option<bool>,
    ) -> Result<(Vec<Form>, u64), StorageError> {
        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM forms");
        if let Some(active) = is_active {
            count_qb.push(" WHERE is_active = ").push_bind(active);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(connection_error)?;

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM forms", FORM_COLUMNS));
        if let Some(active) = is_active {
            qb.push(" WHERE is_active = ").push_bind(active);
        }
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset as i64);

        let rows: Vec<FormRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(connection_error)?;

        let forms = rows
            .into_iter()
            .map(Form::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((forms, total.max(0) as u64))
    }

    async fn update_form(
        &self,
        form_id: Uuid,
        update: FormUpdate,
    ) -> Result<Option<Form>, StorageError> {
        let Some(mut form) = self.fetch_form(form_id).await? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(form));
        }

        form.apply_update(update, Utc::now());
        let questions =
            serde_json::to_value(&form.questions).map_err(|e| serialize_error("questions", e))?;

        sqlx::query(
            "UPDATE forms SET title = $1, description = $2, questions = $3, is_active = $4, \
             updated_at = $5 WHERE id = $6",
        )
        .bind(&form.title)
        .bind(&form.description)
        .bind(questions)
        .bind(form.is_active)
        .bind(form.updated_at)
        .bind(form.id)
        .execute(&self.pool)
        .await
        .map_err(connection_error)?;

        Ok(Some(form))
    }

    async fn delete_form(&self, form_id: Uuid) -> Result<bool, StorageError> {
        // Responses go with the form via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(form_id)
            .execute(&self.pool)
            .await
            .map_err(connection_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn activate_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(connection_error)?;

        let exists: Option<Uuid> = sqlx::query("SELECT id FROM forms WHERE id = $1")
            .bind(form_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(connection_error)?
            .map(|row| row.get(0));
        if exists.is_none() {
            return Ok(None);
        }

        // Two statements, one transaction: readers never see zero or two
        // active forms at a commit boundary.
        sqlx::query("UPDATE forms SET is_active = FALSE")
            .execute(&mut *tx)
            .await
            .map_err(connection_error)?;
        sqlx::query("UPDATE forms SET is_active = TRUE, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(form_id)
            .execute(&mut *tx)
            .await
            .map_err(connection_error)?;

        tx.commit().await.map_err(connection_error)?;
        self.fetch_form(form_id).await
    }

    async fn deactivate_form(&self, form_id: Uuid) -> Result<Option<Form>, StorageError> {
        let result = sqlx::query("UPDATE forms SET is_active = FALSE, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(form_id)
            .execute(&self.pool)
            .await
            .map_err(connection_error)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_form(form_id).await
    }

    async fn create_response(&self, new: NewResponse) -> Result<Response, StorageError> {
        let data = serde_json::to_value(&new.data).map_err(|e| serialize_error("data", e))?;

        // Bounded retry: draw, check, insert. The unique constraint on
        // reference_code is the backstop for two sessions racing past the
        // existence check with the same code; a violation folds back into
        // the retry budget as a collision.
        for _ in 0..reference_code::MAX_ATTEMPTS {
            let code = reference_code::generate_code();
            if self.get_response_by_reference(&code).await?.is_some() {
                continue;
            }

            let response = Response::from_new(new.clone(), code, Utc::now());
            let insert = sqlx::query(
                "INSERT INTO responses (id, form_id, data, reference_code, status, priority, \
                 notes, tags, submitted_at, reviewed_at, reviewed_by, metadata, created_at, \
                 updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            )
            .bind(response.id)
            .bind(response.form_id)
            .bind(&data)
            .bind(&response.reference_code)
            .bind(response.status.to_string())
            .bind(response.priority.map(|p| p.to_string()))
            .bind(&response.notes)
            .bind(None::<serde_json::Value>)
            .bind(response.submitted_at)
            .bind(response.reviewed_at)
            .bind(response.reviewed_by)
            .bind(None::<serde_json::Value>)
            .bind(response.created_at)
            .bind(response.updated_at)
            .execute(&self.pool)
            .await;

            match insert {
                Ok(_) => return Ok(response),
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => continue,
                Err(e) => return Err(connection_error(e)),
            }
        }

        Err(StorageError::CodeGenerationExhausted {
            attempts: reference_code::MAX_ATTEMPTS,
        })
    }

    async fn get_response(&self, response_id: Uuid) -> Result<Option<Response>, StorageError> {
        self.fetch_response(response_id).await
    }

    async fn get_response_by_reference(
        &self,
        reference_code: &str,
    ) -> Result<Option<Response>, StorageError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM responses WHERE reference_code = $1",
            RESPONSE_COLUMNS
        ))
        .bind(reference_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(connection_error)?;
        row.map(Response::try_from).transpose()
    }

    async fn list_responses(
        &self,
        offset: u64,
        limit: u64,
        filter: &ResponseFilter,
    ) -> Result<(Vec<Response>, u64), StorageError> {
        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM responses");
        push_response_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(connection_error)?;

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM responses", RESPONSE_COLUMNS));
        push_response_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset as i64);

        let rows: Vec<ResponseRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(connection_error)?;

        let responses = rows
            .into_iter()
            .map(Response::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((responses, total.max(0) as u64))
    }

    async fn update_response(
        &self,
        response_id: Uuid,
        update: ResponseUpdate,
    ) -> Result<Option<Response>, StorageError> {
        let Some(mut response) = self.fetch_response(response_id).await? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(response));
        }

        response.apply_update(update, Utc::now());
        self.store_response_fields(&response).await?;
        Ok(Some(response))
    }

    async fn delete_response(&self, response_id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM responses WHERE id = $1")
            .bind(response_id)
            .execute(&self.pool)
            .await
            .map_err(connection_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn submit_response(
        &self,
        response_id: Uuid,
    ) -> Result<Option<Response>, StorageError> {
        let result = sqlx::query(
            "UPDATE responses SET status = $1, submitted_at = $2, updated_at = $2 WHERE id = $3",
        )
        .bind(crate::models::ResponseStatus::Submitted.to_string())
        .bind(Utc::now())
        .bind(response_id)
        .execute(&self.pool)
        .await
        .map_err(connection_error)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_response(response_id).await
    }

    async fn response_stats(
        &self,
        form_id: Option<Uuid>,
    ) -> Result<ResponseStats, StorageError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT status, priority FROM responses");
        if let Some(form_id) = form_id {
            qb.push(" WHERE form_id = ").push_bind(form_id);
        }

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(connection_error)?;

        let mut stats = ResponseStats::default();
        for row in rows {
            let status: String = row.get("status");
            let priority: Option<String> = row.get("priority");
            let status = status.parse().map_err(StorageError::Other)?;
            let priority = priority
                .map(|p| p.parse().map_err(StorageError::Other))
                .transpose()?;
            stats.record(status, priority);
        }
        Ok(stats)
    }
}
