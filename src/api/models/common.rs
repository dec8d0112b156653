//! Shared wire envelopes: pagination and success bodies.

use serde::{Deserialize, Serialize};

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// Build an envelope, computing total_pages = ceil(total / page_size).
    pub fn new(data: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let total_pages = (total + page_size as u64 - 1) / page_size as u64;
        Self {
            data,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Body returned by delete-style operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
