//! Service layer: validation and orchestration between routes and storage.

pub mod form_service;
pub mod response_service;

pub use form_service::FormService;
pub use response_service::ResponseService;

use crate::routes::error::ApiError;

/// Maximum accepted page size for list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Validate page (>= 1) and page_size (1..=100).
    pub fn new(page: u32, page_size: u32) -> Result<Self, ApiError> {
        if page < 1 {
            return Err(ApiError::Validation("page must be >= 1".to_string()));
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(ApiError::Validation(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, page_size })
    }

    /// Row offset for this page.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}
