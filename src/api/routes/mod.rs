//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod error;
pub mod forms;
pub mod health;
pub mod responses;

use axum::Router;

pub use app_state::AppState;
pub use error::ApiError;

/// Create the main API router combining all route modules.
///
/// State is applied by callers (e.g. `.with_state(app_state)` in main or
/// in a TestServer).
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/forms", forms::forms_router())
        .nest("/responses", responses::responses_router())
        .nest("/health", health::health_router())
}

/// Create application state backed by in-memory storage.
pub fn create_app_state() -> AppState {
    AppState::in_memory()
}
