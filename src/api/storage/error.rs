//! Storage error types for the API storage backends.

use thiserror::Error;

/// Storage operation errors.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Database connection or query error
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// Reference code retry budget exhausted during response creation
    #[error("Failed to generate a unique reference code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },
    /// General storage error
    #[error("Storage error: {0}")]
    Other(String),
}
