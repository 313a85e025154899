//! Error handling types and utilities.

/// A specialized Result type for edunexus operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a resource or filter value fails validation.
///
/// Malformed *filter* values never surface to callers (the normalizer
/// drops them); these errors are raised for admin mutations, where
/// silently dropping a bad field would corrupt the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("year must be between 1 and 4, got {0}")]
    Year(u8),
    #[error("semester must be 1 or 2, got {0}")]
    Semester(u8),
    #[error("unit must be a positive number or \"all\", got {0:?}")]
    Unit(String),
    #[error("unknown document type {0:?}")]
    DocumentType(String),
    #[error("unknown file type {0:?}")]
    FileType(String),
    #[error("title must not be empty")]
    EmptyTitle,
}
