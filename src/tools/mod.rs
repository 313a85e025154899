//! Tool handlers: the RPC surface of the catalog service.
//!
//! Every handler returns `Result<String, String>`: failures are
//! converted to messages at this boundary and never thrown across the
//! RPC layer. Backend failures collapse to one generic, retryable
//! message; the details go to the log, not the caller.

pub mod browse;
pub mod delete;
pub mod list_resources;
pub mod search_resources;
pub mod stats;
pub mod suggestions;
pub mod update;
pub mod upload;

pub use browse::*;
pub use delete::*;
pub use list_resources::*;
pub use search_resources::*;
pub use stats::*;
pub use suggestions::*;
pub use update::*;
pub use upload::*;

use crate::search::SearchError;
use crate::store::StoreError;

/// The one message backend failures surface as. The caller UI shows a
/// retry affordance; the distinction between outage and missing index
/// lives in the log.
pub(crate) const LOAD_FAILURE: &str = "Failed to load resources, please retry.";

pub(crate) fn search_failure(operation: &str, err: &SearchError) -> String {
    if err.is_retryable() {
        tracing::warn!("{} failed (retryable): {}", operation, err);
    } else {
        tracing::error!("{} failed (configuration): {}", operation, err);
    }
    LOAD_FAILURE.to_string()
}

pub(crate) fn store_failure(operation: &str, err: &StoreError) -> String {
    match err {
        StoreError::MissingIndex { .. } => {
            tracing::error!("{} failed (configuration): {}", operation, err);
        }
        _ => tracing::warn!("{} failed (retryable): {}", operation, err),
    }
    LOAD_FAILURE.to_string()
}
