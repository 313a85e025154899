//! Autocomplete suggestions for the search box.

use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use crate::state::CatalogState;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSearchSuggestionsRequest {
    /// Partial search term (at least 2 characters to get results)
    pub term: String,
}

/// Look up suggestions and return them as a JSON array of strings.
///
/// Terms below the minimum length return an empty array without a store
/// read; the client additionally debounces keystrokes so bursts of
/// typing collapse into one lookup.
pub async fn handle_get_search_suggestions(
    state: &Arc<CatalogState>,
    request: GetSearchSuggestionsRequest,
) -> Result<String, String> {
    let suggestions = state.suggestions(&request.term).await.map_err(|e| {
        tracing::warn!("get_search_suggestions failed: {}", e);
        "Failed to load suggestions, please retry.".to_string()
    })?;

    serde_json::to_string(suggestions.as_ref()).map_err(|e| {
        tracing::error!("Failed to serialize suggestions: {}", e);
        "Internal serialization failure.".to_string()
    })
}
