//! List the resources inside one curriculum slot.

use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use crate::model::SortSpec;
use crate::search::{SearchFilters, execute_search, normalize};
use crate::state::CatalogState;

use super::search_failure;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListResourcesRequest {
    /// Branch, e.g. "CSE"
    pub branch: String,
    /// Regulation code, e.g. "R23"
    pub regulation: String,
    /// Academic year, 1-4
    pub year: u32,
    /// Semester within the year, 1-2
    pub semester: u32,
    /// Subject code, e.g. "CS301"
    pub subject: String,
    /// Optional document type narrowing
    pub document_type: Option<String>,
    /// Optional unit narrowing: a unit number or "all"
    pub unit: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<u32>,
}

/// Fetch a page of the resources in one curriculum slot, newest first.
/// This rides the same engine as search_resources with the slot fields
/// as exact-match filters and no free-text term.
pub async fn handle_list_resources(
    state: &Arc<CatalogState>,
    request: ListResourcesRequest,
) -> Result<String, String> {
    let filters = SearchFilters {
        branch: Some(request.branch),
        regulation: Some(request.regulation),
        year: Some(request.year.to_string()),
        semester: Some(request.semester.to_string()),
        subject: Some(request.subject),
        document_type: request.document_type,
        unit: request.unit,
        ..SearchFilters::default()
    };

    let config = state.config();
    let plan = normalize(&filters, config.min_term_len);
    let page = request.page.unwrap_or(1).max(1);

    let result = execute_search(
        state.store().as_ref(),
        config,
        &plan,
        SortSpec::default(),
        page,
    )
    .await
    .map_err(|e| search_failure("list_resources", &e))?;

    serde_json::to_string(&result).map_err(|e| {
        tracing::error!("Failed to serialize resource list: {}", e);
        "Internal serialization failure.".to_string()
    })
}
