//! Primary search entry point: filters + free text → one result page.

use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

use crate::model::SortSpec;
use crate::search::{SearchFilters, execute_search, normalize};
use crate::state::CatalogState;

use super::search_failure;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchResourcesRequest {
    /// Free-text query over titles, descriptions, subject codes and tags
    pub query: Option<String>,
    /// Regulation code, e.g. "R23"
    pub regulation: Option<String>,
    /// Branch, e.g. "CSE"
    pub branch: Option<String>,
    /// Subject code, e.g. "CS301"
    pub subject: Option<String>,
    /// Unit number or "all"
    pub unit: Option<String>,
    /// Document type: notes, syllabus, question paper, assignment, lab manual, other
    pub document_type: Option<String>,
    /// File type: pdf, image, ppt, word, other
    pub file_type: Option<String>,
    /// Academic year, 1-4
    pub year: Option<String>,
    /// Semester within the year, 1-2
    pub semester: Option<String>,
    /// Sort field: uploaded_at (default), title, year, semester, size
    pub sort_by: Option<String>,
    /// Sort direction: asc or desc
    pub sort_direction: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<u32>,
}

impl SearchResourcesRequest {
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: self.query.clone(),
            regulation: self.regulation.clone(),
            branch: self.branch.clone(),
            subject: self.subject.clone(),
            unit: self.unit.clone(),
            document_type: self.document_type.clone(),
            file_type: self.file_type.clone(),
            year: self.year.clone(),
            semester: self.semester.clone(),
        }
    }
}

/// Execute a search and return the result page as JSON.
pub async fn handle_search_resources(
    state: &Arc<CatalogState>,
    request: SearchResourcesRequest,
) -> Result<String, String> {
    let config = state.config();
    let plan = normalize(&request.filters(), config.min_term_len);
    let sort = SortSpec::parse_or_default(
        request.sort_by.as_deref(),
        request.sort_direction.as_deref(),
    );
    let page = request.page.unwrap_or(1).max(1);

    tracing::debug!(
        "Search: {} predicates, term {:?}, page {}",
        plan.predicates.len(),
        plan.term,
        page
    );

    let result = execute_search(state.store().as_ref(), config, &plan, sort, page)
        .await
        .map_err(|e| search_failure("search_resources", &e))?;

    serde_json::to_string(&result).map_err(|e| {
        tracing::error!("Failed to serialize search result: {}", e);
        "Internal serialization failure.".to_string()
    })
}
