//! Admin metadata edit. File content is immutable; only the record
//! changes.

use std::sync::Arc;

use rmcp::schemars;
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{DocumentType, Unit};
use crate::state::CatalogState;
use crate::store::RecordStore;

use super::store_failure;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct UpdateResourceRequest {
    /// Resource id
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub branch: Option<String>,
    pub regulation: Option<String>,
    /// Academic year, 1-4
    pub year: Option<u32>,
    /// Semester within the year, 1-2
    pub semester: Option<u32>,
    pub subject_code: Option<String>,
    /// Unit number or "all"
    pub unit: Option<String>,
    /// Document type: notes, syllabus, question paper, assignment, lab manual, other
    pub document_type: Option<String>,
}

/// Patch a record's metadata. Unlike search filters, malformed values
/// here are rejected: silently dropping an admin's edit would corrupt
/// the catalog.
pub async fn handle_update_resource(
    state: &Arc<CatalogState>,
    request: UpdateResourceRequest,
) -> Result<String, String> {
    let id: Uuid = request
        .id
        .parse()
        .map_err(|_| format!("Invalid resource id {:?}", request.id))?;

    let mut resource = state
        .store()
        .get(id)
        .await
        .map_err(|e| store_failure("update_resource", &e))?
        .ok_or_else(|| format!("Resource {} not found", id))?;

    if let Some(title) = request.title {
        resource.title = title.trim().to_string();
    }
    if let Some(description) = request.description {
        resource.description = description;
    }
    if let Some(tags) = request.tags {
        resource.tags = tags;
    }
    if let Some(branch) = request.branch {
        resource.branch = branch;
    }
    if let Some(regulation) = request.regulation {
        resource.regulation = regulation;
    }
    if let Some(year) = request.year {
        resource.year = u8::try_from(year).unwrap_or(u8::MAX);
    }
    if let Some(semester) = request.semester {
        resource.semester = u8::try_from(semester).unwrap_or(u8::MAX);
    }
    if let Some(subject_code) = request.subject_code {
        resource.subject_code = subject_code;
    }
    if let Some(raw) = request.unit {
        resource.unit = raw.parse::<Unit>().map_err(|e| e.to_string())?;
    }
    if let Some(raw) = request.document_type {
        resource.document_type = raw.parse::<DocumentType>().map_err(|e| e.to_string())?;
    }

    resource.validate().map_err(|e| e.to_string())?;

    let found = state
        .store()
        .update(resource.clone())
        .await
        .map_err(|e| store_failure("update_resource", &e))?;
    if !found {
        return Err(format!("Resource {} not found", id));
    }

    state.invalidate_suggestions().await;
    tracing::info!("Updated resource {}", id);

    serde_json::to_string(&resource).map_err(|e| {
        tracing::error!("Failed to serialize updated resource: {}", e);
        "Internal serialization failure.".to_string()
    })
}
