//! Admin upload: store a file and create its catalog record.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rmcp::schemars;
use serde::Deserialize;
use uuid::Uuid;

use crate::files::{FileStore, storage_key};
use crate::model::{DocumentType, FileType, Resource, Unit};
use crate::state::CatalogState;
use crate::store::RecordStore;

use super::store_failure;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UploadResourceRequest {
    /// Display title, e.g. "Operating Systems Unit 3 Notes"
    pub title: String,
    /// Free-text description
    pub description: Option<String>,
    /// Ordered tags
    pub tags: Option<Vec<String>>,
    /// Branch, e.g. "CSE"
    pub branch: String,
    /// Regulation code, e.g. "R23"
    pub regulation: String,
    /// Academic year, 1-4
    pub year: u32,
    /// Semester within the year, 1-2
    pub semester: u32,
    /// Subject code, e.g. "CS301"
    pub subject_code: String,
    /// Unit number or "all" (default: "all")
    pub unit: Option<String>,
    /// Document type: notes, syllabus, question paper, assignment, lab manual, other
    pub document_type: String,
    /// Path of the file to ingest
    pub source_path: String,
    /// Uploader identity
    pub uploaded_by: String,
}

/// Validate the metadata, copy the file into the object store, insert
/// the record. The stored file is removed again if the record cannot be
/// inserted, so a failed upload leaves nothing behind.
pub async fn handle_upload_resource(
    state: &Arc<CatalogState>,
    request: UploadResourceRequest,
) -> Result<String, String> {
    let document_type: DocumentType = request.document_type.parse().map_err(to_message)?;
    let unit: Unit = match &request.unit {
        Some(raw) => raw.parse().map_err(to_message)?,
        None => Unit::All,
    };
    let year = u8::try_from(request.year).unwrap_or(u8::MAX);
    let semester = u8::try_from(request.semester).unwrap_or(u8::MAX);

    let source = Path::new(&request.source_path);
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Source path {:?} has no file name", request.source_path))?
        .to_string();
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let id = Uuid::new_v4();
    let file_key = storage_key(id, &file_name);

    let mut resource = Resource {
        id,
        title: request.title.trim().to_string(),
        description: request.description.unwrap_or_default(),
        tags: request.tags.unwrap_or_default(),
        branch: request.branch,
        regulation: request.regulation,
        year,
        semester,
        subject_code: request.subject_code,
        unit,
        document_type,
        file_type: FileType::from_extension(extension),
        file_key: file_key.clone(),
        file_name,
        mime_type: FileType::mime_type(extension).to_string(),
        byte_size: 0,
        uploaded_by: request.uploaded_by,
        uploaded_at: Utc::now(),
    };

    // Validate before any file lands in the store.
    resource.validate().map_err(to_message)?;

    resource.byte_size = state
        .files()
        .put(&file_key, source)
        .await
        .map_err(to_message)?;

    if let Err(e) = state.store().insert(resource.clone()).await {
        // Roll the file back; the record never existed.
        if let Err(cleanup) = state.files().delete(&file_key).await {
            tracing::warn!("Failed to remove orphaned file {}: {}", file_key, cleanup);
        }
        return Err(store_failure("upload_resource", &e));
    }

    state.invalidate_suggestions().await;
    tracing::info!("Uploaded {:?} as {}", resource.title, resource.id);

    serde_json::to_string(&resource).map_err(|e| {
        tracing::error!("Failed to serialize uploaded resource: {}", e);
        "Internal serialization failure.".to_string()
    })
}

fn to_message(err: impl std::fmt::Display) -> String {
    err.to_string()
}
