//! Admin delete: remove the record and its backing file.

use std::sync::Arc;

use rmcp::schemars;
use serde::Deserialize;
use uuid::Uuid;

use crate::files::FileStore;
use crate::state::CatalogState;
use crate::store::RecordStore;

use super::store_failure;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteResourceRequest {
    /// Resource id
    pub id: String,
}

/// Delete a resource. The record goes first; a failure removing the
/// backing file afterwards is logged and the orphaned object is left for
/// manual cleanup rather than resurrecting the record.
pub async fn handle_delete_resource(
    state: &Arc<CatalogState>,
    request: DeleteResourceRequest,
) -> Result<String, String> {
    let id: Uuid = request
        .id
        .parse()
        .map_err(|_| format!("Invalid resource id {:?}", request.id))?;

    let resource = state
        .store()
        .get(id)
        .await
        .map_err(|e| store_failure("delete_resource", &e))?
        .ok_or_else(|| format!("Resource {} not found", id))?;

    let removed = state
        .store()
        .delete(id)
        .await
        .map_err(|e| store_failure("delete_resource", &e))?;
    if !removed {
        return Err(format!("Resource {} not found", id));
    }

    match state.files().delete(&resource.file_key).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Backing file {} was already gone", resource.file_key);
        }
        Err(e) => {
            tracing::warn!("Failed to remove backing file {}: {}", resource.file_key, e);
        }
    }

    state.invalidate_suggestions().await;
    tracing::info!("Deleted resource {} ({:?})", id, resource.title);

    Ok(format!("Deleted {:?} ({})", resource.title, id))
}
