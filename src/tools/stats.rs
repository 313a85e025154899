//! Admin catalog statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::state::CatalogState;
use crate::store::RecordStore;

use super::store_failure;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct CatalogStatsRequest {}

#[derive(Debug, Default, Serialize)]
pub struct CatalogStats {
    pub total_resources: usize,
    pub total_bytes: u64,
    pub by_document_type: BTreeMap<String, usize>,
    pub by_branch: BTreeMap<String, usize>,
    pub by_file_type: BTreeMap<String, usize>,
    pub latest_upload: Option<DateTime<Utc>>,
}

/// Aggregate catalog counts in memory. The catalog is department-sized;
/// a full scan is cheaper than maintaining counters.
pub async fn handle_catalog_stats(
    state: &Arc<CatalogState>,
    _request: CatalogStatsRequest,
) -> Result<String, String> {
    let resources = state
        .store()
        .scan()
        .await
        .map_err(|e| store_failure("catalog_stats", &e))?;

    let mut stats = CatalogStats {
        total_resources: resources.len(),
        ..CatalogStats::default()
    };

    for resource in &resources {
        stats.total_bytes += resource.byte_size;
        *stats
            .by_document_type
            .entry(resource.document_type.label().to_string())
            .or_insert(0) += 1;
        *stats
            .by_branch
            .entry(resource.branch.clone())
            .or_insert(0) += 1;
        *stats
            .by_file_type
            .entry(resource.file_type.label().to_string())
            .or_insert(0) += 1;
        if stats.latest_upload.is_none_or(|latest| resource.uploaded_at > latest) {
            stats.latest_upload = Some(resource.uploaded_at);
        }
    }

    serde_json::to_string(&stats).map_err(|e| {
        tracing::error!("Failed to serialize catalog stats: {}", e);
        "Internal serialization failure.".to_string()
    })
}
