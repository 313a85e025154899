//! Curriculum hierarchy browsing: year → semester → subject → unit.

use std::collections::BTreeSet;
use std::sync::Arc;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::model::Unit;
use crate::state::CatalogState;
use crate::store::RecordStore;

use super::store_failure;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct BrowseCurriculumRequest {
    /// Branch to browse within, e.g. "CSE"
    pub branch: Option<String>,
    /// Regulation code, e.g. "R23"
    pub regulation: Option<String>,
    /// Academic year, 1-4
    pub year: Option<u32>,
    /// Semester within the year, 1-2
    pub semester: Option<u32>,
    /// Subject code; when present, units are listed
    pub subject: Option<String>,
}

/// One level of the curriculum hierarchy, computed from the live
/// catalog: only values that actually have resources appear.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub level: &'static str,
    pub values: Vec<String>,
}

pub async fn handle_browse_curriculum(
    state: &Arc<CatalogState>,
    request: BrowseCurriculumRequest,
) -> Result<String, String> {
    let resources = state
        .store()
        .scan()
        .await
        .map_err(|e| store_failure("browse_curriculum", &e))?;

    let scoped = resources.into_iter().filter(|r| {
        request.branch.as_deref().is_none_or(|b| r.branch == b)
            && request
                .regulation
                .as_deref()
                .is_none_or(|reg| r.regulation == reg)
            && request.year.is_none_or(|y| u32::from(r.year) == y)
            && request.semester.is_none_or(|s| u32::from(r.semester) == s)
            && request.subject.as_deref().is_none_or(|s| r.subject_code == s)
    });

    // The next level is the deepest unconstrained one.
    let response = if request.year.is_none() {
        let years: BTreeSet<u8> = scoped.map(|r| r.year).collect();
        BrowseResponse {
            level: "years",
            values: years.into_iter().map(|y| y.to_string()).collect(),
        }
    } else if request.semester.is_none() {
        let semesters: BTreeSet<u8> = scoped.map(|r| r.semester).collect();
        BrowseResponse {
            level: "semesters",
            values: semesters.into_iter().map(|s| s.to_string()).collect(),
        }
    } else if request.subject.is_none() {
        let subjects: BTreeSet<String> = scoped.map(|r| r.subject_code).collect();
        BrowseResponse {
            level: "subjects",
            values: subjects.into_iter().collect(),
        }
    } else {
        let mut numbered: BTreeSet<u8> = BTreeSet::new();
        let mut has_all = false;
        for resource in scoped {
            match resource.unit {
                Unit::All => has_all = true,
                Unit::Numbered(n) => {
                    numbered.insert(n);
                }
            }
        }
        let mut values: Vec<String> = Vec::new();
        if has_all {
            values.push("all".to_string());
        }
        values.extend(numbered.into_iter().map(|n| n.to_string()));
        BrowseResponse {
            level: "units",
            values,
        }
    };

    serde_json::to_string(&response).map_err(|e| {
        tracing::error!("Failed to serialize browse response: {}", e);
        "Internal serialization failure.".to_string()
    })
}
