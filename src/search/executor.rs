//! Query execution: translate a filter plan into a result page.

use std::time::Duration;

use crate::config::Config;
use crate::model::{SortDirection, SortField, SortSpec};
use crate::store::{ListQuery, RecordStore, StoreError};

use super::filters::FilterPlan;
use super::matcher;
use super::page::SearchResultPage;

/// Failures a search can produce. Everything here is caught at the tool
/// boundary and converted to a generic recoverable message; nothing
/// propagates across the RPC boundary as a raw error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("record store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    /// Whether retrying the same query can succeed. Missing composite
    /// indexes are configuration errors: they require provisioning, not
    /// a retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Store(StoreError::MissingIndex { .. }))
    }
}

/// Execute a search: exact-match predicates against the store, free-text
/// narrowing in memory when a term is present, pagination on top.
///
/// With a free-text term the store is asked for a bounded candidate
/// window (larger than a page) and matching happens client-side; a
/// resource matching the term outside that window is missed. This trades
/// completeness for simplicity and is the documented behavior, not a
/// failure mode.
pub async fn execute_search<S>(
    store: &S,
    config: &Config,
    plan: &FilterPlan,
    sort: SortSpec,
    page: u32,
) -> Result<SearchResultPage, SearchError>
where
    S: RecordStore + ?Sized,
{
    let page = page.max(1);
    let page_size = config.page_size;
    let offset = (page as usize - 1) * page_size;

    if let Some(term) = &plan.term {
        // Free-text path: over-fetch the candidate window, narrow, then
        // paginate the narrowed set in memory.
        let window = config.candidate_window.max(page_size + 1);
        let candidates = with_timeout(
            config,
            store.find(ListQuery {
                predicates: plan.predicates.clone(),
                sort,
                offset: 0,
                limit: window,
            }),
        )
        .await?;

        let matched = matcher::narrow(term, candidates);
        let total = matched.len();
        let resources: Vec<_> = matched.into_iter().skip(offset).take(page_size).collect();
        let has_more = offset + resources.len() < total;

        return Ok(SearchResultPage {
            resources,
            total,
            has_more,
        });
    }

    // Exact-match path: the store paginates natively. One extra row is
    // fetched to compute has_more against the live result set, and the
    // count query supplies the total.
    let total = with_timeout(config, store.count(&plan.predicates)).await?;
    let mut resources = with_timeout(
        config,
        store.find(ListQuery {
            predicates: plan.predicates.clone(),
            sort,
            offset,
            limit: page_size + 1,
        }),
    )
    .await?;

    let has_more = resources.len() > page_size;
    resources.truncate(page_size);

    Ok(SearchResultPage {
        resources,
        total,
        has_more,
    })
}

/// Fetch autocomplete suggestions for a partial term.
///
/// Terms below the minimum length never reach the store: the empty
/// result is produced without any read.
pub async fn fetch_suggestions<S>(
    store: &S,
    config: &Config,
    term: &str,
) -> Result<Vec<String>, SearchError>
where
    S: RecordStore + ?Sized,
{
    let term = term.trim().to_lowercase();
    if term.chars().count() < config.min_term_len {
        return Ok(Vec::new());
    }

    let candidates = with_timeout(
        config,
        store.find(ListQuery {
            predicates: Vec::new(),
            sort: SortSpec {
                field: SortField::Title,
                direction: SortDirection::Ascending,
            },
            offset: 0,
            limit: config.suggestion_scan_limit,
        }),
    )
    .await?;

    Ok(matcher::suggest(&term, &candidates, config.suggestion_limit))
}

async fn with_timeout<T>(
    config: &Config,
    operation: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, SearchError> {
    match tokio::time::timeout(config.store_timeout, operation).await {
        Ok(result) => result.map_err(SearchError::from),
        Err(_) => Err(SearchError::Timeout(config.store_timeout)),
    }
}
