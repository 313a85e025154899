//! Pagination types and the client-side result accumulator.

use serde::{Deserialize, Serialize};

use crate::model::Resource;

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub resources: Vec<Resource>,
    /// Matching resources across all pages, under the same filter+sort.
    pub total: usize,
    /// True iff page N+1 would be non-empty under the same filter+sort.
    pub has_more: bool,
}

/// Client-observed load state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

/// Client-held accumulation of paginated results ("load more").
///
/// Holds the ordered result list plus the page cursor. Starting a search
/// resets the list; load-more appends. Every request carries a
/// monotonically increasing sequence number and completions older than
/// the latest issued sequence are discarded, so a superseded search can
/// never overwrite a newer one regardless of completion order.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    key: Option<String>,
    resources: Vec<Resource>,
    page: u32,
    pending_page: u32,
    total: usize,
    has_more: bool,
    state: LoadState,
    latest_seq: u64,
    next_seq: u64,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Current page number (0 before the first successful load).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Start a fresh search from page 1. Any previous accumulation for a
    /// different filter key is dropped immediately; the list itself is
    /// replaced when the response arrives. Returns the request sequence
    /// number to pass back to [`ResultAccumulator::complete`].
    pub fn begin_search(&mut self, key: impl Into<String>) -> u64 {
        let key = key.into();
        if self.key.as_deref() != Some(key.as_str()) {
            self.resources.clear();
            self.total = 0;
            self.has_more = false;
            self.page = 0;
        }
        self.key = Some(key);
        self.pending_page = 1;
        self.state = LoadState::Loading;
        self.issue_seq()
    }

    /// Request the next page for the current filter key, preserving the
    /// accumulated list for append. Refused (returns None) while a load
    /// is in flight or when the last page said there is nothing more.
    pub fn begin_load_more(&mut self) -> Option<(u64, u32)> {
        if self.state == LoadState::Loading || !self.has_more || self.key.is_none() {
            return None;
        }
        self.pending_page = self.page + 1;
        self.state = LoadState::Loading;
        Some((self.issue_seq(), self.pending_page))
    }

    /// Apply a completed response. Returns false when the response was
    /// superseded by a newer request and has been discarded.
    pub fn complete(&mut self, seq: u64, result: SearchResultPage) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(
                "Discarding superseded search response (seq {}, latest {})",
                seq,
                self.latest_seq
            );
            return false;
        }

        if self.pending_page <= 1 {
            self.resources = result.resources;
        } else {
            self.resources.extend(result.resources);
        }
        self.page = self.pending_page;
        self.total = result.total;
        self.has_more = result.has_more;
        self.state = LoadState::Idle;
        true
    }

    /// Record a failed request. The accumulated list is untouched; the
    /// caller presents a retry affordance.
    pub fn fail(&mut self, seq: u64) {
        if seq == self.latest_seq {
            self.state = LoadState::Idle;
        }
    }

    fn issue_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.latest_seq = self.next_seq;
        self.latest_seq
    }
}
