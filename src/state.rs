//! Shared server state: store handles, configuration, suggestion cache.
//!
//! This is the central coordination point for tool handlers:
//! - the record store and file store handles,
//! - a bounded LRU cache of suggestion results,
//! - in-flight suggestion lookups as shared futures, so concurrent
//!   identical lookups issue one store read between them.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};

use crate::config::Config;
use crate::files::LocalFileStore;
use crate::search;
use crate::store::MemoryStore;

/// Maximum number of cached suggestion result lists.
const SUGGESTION_CACHE_SIZE: usize = 256;

/// Type alias for shared suggestion lookup futures.
type SharedSuggestionFuture = Shared<BoxFuture<'static, Result<Arc<Vec<String>>, String>>>;

pub struct CatalogState {
    store: Arc<MemoryStore>,
    files: Arc<LocalFileStore>,
    config: Config,

    /// LRU cache of suggestion results, keyed by normalized term.
    suggestion_cache: RwLock<LruCache<String, Arc<Vec<String>>>>,

    /// In-flight suggestion lookups (awaitable by multiple callers).
    in_flight: Mutex<HashMap<String, SharedSuggestionFuture>>,
}

impl std::fmt::Debug for CatalogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogState")
            .field("config", &self.config)
            .finish()
    }
}

impl CatalogState {
    pub fn new(store: Arc<MemoryStore>, files: Arc<LocalFileStore>, config: Config) -> Self {
        Self {
            store,
            files,
            config,
            suggestion_cache: RwLock::new(LruCache::new(
                NonZeroUsize::new(SUGGESTION_CACHE_SIZE).unwrap(),
            )),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn files(&self) -> &Arc<LocalFileStore> {
        &self.files
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drop cached suggestion results. Called after any catalog
    /// mutation so autocomplete never serves deleted titles.
    pub async fn invalidate_suggestions(&self) {
        self.suggestion_cache.write().await.clear();
        self.in_flight.lock().await.clear();
    }

    /// Suggestion lookup with caching and in-flight deduplication.
    ///
    /// Terms below the configured minimum length resolve to an empty
    /// list without touching cache or store.
    pub async fn suggestions(&self, term: &str) -> Result<Arc<Vec<String>>, String> {
        let term = term.trim().to_lowercase();
        if term.chars().count() < self.config.min_term_len {
            return Ok(Arc::new(Vec::new()));
        }

        // 1. Check cache first
        {
            let mut cache = self.suggestion_cache.write().await;
            if let Some(hit) = cache.get(&term) {
                tracing::debug!("Suggestion cache hit for {:?}", term);
                return Ok(hit.clone());
            }
        }

        // 2. Check for an in-flight lookup for the same term
        let maybe_future = {
            let in_flight = self.in_flight.lock().await;
            in_flight.get(&term).cloned()
        };
        if let Some(future) = maybe_future {
            tracing::debug!("Awaiting in-flight suggestion lookup for {:?}", term);
            return future.await;
        }

        // 3. Start a new lookup as a shared future
        let lookup: BoxFuture<'static, Result<Arc<Vec<String>>, String>> = {
            let store = self.store.clone();
            let config = self.config.clone();
            let term = term.clone();
            Box::pin(async move {
                search::fetch_suggestions(store.as_ref(), &config, &term)
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
        };
        let shared = lookup.shared();

        {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.insert(term.clone(), shared.clone());
        }

        let result = shared.await;

        {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.remove(&term);
        }

        if let Ok(ref suggestions) = result {
            let mut cache = self.suggestion_cache.write().await;
            cache.put(term, suggestions.clone());
        }

        result
    }
}
