//! In-memory record store with snapshot persistence.
//!
//! The catalog is small (a department's worth of files), so the whole
//! table lives behind an `RwLock` and persists as a postcard snapshot.
//! Query semantics mirror the hosted-store contract: every read is
//! checked against the composite index registry first.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::index::{IndexRegistry, mask_of};
use super::{ListQuery, Predicate, RecordStore, StoreError, describe_fields};
use crate::model::{Resource, SortDirection, SortField, SortSpec};

pub struct MemoryStore {
    rows: RwLock<HashMap<Uuid, Resource>>,
    indexes: IndexRegistry,
    snapshot_path: Option<PathBuf>,
    closed: AtomicBool,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("indexes", &self.indexes.len())
            .field("snapshot_path", &self.snapshot_path)
            .field("closed", &self.closed.load(AtomicOrdering::Relaxed))
            .finish()
    }
}

impl MemoryStore {
    /// Open a store backed by a snapshot file, loading it if present.
    pub async fn open(
        snapshot_path: impl Into<PathBuf>,
        indexes: IndexRegistry,
    ) -> Result<Self, StoreError> {
        let snapshot_path = snapshot_path.into();
        let rows = match load_snapshot(&snapshot_path).await? {
            Some(resources) => {
                tracing::info!(
                    "Loaded {} resources from {}",
                    resources.len(),
                    snapshot_path.display()
                );
                resources.into_iter().map(|r| (r.id, r)).collect()
            }
            None => HashMap::new(),
        };

        Ok(Self {
            rows: RwLock::new(rows),
            indexes,
            snapshot_path: Some(snapshot_path),
            closed: AtomicBool::new(false),
        })
    }

    /// A store with no persistence. Tests and ephemeral tooling.
    pub fn in_memory(indexes: IndexRegistry) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            indexes,
            snapshot_path: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Mark the store unavailable. Subsequent operations return
    /// [`StoreError::Unavailable`].
    pub fn close(&self) {
        self.closed.store(true, AtomicOrdering::SeqCst);
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    /// Write the current table to the snapshot file, if one is
    /// configured. Failures are logged, not propagated: the in-memory
    /// mutation already succeeded and the next mutation retries.
    async fn persist(&self) {
        let Some(path) = self.snapshot_path.clone() else {
            return;
        };

        let mut resources: Vec<Resource> = self.rows.read().await.values().cloned().collect();
        resources.sort_by_key(|r| r.id);

        let result = tokio::task::spawn_blocking(move || write_snapshot(&path, &resources)).await;
        match result {
            Ok(Err(e)) => tracing::warn!("Failed to persist catalog snapshot: {}", e),
            Err(e) => tracing::warn!("Snapshot task panicked: {}", e),
            Ok(Ok(())) => {}
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, resource: Resource) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.rows.write().await.insert(resource.id, resource);
        self.persist().await;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resource>, StoreError> {
        self.ensure_open()?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(&self, resource: Resource) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let found = {
            let mut rows = self.rows.write().await;
            match rows.get_mut(&resource.id) {
                Some(slot) => {
                    *slot = resource;
                    true
                }
                None => false,
            }
        };
        if found {
            self.persist().await;
        }
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let found = self.rows.write().await.remove(&id).is_some();
        if found {
            self.persist().await;
        }
        Ok(found)
    }

    async fn find(&self, query: ListQuery) -> Result<Vec<Resource>, StoreError> {
        self.ensure_open()?;

        let mask = mask_of(&query.predicates);
        if !self.indexes.covers(mask, query.sort.field) {
            return Err(StoreError::MissingIndex {
                fields: describe_fields(&query.predicates),
                sort: query.sort.field,
            });
        }

        let rows = self.rows.read().await;
        let mut matched: Vec<Resource> = rows
            .values()
            .filter(|r| query.predicates.iter().all(|p| p.matches(r)))
            .cloned()
            .collect();
        drop(rows);

        matched.sort_unstable_by(|a, b| compare(a, b, query.sort));

        Ok(matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<usize, StoreError> {
        self.ensure_open()?;

        let mask = mask_of(predicates);
        if !self.indexes.covers_fields(mask) {
            return Err(StoreError::MissingIndex {
                fields: describe_fields(predicates),
                sort: SortField::UploadedAt,
            });
        }

        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|r| predicates.iter().all(|p| p.matches(r)))
            .count())
    }

    async fn scan(&self) -> Result<Vec<Resource>, StoreError> {
        self.ensure_open()?;
        Ok(self.rows.read().await.values().cloned().collect())
    }
}

/// Ordering for a sort spec, with the record id as final tie-break so
/// pagination is deterministic across identical sort keys.
fn compare(a: &Resource, b: &Resource, sort: SortSpec) -> Ordering {
    let primary = match sort.field {
        SortField::UploadedAt => a.uploaded_at.cmp(&b.uploaded_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Year => a.year.cmp(&b.year),
        SortField::Semester => a.semester.cmp(&b.semester),
        SortField::ByteSize => a.byte_size.cmp(&b.byte_size),
    };
    let primary = match sort.direction {
        SortDirection::Ascending => primary,
        SortDirection::Descending => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

async fn load_snapshot(path: &Path) -> Result<Option<Vec<Resource>>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::Snapshot(e.to_string())),
    };

    // Deserialization is CPU-bound; keep it off the reactor.
    let resources = tokio::task::spawn_blocking(move || {
        postcard::from_bytes::<Vec<Resource>>(&bytes)
            .map_err(|e| StoreError::Snapshot(e.to_string()))
    })
    .await
    .map_err(|e| StoreError::Snapshot(e.to_string()))??;

    Ok(Some(resources))
}

/// Serialize and atomically replace the snapshot file.
fn write_snapshot(path: &Path, resources: &[Resource]) -> Result<(), StoreError> {
    let bytes =
        postcard::to_allocvec(resources).map_err(|e| StoreError::Snapshot(e.to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Snapshot(e.to_string()))?;
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes).map_err(|e| StoreError::Snapshot(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::Snapshot(e.to_string()))?;
    Ok(())
}
