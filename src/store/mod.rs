//! Resource record store: equality-predicate filtered, sorted, paginated
//! reads over the resource catalog.
//!
//! The store is modeled after a hosted document database: every
//! (filter-field-set, sort-field) combination a query uses must have a
//! pre-declared composite index, and querying an undeclared combination
//! is a configuration error rather than a query-shape error. See
//! [`index::IndexRegistry`] for provisioning.

pub(crate) mod index;
pub(crate) mod memory;

pub use index::{FilterField, IndexRegistry};
pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{DocumentType, FileType, Resource, SortField, SortSpec, Unit};

/// A single equality predicate over one resource field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Branch(String),
    Regulation(String),
    Subject(String),
    Unit(Unit),
    DocumentType(DocumentType),
    FileType(FileType),
    Year(u8),
    Semester(u8),
}

impl Predicate {
    /// The field this predicate constrains.
    pub fn field(&self) -> FilterField {
        match self {
            Self::Branch(_) => FilterField::Branch,
            Self::Regulation(_) => FilterField::Regulation,
            Self::Subject(_) => FilterField::Subject,
            Self::Unit(_) => FilterField::Unit,
            Self::DocumentType(_) => FilterField::DocumentType,
            Self::FileType(_) => FilterField::FileType,
            Self::Year(_) => FilterField::Year,
            Self::Semester(_) => FilterField::Semester,
        }
    }

    /// Exact-match evaluation against a single record.
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Self::Branch(v) => resource.branch == *v,
            Self::Regulation(v) => resource.regulation == *v,
            Self::Subject(v) => resource.subject_code == *v,
            Self::Unit(v) => resource.unit == *v,
            Self::DocumentType(v) => resource.document_type == *v,
            Self::FileType(v) => resource.file_type == *v,
            Self::Year(v) => resource.year == *v,
            Self::Semester(v) => resource.semester == *v,
        }
    }
}

/// A filtered, sorted, paginated read.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub predicates: Vec<Predicate>,
    pub sort: SortSpec,
    pub offset: usize,
    pub limit: usize,
}

impl ListQuery {
    /// A query returning everything under the default sort.
    pub fn unfiltered(limit: usize) -> Self {
        Self {
            predicates: Vec::new(),
            sort: SortSpec::default(),
            offset: 0,
            limit,
        }
    }
}

/// Errors a record store operation can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Connection-level failure; recoverable by retrying later.
    #[error("record store is unavailable")]
    Unavailable,
    /// No composite index covers this query shape. Fixed by
    /// provisioning, not by retrying.
    #[error("no composite index covers fields [{fields}] sorted by {sort:?}")]
    MissingIndex { fields: String, sort: SortField },
    /// Catalog snapshot could not be read or written.
    #[error("catalog snapshot failure: {0}")]
    Snapshot(String),
}

/// Persistent collection of resource metadata.
///
/// Implementations provide equality-predicate filtering, single-field
/// sorting, and offset/limit pagination; free-text matching lives above
/// this trait, in the search engine.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. The caller is responsible for validation.
    async fn insert(&self, resource: Resource) -> Result<(), StoreError>;

    /// Fetch one record by id.
    async fn get(&self, id: Uuid) -> Result<Option<Resource>, StoreError>;

    /// Replace an existing record. Returns false if the id is unknown.
    async fn update(&self, resource: Resource) -> Result<bool, StoreError>;

    /// Remove a record. Returns false if the id is unknown.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Filtered, sorted, paginated read.
    async fn find(&self, query: ListQuery) -> Result<Vec<Resource>, StoreError>;

    /// Count records matching every predicate.
    async fn count(&self, predicates: &[Predicate]) -> Result<usize, StoreError>;

    /// Full unordered scan. Browse and stats aggregation only; search
    /// paths must go through [`RecordStore::find`].
    async fn scan(&self) -> Result<Vec<Resource>, StoreError>;
}

/// Render a predicate list for log and error messages.
pub(crate) fn describe_fields(predicates: &[Predicate]) -> String {
    let mut fields: Vec<&str> = predicates.iter().map(|p| p.field().name()).collect();
    fields.sort_unstable();
    fields.join(", ")
}
