//! EduNexus: academic resource catalog service.
//!
//! A department-scale catalog of academic files (notes, syllabi,
//! question papers) with a search/filter engine at its core: exact-match
//! filtering and sorting against a record store, in-memory free-text
//! narrowing over a bounded candidate window, and page-based result
//! accumulation on the client side.

pub mod config;
pub mod error;
pub mod files;
pub mod model;
pub mod search;
pub mod server;
pub mod state;
pub mod store;
pub mod tools;
pub mod tracing;

pub use config::Config;
pub use error::{Result, ValidationError};
pub use files::{FileStore, LocalFileStore};
pub use model::{
    CurriculumSlot, DocumentType, FileType, Resource, SortDirection, SortField, SortSpec, Unit,
};
pub use search::{
    Debouncer, FilterPlan, LoadState, ResultAccumulator, SearchError, SearchFilters,
    SearchResultPage, execute_search, fetch_suggestions, normalize,
};
pub use state::CatalogState;
pub use store::{
    FilterField, IndexRegistry, ListQuery, MemoryStore, Predicate, RecordStore, StoreError,
};
