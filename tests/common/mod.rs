//! Shared test fixtures and builders for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets a fresh temporary data directory holding its own
//! catalog snapshot and object store, plus its own `CatalogState` with
//! an empty suggestion cache. Tests can run in parallel without
//! interference.
//!
//! # Seed Data
//!
//! [`CatalogFixture::seeded`] loads a small deterministic catalog
//! spanning two branches, two regulations, all four years and several
//! document types. Timestamps are fixed (`BASE_TS` plus a per-resource
//! offset) so sort order is reproducible.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use edunexus::config::Config;
use edunexus::files::LocalFileStore;
use edunexus::model::{DocumentType, FileType, Resource, Unit};
use edunexus::state::CatalogState;
use edunexus::store::{IndexRegistry, MemoryStore, RecordStore};

/// Base upload timestamp for seeded resources (2026-01-01T00:00:00Z).
pub fn base_ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// Builder for test resources with sensible defaults.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct ResourceBuilder {
    resource: Resource,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl ResourceBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            resource: Resource {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: String::new(),
                tags: vec![],
                branch: "CSE".to_string(),
                regulation: "R23".to_string(),
                year: 1,
                semester: 1,
                subject_code: "CS101".to_string(),
                unit: Unit::All,
                document_type: DocumentType::Notes,
                file_type: FileType::Pdf,
                file_key: "unset".to_string(),
                file_name: "unset.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                byte_size: 1024,
                uploaded_by: "admin@edunexus".to_string(),
                uploaded_at: base_ts(),
            },
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.resource.description = description.to_string();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.resource.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.resource.branch = branch.to_string();
        self
    }

    pub fn regulation(mut self, regulation: &str) -> Self {
        self.resource.regulation = regulation.to_string();
        self
    }

    pub fn year(mut self, year: u8) -> Self {
        self.resource.year = year;
        self
    }

    pub fn semester(mut self, semester: u8) -> Self {
        self.resource.semester = semester;
        self
    }

    pub fn subject(mut self, subject_code: &str) -> Self {
        self.resource.subject_code = subject_code.to_string();
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.resource.unit = unit;
        self
    }

    pub fn document_type(mut self, document_type: DocumentType) -> Self {
        self.resource.document_type = document_type;
        self
    }

    pub fn file_type(mut self, file_type: FileType) -> Self {
        self.resource.file_type = file_type;
        self
    }

    pub fn byte_size(mut self, byte_size: u64) -> Self {
        self.resource.byte_size = byte_size;
        self
    }

    /// Upload timestamp as an offset in seconds from [`base_ts`].
    pub fn uploaded_offset(mut self, seconds: i64) -> Self {
        self.resource.uploaded_at = base_ts() + chrono::Duration::seconds(seconds);
        self
    }

    pub fn build(mut self) -> Resource {
        let key = format!("{}-{}.pdf", self.resource.id, self.resource.title.replace(' ', "-"));
        self.resource.file_key = key.clone();
        self.resource.file_name = format!("{}.pdf", self.resource.title.replace(' ', "-"));
        self.resource
    }
}

/// An isolated catalog environment: temp data directory, persistent
/// store, file store, shared state.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct CatalogFixture {
    temp: TempDir,
    pub state: Arc<CatalogState>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl CatalogFixture {
    /// An empty catalog with the default configuration.
    pub async fn empty() -> Self {
        Self::with_config(Config::default()).await
    }

    /// An empty catalog with a custom configuration. The fixture owns
    /// the data directory regardless of what the config says.
    pub async fn with_config(mut config: Config) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        config.data_dir = temp.path().to_path_buf();

        let store = MemoryStore::open(
            config.data_dir.join("catalog.bin"),
            IndexRegistry::full_power_set(),
        )
        .await
        .expect("Failed to open catalog store");

        let files = LocalFileStore::new(config.data_dir.join("objects"));
        let state = Arc::new(CatalogState::new(
            Arc::new(store),
            Arc::new(files),
            config,
        ));

        Self { temp, state }
    }

    /// The standard seeded catalog.
    pub async fn seeded() -> Self {
        let fixture = Self::empty().await;
        for resource in seed_resources() {
            fixture.insert(resource).await;
        }
        fixture
    }

    pub async fn insert(&self, resource: Resource) {
        self.state
            .store()
            .insert(resource)
            .await
            .expect("Failed to seed resource");
    }

    /// Root of this fixture's data directory.
    pub fn data_dir(&self) -> &Path {
        self.temp.path()
    }

    /// Write a small file and return its path, for upload tests.
    pub fn scratch_file(&self, name: &str, content: &[u8]) -> std::path::PathBuf {
        let dir = self.temp.path().join("scratch");
        std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
        let path = dir.join(name);
        std::fs::write(&path, content).expect("Failed to write scratch file");
        path
    }
}

/// Twelve resources spanning branches, regulations, years and document
/// types. Exactly one title contains "Syllabus"; exactly three records
/// sit in the (CSE, R23, year 2, semester 1) scope.
#[allow(dead_code)] // Used by most, not all, integration test crates
pub fn seed_resources() -> Vec<Resource> {
    vec![
        ResourceBuilder::new("Operating Systems Notes")
            .year(2)
            .semester(1)
            .subject("CS301")
            .unit(Unit::Numbered(1))
            .description("process scheduling and deadlock")
            .tags(&["os", "scheduling"])
            .uploaded_offset(100)
            .build(),
        ResourceBuilder::new("Operating Systems Question Bank")
            .year(2)
            .semester(1)
            .subject("CS301")
            .document_type(DocumentType::QuestionPaper)
            .uploaded_offset(200)
            .build(),
        ResourceBuilder::new("Data Structures Syllabus")
            .year(2)
            .semester(1)
            .subject("CS302")
            .document_type(DocumentType::Syllabus)
            .uploaded_offset(300)
            .build(),
        ResourceBuilder::new("Data Structures Notes")
            .year(2)
            .semester(2)
            .subject("CS351")
            .unit(Unit::Numbered(2))
            .uploaded_offset(400)
            .build(),
        ResourceBuilder::new("Computer Networks Notes")
            .year(3)
            .semester(1)
            .subject("CS501")
            .description("routing and congestion control")
            .uploaded_offset(500)
            .build(),
        ResourceBuilder::new("Digital Logic Lab Manual")
            .branch("ECE")
            .year(1)
            .semester(2)
            .subject("EC151")
            .document_type(DocumentType::LabManual)
            .uploaded_offset(600)
            .build(),
        ResourceBuilder::new("Signals and Systems Notes")
            .branch("ECE")
            .year(2)
            .semester(1)
            .subject("EC301")
            .regulation("R20")
            .uploaded_offset(700)
            .build(),
        ResourceBuilder::new("Mathematics II Question Paper")
            .year(1)
            .semester(2)
            .subject("MA102")
            .document_type(DocumentType::QuestionPaper)
            .file_type(FileType::Image)
            .uploaded_offset(800)
            .build(),
        ResourceBuilder::new("Compiler Design Notes")
            .year(4)
            .semester(1)
            .subject("CS701")
            .tags(&["parsing", "codegen"])
            .uploaded_offset(900)
            .build(),
        ResourceBuilder::new("Machine Learning Assignment")
            .year(4)
            .semester(2)
            .subject("CS751")
            .document_type(DocumentType::Assignment)
            .file_type(FileType::Word)
            .uploaded_offset(1000)
            .build(),
        ResourceBuilder::new("Database Systems Notes")
            .year(3)
            .semester(2)
            .subject("CS551")
            .description("normalization and indexing")
            .uploaded_offset(1100)
            .build(),
        ResourceBuilder::new("Engineering Physics Notes")
            .branch("ECE")
            .year(1)
            .semester(1)
            .subject("PH101")
            .regulation("R20")
            .uploaded_offset(1200)
            .build(),
    ]
}
