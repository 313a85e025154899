//! Catalog domain types: resources, classification enums, sort specs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Highest academic year a resource can be classified under.
pub const MAX_YEAR: u8 = 4;

/// Semesters per academic year.
pub const MAX_SEMESTER: u8 = 2;

/// A single downloadable academic asset plus its metadata.
///
/// The file content behind `file_key` is immutable once uploaded; every
/// other field may change through a metadata edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Ordered tag sequence as entered by the uploader.
    pub tags: Vec<String>,

    // Classification
    pub branch: String,
    pub regulation: String,
    pub year: u8,
    pub semester: u8,
    pub subject_code: String,
    pub unit: Unit,
    pub document_type: DocumentType,
    pub file_type: FileType,

    // Storage
    pub file_key: String,
    pub file_name: String,
    pub mime_type: String,
    pub byte_size: u64,

    // Provenance
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Resource {
    /// Check the classification invariants: year in [1,4], semester in
    /// {1,2}, unit positive or "all".
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.year == 0 || self.year > MAX_YEAR {
            return Err(ValidationError::Year(self.year));
        }
        if self.semester == 0 || self.semester > MAX_SEMESTER {
            return Err(ValidationError::Semester(self.semester));
        }
        if let Unit::Numbered(0) = self.unit {
            return Err(ValidationError::Unit("0".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// The curriculum slot this resource is scoped to.
    pub fn slot(&self) -> CurriculumSlot {
        CurriculumSlot {
            branch: self.branch.clone(),
            regulation: self.regulation.clone(),
            year: self.year,
            semester: self.semester,
            subject_code: self.subject_code.clone(),
        }
    }
}

/// The (branch, regulation, year, semester, subject) tuple scoping a
/// resource to exactly one course offering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurriculumSlot {
    pub branch: String,
    pub regulation: String,
    pub year: u8,
    pub semester: u8,
    pub subject_code: String,
}

/// Unit classification: a positive unit number, or the whole-subject
/// sentinel "all".
///
/// Serialized as the string `"all"` or the decimal unit number so the
/// same representation works for JSON payloads and postcard snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Unit {
    All,
    Numbered(u8),
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::All => "all".to_string(),
            Unit::Numbered(n) => n.to_string(),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Unit::All);
        }
        match s.parse::<u8>() {
            Ok(n) if n > 0 => Ok(Unit::Numbered(n)),
            _ => Err(ValidationError::Unit(s.to_string())),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::All => f.write_str("all"),
            Unit::Numbered(n) => write!(f, "{}", n),
        }
    }
}

/// What kind of document a resource is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Notes,
    Syllabus,
    QuestionPaper,
    Assignment,
    LabManual,
    Other,
}

impl DocumentType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Notes => "Notes",
            Self::Syllabus => "Syllabus",
            Self::QuestionPaper => "Question Paper",
            Self::Assignment => "Assignment",
            Self::LabManual => "Lab Manual",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match simplify(s).as_str() {
            "notes" | "note" => Ok(Self::Notes),
            "syllabus" => Ok(Self::Syllabus),
            "questionpaper" | "questionpapers" => Ok(Self::QuestionPaper),
            "assignment" | "assignments" => Ok(Self::Assignment),
            "labmanual" | "labmanuals" => Ok(Self::LabManual),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::DocumentType(s.to_string())),
        }
    }
}

/// Broad file format classification, derived from the uploaded file's
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Pdf,
    Image,
    Ppt,
    Word,
    Other,
}

impl FileType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Image => "Image",
            Self::Ppt => "PPT",
            Self::Word => "Word",
            Self::Other => "Other",
        }
    }

    /// Classify by file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "png" | "jpg" | "jpeg" | "gif" | "webp" => Self::Image,
            "ppt" | "pptx" => Self::Ppt,
            "doc" | "docx" => Self::Word,
            _ => Self::Other,
        }
    }

    /// A reasonable MIME type for the given extension.
    pub fn mime_type(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => "application/pdf",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "ppt" => "application/vnd.ms-powerpoint",
            "pptx" => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            "doc" => "application/msword",
            "docx" => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match simplify(s).as_str() {
            "pdf" => Ok(Self::Pdf),
            "image" | "img" => Ok(Self::Image),
            "ppt" | "powerpoint" => Ok(Self::Ppt),
            "word" | "doc" => Ok(Self::Word),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::FileType(s.to_string())),
        }
    }
}

/// Lowercase and strip everything non-alphanumeric, so "Question Paper",
/// "question_paper" and "questionPaper" all parse identically.
fn simplify(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Which resource attribute a result set is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    UploadedAt,
    Title,
    Year,
    Semester,
    ByteSize,
}

impl SortField {
    /// Every field a composite index can order by.
    pub const ALL: [SortField; 5] = [
        Self::UploadedAt,
        Self::Title,
        Self::Year,
        Self::Semester,
        Self::ByteSize,
    ];
}

impl std::str::FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match simplify(s).as_str() {
            "uploadedat" | "uploaded" | "date" => Ok(Self::UploadedAt),
            "title" | "name" => Ok(Self::Title),
            "year" => Ok(Self::Year),
            "semester" => Ok(Self::Semester),
            "bytesize" | "size" => Ok(Self::ByteSize),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort order over a result set. Defaults to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::UploadedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Parse caller-supplied sort strings. A malformed or unknown field
    /// name falls back to the default sort rather than failing the query.
    pub fn parse_or_default(field: Option<&str>, direction: Option<&str>) -> Self {
        let parsed_field = field.and_then(|f| f.parse::<SortField>().ok());
        if field.is_some() && parsed_field.is_none() {
            tracing::debug!("Unknown sort field {:?}, using default sort", field);
        }

        let Some(field) = parsed_field else {
            return Self::default();
        };

        let direction = match direction.map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("asc") || d.eq_ignore_ascii_case("ascending") => {
                SortDirection::Ascending
            }
            Some(d) if d.eq_ignore_ascii_case("desc") || d.eq_ignore_ascii_case("descending") => {
                SortDirection::Descending
            }
            // Unknown direction: keep the field, take its natural default.
            _ => match field {
                SortField::UploadedAt | SortField::ByteSize => SortDirection::Descending,
                _ => SortDirection::Ascending,
            },
        };

        Self { field, direction }
    }
}
