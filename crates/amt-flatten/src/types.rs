//! Error taxonomy and pipeline configuration.

use amt_types::{ProductType, SctId};
use thiserror::Error;

/// Errors that can occur while flattening an AMT release.
///
/// The taxonomy distinguishes conditions that always abort (missing input
/// files, unparseable rows) from conditions whose severity depends on the
/// [`FlattenConfig::strict`] flag (dangling edges, invariant violations,
/// ambiguous resolutions). In lenient mode the recoverable variants are
/// recorded in the validation report instead of being returned.
#[derive(Error, Debug)]
pub enum FlattenError {
    /// I/O error reading a release file.
    #[error("IO error reading release file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level error in a tab-separated release file.
    #[error("error reading tab-separated release file: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid SCTID field.
    #[error("invalid SCTID: {value}")]
    InvalidSctId {
        /// The offending field value.
        value: String,
    },

    /// Invalid boolean field (expected "0" or "1").
    #[error("invalid boolean value: {value} (expected 0 or 1)")]
    InvalidBoolean {
        /// The offending field value.
        value: String,
    },

    /// Invalid effective time field (expected YYYYMMDD).
    #[error("invalid date: {value} (expected YYYYMMDD)")]
    InvalidDate {
        /// The offending field value.
        value: String,
    },

    /// Invalid integer field.
    #[error("invalid integer value: {value}")]
    InvalidInteger {
        /// The offending field value.
        value: String,
    },

    /// Header row has too few columns.
    #[error("invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Header column name mismatch.
    #[error("unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// A row failed to parse; carries file and line context.
    #[error("failed processing line {line} of {file}: {source}")]
    Row {
        /// The release file being read.
        file: String,
        /// 1-based line number, counting the header.
        line: usize,
        /// The underlying field error.
        source: Box<FlattenError>,
    },

    /// Input directory does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A mandatory release file is missing.
    #[error("required release file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// Which file kind is missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// An is-a edge references a vertex absent from the graph.
    #[error("dangling is-a edge {source_id} -> {destination}")]
    DanglingEdge {
        /// Edge source concept.
        source_id: SctId,
        /// Edge destination concept.
        destination: SctId,
    },

    /// A data-quality invariant failed in strict mode.
    #[error("{check}: {concepts:?}")]
    Invariant {
        /// Name of the violated check.
        check: String,
        /// The offending concepts.
        concepts: Vec<SctId>,
    },

    /// A unique-ancestor query returned zero or multiple candidates in strict mode.
    #[error("expected 1 {target} ancestor for concept {origin} but got {candidates:?}")]
    Ambiguity {
        /// The query origin concept.
        origin: SctId,
        /// The requested product type.
        target: ProductType,
        /// The candidate set actually found.
        candidates: Vec<SctId>,
    },

    /// A refset row references a concept absent from the cache where the
    /// reference is mandatory.
    #[error("refset row references unknown concept {concept}: {detail}")]
    MissingReference {
        /// The unknown concept id.
        concept: SctId,
        /// Row detail for diagnosis.
        detail: String,
    },
}

impl FlattenError {
    /// Wraps this error with file and line context.
    pub fn at(self, file: &str, line: usize) -> Self {
        Self::Row {
            file: file.to_string(),
            line,
            source: Box::new(self),
        }
    }
}

/// Result type for flattening operations.
pub type FlattenResult<T> = Result<T, FlattenError>;

/// Policy for resolving a branded unit's TP concept.
///
/// Two schema variants exist in the wild: older content attaches the brand
/// only via a direct has-product-name edge, newer content also supports
/// deriving it from the TP branch of the hierarchy. Neither is hard-coded;
/// callers pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrandPolicy {
    /// Use only the unit's direct brand edges.
    #[default]
    DirectEdge,
    /// Use the direct brand edges, falling back to the minimal TP ancestor
    /// when the unit has no direct brand edge.
    AncestorFallback,
}

/// Configuration threaded through every pipeline stage.
///
/// No stage reads process-wide state; strictness and resolution policy are
/// always passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct FlattenConfig {
    /// Abort on the first recorded problem instead of repairing/skipping.
    pub strict: bool,
    /// How a TPUU's brand concept is resolved.
    pub tpuu_brand: BrandPolicy,
}
