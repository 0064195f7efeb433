//! # amt-flatten
//!
//! Flattens an AMT (SNOMED CT-AU) release bundle into a denormalized CSV
//! of the medicinal product pack hierarchy, plus an optional listing of
//! inactive concepts and their replacements.
//!
//! The pipeline runs in stages:
//!
//! 1. locate the snapshot files under the input directory,
//! 2. load them into an in-memory concept cache and close the is-a
//!    hierarchy,
//! 3. validate and, in lenient mode, repair the cache,
//! 4. resolve each dispensed pack's hierarchy slice into flat rows,
//! 5. write the CSV outputs and the validation report.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use amt_flatten::{flatten_release, FlattenConfig};
//!
//! # fn main() -> Result<(), amt_flatten::FlattenError> {
//! let outcome = flatten_release("/data/amt-release", &FlattenConfig::default())?;
//! amt_flatten::flatfile::write_flat_file_path("flat.csv", &outcome.rows)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod assembler;
pub mod cache;
pub mod flatfile;
pub mod graph;
pub mod locator;
pub mod parser;
pub mod replacement;
pub mod report;
pub mod resolver;
mod rows;
pub mod types;
mod validate;

use std::path::Path;

pub use assembler::{FlatRow, FlatRowAssembler};
pub use cache::{AmtCache, Concept};
pub use graph::{ClosedGraph, ConceptGraph};
pub use locator::{discover_release_files, ReleaseFiles};
pub use replacement::Replacement;
pub use report::{ValidationCase, ValidationFailure, ValidationReport};
pub use resolver::AncestorResolver;
pub use types::{BrandPolicy, FlattenConfig, FlattenError, FlattenResult};

use tracing::info;

/// Everything one run of the pipeline produced.
#[derive(Debug)]
pub struct FlattenOutcome {
    /// The loaded (and possibly repaired) cache; still needed to render
    /// preferred terms for the replacements output.
    pub cache: AmtCache,
    /// The assembled flat rows, in pack id order.
    pub rows: Vec<FlatRow>,
    /// Everything recorded along the way.
    pub report: ValidationReport,
    /// Release date parsed from the bundle's filenames, when present.
    pub release_date: Option<String>,
}

/// Runs the pipeline over a release directory.
///
/// # Errors
/// Returns an error for missing or malformed input, and for any recorded
/// data-quality problem when `config.strict` is set.
pub fn flatten_release<P: AsRef<Path>>(
    input: P,
    config: &FlattenConfig,
) -> FlattenResult<FlattenOutcome> {
    let input = input.as_ref();
    info!(input = %input.display(), strict = config.strict, "flattening release");

    let files = discover_release_files(input)?;
    if let Some(date) = &files.release_date {
        info!(release_date = %date, "release identified");
    }

    let mut report = ValidationReport::new();
    let cache = AmtCache::load(&files, config, &mut report)?;
    let rows = FlatRowAssembler::new(&cache, config).assemble(&mut report)?;

    Ok(FlattenOutcome {
        cache,
        rows,
        report,
        release_date: files.release_date,
    })
}
