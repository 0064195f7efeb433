//! CSV output for flat rows and replacement records.
//!
//! The output format quotes every preferred-term column and leaves ids and
//! regulatory ids bare. Fields are pre-quoted and the writer's own quoting
//! is disabled, so the quoting convention is ours rather than the
//! serializer's default.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::assembler::FlatRow;
use crate::cache::AmtCache;
use crate::types::FlattenResult;

/// Header of the flat file output.
pub const FLAT_FILE_HEADER: &[&str] = &[
    "CTPP SCTID",
    "CTPP PT",
    "ARTG_ID",
    "TPP SCTID",
    "TPP PT",
    "TPUU SCTID",
    "TPUU PT",
    "TPP TP SCTID",
    "TPP TP PT",
    "TPUU TP SCTID",
    "TPUU TP PT",
    "MPP SCTID",
    "MPP PT",
    "MPUU SCTID",
    "MPUU PT",
    "MP SCTID",
    "MP PT",
];

/// Header of the replacements output.
pub const REPLACEMENTS_HEADER: &[&str] = &[
    "INACTIVE SCTID",
    "INACTIVE PT",
    "REPLACEMENT TYPE SCTID",
    "REPLACEMENT TYPE PT",
    "REPLACEMENT SCTID",
    "REPLACEMENT PT",
    "DATE",
];

fn quoted(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\"\""))
}

/// Writes the flat file to `writer`.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_flat_file<W: Write>(writer: W, rows: &[FlatRow]) -> FlattenResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    csv_writer.write_record(FLAT_FILE_HEADER)?;
    for row in rows {
        csv_writer.write_record([
            row.ctpp_id.to_string(),
            quoted(&row.ctpp_pt),
            row.artg_id.clone(),
            row.tpp_id.to_string(),
            quoted(&row.tpp_pt),
            row.tpuu_id.to_string(),
            quoted(&row.tpuu_pt),
            row.tpp_tp_id.to_string(),
            quoted(&row.tpp_tp_pt),
            row.tpuu_tp_id.to_string(),
            quoted(&row.tpuu_tp_pt),
            row.mpp_id.to_string(),
            quoted(&row.mpp_pt),
            row.mpuu_id.to_string(),
            quoted(&row.mpuu_pt),
            row.mp_id.to_string(),
            quoted(&row.mp_pt),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the flat file to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns an error if the file cannot be created or writing fails.
pub fn write_flat_file_path<P: AsRef<Path>>(path: P, rows: &[FlatRow]) -> FlattenResult<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    write_flat_file(fs::File::create(path)?, rows)
}

/// Writes the replacements file to `writer`, in replacement order.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_replacements<W: Write>(writer: W, cache: &AmtCache) -> FlattenResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    csv_writer.write_record(REPLACEMENTS_HEADER)?;
    for replacement in cache.replacements() {
        csv_writer.write_record([
            replacement.inactive_id.to_string(),
            quoted(cache.preferred_term(replacement.inactive_id)),
            replacement.type_id.to_string(),
            quoted(cache.preferred_term(replacement.type_id)),
            replacement.active_id.to_string(),
            quoted(cache.preferred_term(replacement.active_id)),
            replacement.effective_time.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the replacements file to `path`, creating parent directories as
/// needed.
///
/// # Errors
/// Returns an error if the file cannot be created or writing fails.
pub fn write_replacements_path<P: AsRef<Path>>(path: P, cache: &AmtCache) -> FlattenResult<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    write_replacements(fs::File::create(path)?, cache)
}

fn create_parent_dir(path: &Path) -> FlattenResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
