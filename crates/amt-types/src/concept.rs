//! Concept file row type.

use crate::SctId;

/// A row from an RF2 `sct2_Concept_Snapshot_*.txt` file.
///
/// # Examples
///
/// ```
/// use amt_types::{well_known, ConceptRow};
///
/// let row = ConceptRow {
///     id: 21220011000036103,
///     effective_time: 20180430,
///     active: true,
///     module_id: well_known::AMT_MODULE,
///     definition_status_id: 900000000000073002,
/// };
///
/// assert!(row.active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptRow {
    /// Unique identifier for this concept (SCTID).
    pub id: SctId,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this concept is active.
    pub active: bool,
    /// The module containing this concept.
    pub module_id: SctId,
    /// Whether this concept is primitive or fully defined.
    pub definition_status_id: SctId,
}
