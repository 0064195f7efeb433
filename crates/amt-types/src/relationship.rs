//! Relationship file row type.

use crate::{well_known, AttributeType, SctId};

/// A row from an RF2 `sct2_Relationship_Snapshot_*.txt` file.
///
/// # Examples
///
/// ```
/// use amt_types::{well_known, AttributeType, RelationshipRow};
///
/// let row = RelationshipRow {
///     id: 1151261000168121,
///     effective_time: 20180430,
///     active: true,
///     module_id: well_known::AMT_MODULE,
///     source_id: 21220011000036103,
///     destination_id: 21286011000036106,
///     relationship_group: 0,
///     type_id: well_known::IS_A,
///     characteristic_type_id: 900000000000011006,
///     modifier_id: 900000000000451002,
/// };
///
/// assert!(row.is_is_a());
/// assert_eq!(row.attribute_type(), Some(AttributeType::IsA));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipRow {
    /// Unique identifier for this relationship (SCTID).
    pub id: SctId,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this relationship is active.
    pub active: bool,
    /// The module containing this relationship.
    pub module_id: SctId,
    /// Source concept (subject).
    pub source_id: SctId,
    /// Destination concept (object).
    pub destination_id: SctId,
    /// Role group number (0 = ungrouped).
    pub relationship_group: u16,
    /// Relationship type (e.g. is-a, has TPUU).
    pub type_id: SctId,
    /// Whether this is stated or inferred.
    pub characteristic_type_id: SctId,
    /// Modifier (existential or universal).
    pub modifier_id: SctId,
}

impl RelationshipRow {
    /// Returns true if this is an is-a (subtype) relationship.
    pub fn is_is_a(&self) -> bool {
        self.type_id == well_known::IS_A
    }

    /// Returns the recognized attribute type for this relationship, if any.
    ///
    /// Relationship types outside the closed vocabulary return `None` and
    /// are ignored by the flattener.
    pub fn attribute_type(&self) -> Option<AttributeType> {
        AttributeType::from_id(self.type_id)
    }
}
