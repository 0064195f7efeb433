//! SCTID type alias.

/// A SNOMED CT identifier.
///
/// SCTIDs are 6-18 digit positive integers, which fit comfortably in a u64.
/// Using a type alias rather than a newtype keeps the hot paths (HashMap
/// lookups, set operations) free of wrapper overhead.
pub type SctId = u64;

/// Returns the partition digit of an SCTID (second-to-last digit).
///
/// The partition digit distinguishes component types: 0 for concepts,
/// 1 for descriptions, 2 for relationships.
pub fn partition_digit(id: SctId) -> u8 {
    ((id / 10) % 10) as u8
}

/// Returns true if the SCTID identifies a concept.
pub fn is_concept_id(id: SctId) -> bool {
    partition_digit(id) == 0
}

/// Returns true if the SCTID identifies a description.
pub fn is_description_id(id: SctId) -> bool {
    partition_digit(id) == 1
}
