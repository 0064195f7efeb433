//! Well-known SNOMED CT-AU concept ids.
//!
//! Constants for the module allow-list, description metadata and the
//! historical association reference sets the flattener consumes.

use crate::SctId;

// =============================================================================
// Modules
// =============================================================================

/// AMT module - 900062011000036108.
///
/// The national medicines terminology extension module.
pub const AMT_MODULE: SctId = 900062011000036108;

/// Australian (SNOMED CT-AU) module - 32506021000036107.
pub const AU_MODULE: SctId = 32506021000036107;

/// SNOMED CT international core module - 900000000000207008.
pub const INTERNATIONAL_MODULE: SctId = 900000000000207008;

/// Australian metadata module - 161771000036108.
pub const AU_METADATA_MODULE: SctId = 161771000036108;

/// SNOMED CT model component (international metadata) module - 900000000000012004.
pub const INTERNATIONAL_METADATA_MODULE: SctId = 900000000000012004;

// =============================================================================
// Relationship types
// =============================================================================

/// Is a (attribute) - 116680003.
///
/// The only relationship type subject to transitive closure.
pub const IS_A: SctId = 116680003;

// =============================================================================
// Descriptions
// =============================================================================

/// Fully specified name description type - 900000000000003001.
pub const FSN_DESCRIPTION_TYPE: SctId = 900000000000003001;

/// Synonym description type - 900000000000013009.
pub const SYNONYM_DESCRIPTION_TYPE: SctId = 900000000000013009;

/// Preferred acceptability - 900000000000548007.
pub const PREFERRED_ACCEPTABILITY: SctId = 900000000000548007;

/// Acceptable acceptability - 900000000000549004.
pub const ACCEPTABLE_ACCEPTABILITY: SctId = 900000000000549004;

// =============================================================================
// Historical associations
// =============================================================================

/// POSSIBLY EQUIVALENT TO association refset - 900000000000523009.
pub const POSSIBLY_EQUIVALENT_TO: SctId = 900000000000523009;

/// ALTERNATIVE association refset - 900000000000530003.
pub const ALTERNATIVE: SctId = 900000000000530003;

/// MOVED TO association refset - 900000000000524003.
pub const MOVED_TO: SctId = 900000000000524003;

/// MOVED FROM association refset - 900000000000525002.
pub const MOVED_FROM: SctId = 900000000000525002;

/// REPLACED BY association refset - 900000000000526001.
pub const REPLACED_BY: SctId = 900000000000526001;

/// SAME AS association refset - 900000000000527005.
pub const SAME_AS: SctId = 900000000000527005;

/// WAS A association refset - 900000000000528000.
pub const WAS_A: SctId = 900000000000528000;

/// SIMILAR TO association refset - 900000000000529008.
pub const SIMILAR_TO: SctId = 900000000000529008;

/// REFERS TO association refset - 900000000000531004.
pub const REFERS_TO: SctId = 900000000000531004;

/// PARTIALLY EQUIVALENT TO association refset - 1186924009.
pub const PARTIALLY_EQUIVALENT_TO: SctId = 1186924009;

/// POSSIBLY REPLACED BY association refset - 1186921001.
pub const POSSIBLY_REPLACED_BY: SctId = 1186921001;

/// The association type whitelist consumed by the replacement tracker.
pub const HISTORICAL_ASSOCIATION_REFSETS: &[SctId] = &[
    POSSIBLY_EQUIVALENT_TO,
    ALTERNATIVE,
    MOVED_TO,
    MOVED_FROM,
    REPLACED_BY,
    SAME_AS,
    WAS_A,
    SIMILAR_TO,
    REFERS_TO,
    PARTIALLY_EQUIVALENT_TO,
    POSSIBLY_REPLACED_BY,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_ids() {
        assert_eq!(AMT_MODULE, 900062011000036108);
        assert_eq!(AU_MODULE, 32506021000036107);
        assert_eq!(INTERNATIONAL_MODULE, 900000000000207008);
    }

    #[test]
    fn test_historical_whitelist_has_no_duplicates() {
        let ids = HISTORICAL_ASSOCIATION_REFSETS;
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(ids.contains(&REPLACED_BY));
    }
}
