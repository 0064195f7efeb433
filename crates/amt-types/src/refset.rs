//! Reference set member row types.
//!
//! AMT releases carry several reference set shapes the flattener consumes:
//!
//! - **Language refsets** mark descriptions as preferred or acceptable;
//! - **Simple map refsets** attach ARTG registration ids to pack concepts;
//! - **Simple refsets** mark concepts as members of the seven AMT product
//!   types (the type-marker refsets);
//! - **Association refsets** link inactivated concepts to replacements.
//!
//! Unlike core component rows, refset member ids are UUID strings.

use crate::{sctid, well_known, SctId};

/// A row from a `der2_cRefset_Language*.txt` file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageRefsetRow {
    /// Member UUID.
    pub id: String,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The language reference set (dialect).
    pub refset_id: SctId,
    /// The description id this membership applies to.
    pub referenced_component_id: SctId,
    /// Preferred or acceptable.
    pub acceptability_id: SctId,
}

impl LanguageRefsetRow {
    /// Returns true if the referenced description is preferred in this dialect.
    pub fn is_preferred(&self) -> bool {
        self.acceptability_id == well_known::PREFERRED_ACCEPTABILITY
    }
}

/// A row from a `der2_iRefset_ARTGId*.txt` / `der2_iRefset_SimpleMap*.txt`
/// file, attaching an external registration id to a concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleMapRefsetRow {
    /// Member UUID.
    pub id: String,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The map reference set.
    pub refset_id: SctId,
    /// The concept the map target is attached to.
    pub referenced_component_id: SctId,
    /// The map target, e.g. an ARTG id like "AUST R 123456".
    pub map_target: String,
}

/// A row from a `der2_Refset_MedicinalProduct*.txt` type-marker file.
///
/// Membership of one of the seven AMT product refsets is what gives a
/// concept its semantic type; there is no subtype hierarchy of concept
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRefsetRow {
    /// Member UUID.
    pub id: String,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The reference set this member belongs to.
    pub refset_id: SctId,
    /// The concept that is a member.
    pub referenced_component_id: SctId,
}

/// A row from a historical association refset file, linking an inactivated
/// component to its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssociationRefsetRow {
    /// Member UUID.
    pub id: String,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The association type refset (e.g. REPLACED BY).
    pub refset_id: SctId,
    /// The inactivated component.
    pub referenced_component_id: SctId,
    /// The replacement component.
    pub target_component_id: SctId,
}

impl AssociationRefsetRow {
    /// Returns true if the refset id is in the historical association whitelist.
    pub fn is_historical_association(&self) -> bool {
        well_known::HISTORICAL_ASSOCIATION_REFSETS.contains(&self.refset_id)
    }

    /// Returns true if the inactivated component is a concept.
    ///
    /// Association refsets also carry description-level associations, which
    /// the replacement tracker must skip.
    pub fn refers_to_concept(&self) -> bool {
        sctid::is_concept_id(self.referenced_component_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_refset_preferred() {
        let member = LanguageRefsetRow {
            id: "800aa109-431f-4407-a431-6fe65e9db160".to_string(),
            effective_time: 20180430,
            active: true,
            module_id: well_known::AMT_MODULE,
            refset_id: 32570271000036106,
            referenced_component_id: 99133141000036118,
            acceptability_id: well_known::PREFERRED_ACCEPTABILITY,
        };

        assert!(member.is_preferred());
    }

    #[test]
    fn test_association_whitelist() {
        let mut member = AssociationRefsetRow {
            id: "bb431510-b075-4d9f-8b47-e464fefdee27".to_string(),
            effective_time: 20180430,
            active: true,
            module_id: well_known::AMT_MODULE,
            refset_id: 900000000000526001, // REPLACED BY
            referenced_component_id: 21220011000036103,
            target_component_id: 21286011000036106,
        };

        assert!(member.is_historical_association());
        assert!(member.refers_to_concept());

        member.refset_id = 447562003; // ICD-10 map, not historical
        assert!(!member.is_historical_association());

        member.referenced_component_id = 99133141000036118; // description id
        assert!(!member.refers_to_concept());
    }
}
