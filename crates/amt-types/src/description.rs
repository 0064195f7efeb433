//! Description file row type.

use crate::{well_known, SctId};

/// A row from an RF2 `sct2_Description_Snapshot-en-AU_*.txt` file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptionRow {
    /// Unique identifier for this description (SCTID).
    pub id: SctId,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this description is active.
    pub active: bool,
    /// The module containing this description.
    pub module_id: SctId,
    /// The concept this description names.
    pub concept_id: SctId,
    /// Language code, e.g. "en".
    pub language_code: String,
    /// Description type (FSN or synonym).
    pub type_id: SctId,
    /// The term text.
    pub term: String,
    /// Case significance of the term.
    pub case_significance_id: SctId,
}

impl DescriptionRow {
    /// Returns true if this is a fully specified name.
    pub fn is_fsn(&self) -> bool {
        self.type_id == well_known::FSN_DESCRIPTION_TYPE
    }

    /// Returns true if this is a synonym.
    pub fn is_synonym(&self) -> bool {
        self.type_id == well_known::SYNONYM_DESCRIPTION_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_type_helpers() {
        let mut row = DescriptionRow {
            id: 99133141000036118,
            effective_time: 20180430,
            active: true,
            module_id: well_known::AMT_MODULE,
            concept_id: 21220011000036103,
            language_code: "en".to_string(),
            type_id: well_known::FSN_DESCRIPTION_TYPE,
            term: "paracetamol 500 mg tablet (medicinal product unit of use)".to_string(),
            case_significance_id: 900000000000448009,
        };

        assert!(row.is_fsn());
        assert!(!row.is_synonym());

        row.type_id = well_known::SYNONYM_DESCRIPTION_TYPE;
        assert!(row.is_synonym());
        assert!(!row.is_fsn());
    }
}
