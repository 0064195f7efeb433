//! The seven AMT product types.

use std::fmt;

use crate::SctId;

/// Semantic types in the AMT medicinal product hierarchy.
///
/// A concept's product type is decided by reference set membership, looked
/// up via [`ProductType::refset_id`]. Each type also has an abstract
/// enumeration-root concept at the top of its branch of the hierarchy
/// ([`ProductType::root_concept_id`]); those placeholder concepts are never
/// valid resolution results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductType {
    /// Containered trade product pack - the dispensed pack.
    Ctpp,
    /// Trade product pack - the branded pack.
    Tpp,
    /// Trade product unit of use - the branded unit.
    Tpuu,
    /// Trade product - the brand itself.
    Tp,
    /// Medicinal product pack - the generic pack.
    Mpp,
    /// Medicinal product unit of use - the generic unit.
    Mpuu,
    /// Medicinal product - the generic ingredient level.
    Mp,
}

/// All product types, in hierarchy order from dispensed pack down.
pub const PRODUCT_TYPES: &[ProductType] = &[
    ProductType::Ctpp,
    ProductType::Tpp,
    ProductType::Tpuu,
    ProductType::Tp,
    ProductType::Mpp,
    ProductType::Mpuu,
    ProductType::Mp,
];

impl ProductType {
    /// Returns the reference set id whose membership marks this type.
    pub const fn refset_id(self) -> SctId {
        match self {
            Self::Ctpp => 929360051000036108,
            Self::Tpp => 929360041000036105,
            Self::Tpuu => 929360031000036100,
            Self::Tp => 929360021000036102,
            Self::Mpp => 929360081000036101,
            Self::Mpuu => 929360071000036103,
            Self::Mp => 929360061000036106,
        }
    }

    /// Returns the abstract enumeration-root concept for this type.
    pub const fn root_concept_id(self) -> SctId {
        match self {
            Self::Ctpp => 30537011000036101,
            Self::Tpp => 30404011000036106,
            Self::Tpuu => 30425011000036101,
            Self::Tp => 30560011000036108,
            Self::Mpp => 30513011000036104,
            Self::Mpuu => 30450011000036109,
            Self::Mp => 30497011000036103,
        }
    }

    /// Looks up a product type by its reference set id.
    pub fn from_refset_id(id: SctId) -> Option<Self> {
        PRODUCT_TYPES.iter().copied().find(|p| p.refset_id() == id)
    }

    /// Returns true if the id is one of the enumeration-root concepts.
    pub fn is_root_concept(id: SctId) -> bool {
        PRODUCT_TYPES.iter().any(|p| p.root_concept_id() == id)
    }

    /// Short uppercase name as used in output headers and log messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ctpp => "CTPP",
            Self::Tpp => "TPP",
            Self::Tpuu => "TPUU",
            Self::Tp => "TP",
            Self::Mpp => "MPP",
            Self::Mpuu => "MPUU",
            Self::Mp => "MP",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refset_round_trip() {
        for pt in PRODUCT_TYPES {
            assert_eq!(ProductType::from_refset_id(pt.refset_id()), Some(*pt));
        }
        assert_eq!(ProductType::from_refset_id(116680003), None);
    }

    #[test]
    fn test_root_concepts() {
        assert!(ProductType::is_root_concept(30537011000036101)); // CTPP root
        assert!(ProductType::is_root_concept(30497011000036103)); // MP root
        assert!(!ProductType::is_root_concept(21220011000036103));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductType::Ctpp.to_string(), "CTPP");
        assert_eq!(ProductType::Mpuu.to_string(), "MPUU");
    }
}
