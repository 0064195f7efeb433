//! The closed vocabulary of recognized relationship types.

use crate::SctId;

/// Relationship types the flattener recognizes.
///
/// Relationship rows whose type id is outside this vocabulary are silently
/// ignored during ingestion. Only a handful of variants drive graph
/// construction (`IsA`, the unit types, `ContainsPackagedClinicalDrug` and
/// the brand types); the rest are recognized so that schema drift shows up
/// as an explicit no-op rather than an accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// Is a (subtype) - 116680003.
    IsA,
    /// Has unit - 177631000036102.
    HasUnit,
    /// Has MPUU - 30348011000036104.
    HasMpuu,
    /// Has Australian BoSS - 30364011000036101.
    HasAustralianBoss,
    /// Is modification of - 30394011000036104.
    IsModificationOf,
    /// Has TPUU - 30409011000036107.
    HasTpuu,
    /// Has subpack - 30454011000036104.
    HasSubpack,
    /// Has container type - 30465011000036106.
    HasContainerType,
    /// Has TPP - 30488011000036103.
    HasTpp,
    /// Has manufactured dose form - 30523011000036108.
    HasManufacturedDoseForm,
    /// Has unit of use - 30548011000036101.
    HasUnitOfUse,
    /// Has component pack - 700000061000036106.
    HasComponentPack,
    /// Has denominator units - 700000071000036103.
    HasDenominatorUnits,
    /// Has intended active ingredient - 700000081000036101.
    HasIntendedActiveIngredient,
    /// Has active ingredient - 127489000.
    HasActiveIngredient,
    /// Has precise active ingredient - 762949000.
    HasPreciseActiveIngredient,
    /// Has numerator units - 700000091000036104.
    HasNumeratorUnits,
    /// Has TP - 700000101000036108.
    HasTp,
    /// Strength - 700000111000036105.
    Strength,
    /// Unit of use size - 700000141000036106.
    UnitOfUseSize,
    /// Unit of use quantity - 700000131000036101.
    UnitOfUseQuantity,
    /// Subpack quantity - 700000121000036103.
    SubpackQuantity,
    /// Has concentration strength value - 999000021000168100.
    HasConcentrationStrengthValue,
    /// Has concentration strength unit - 999000031000168102.
    HasConcentrationStrengthUnit,
    /// Has total quantity value - 999000041000168106.
    HasTotalQuantityValue,
    /// Has total quantity unit - 999000051000168108.
    HasTotalQuantityUnit,
    /// Contains clinical drug - 774160008.
    ContainsClinicalDrug,
    /// Contains device - 999000081000168101.
    ContainsDevice,
    /// Has device type - 999000061000168105.
    HasDeviceType,
    /// Package - 999000071000168104.
    Package,
    /// Contains packaged clinical drug - 999000011000168107.
    ContainsPackagedClinicalDrug,
    /// Has product name - 774158006.
    HasProductName,
    /// Has other identifying information - 999000001000168109.
    HasOtherIdentifyingInformation,
}

impl AttributeType {
    /// Returns the SCTID for this attribute type.
    pub const fn id(self) -> SctId {
        match self {
            Self::IsA => 116680003,
            Self::HasUnit => 177631000036102,
            Self::HasMpuu => 30348011000036104,
            Self::HasAustralianBoss => 30364011000036101,
            Self::IsModificationOf => 30394011000036104,
            Self::HasTpuu => 30409011000036107,
            Self::HasSubpack => 30454011000036104,
            Self::HasContainerType => 30465011000036106,
            Self::HasTpp => 30488011000036103,
            Self::HasManufacturedDoseForm => 30523011000036108,
            Self::HasUnitOfUse => 30548011000036101,
            Self::HasComponentPack => 700000061000036106,
            Self::HasDenominatorUnits => 700000071000036103,
            Self::HasIntendedActiveIngredient => 700000081000036101,
            Self::HasActiveIngredient => 127489000,
            Self::HasPreciseActiveIngredient => 762949000,
            Self::HasNumeratorUnits => 700000091000036104,
            Self::HasTp => 700000101000036108,
            Self::Strength => 700000111000036105,
            Self::UnitOfUseSize => 700000141000036106,
            Self::UnitOfUseQuantity => 700000131000036101,
            Self::SubpackQuantity => 700000121000036103,
            Self::HasConcentrationStrengthValue => 999000021000168100,
            Self::HasConcentrationStrengthUnit => 999000031000168102,
            Self::HasTotalQuantityValue => 999000041000168106,
            Self::HasTotalQuantityUnit => 999000051000168108,
            Self::ContainsClinicalDrug => 774160008,
            Self::ContainsDevice => 999000081000168101,
            Self::HasDeviceType => 999000061000168105,
            Self::Package => 999000071000168104,
            Self::ContainsPackagedClinicalDrug => 999000011000168107,
            Self::HasProductName => 774158006,
            Self::HasOtherIdentifyingInformation => 999000001000168109,
        }
    }

    /// Looks up an attribute type by SCTID.
    ///
    /// Returns `None` for ids outside the vocabulary.
    pub fn from_id(id: SctId) -> Option<Self> {
        ALL.iter().copied().find(|a| a.id() == id)
    }
}

/// All recognized attribute types.
pub const ALL: &[AttributeType] = &[
    AttributeType::IsA,
    AttributeType::HasUnit,
    AttributeType::HasMpuu,
    AttributeType::HasAustralianBoss,
    AttributeType::IsModificationOf,
    AttributeType::HasTpuu,
    AttributeType::HasSubpack,
    AttributeType::HasContainerType,
    AttributeType::HasTpp,
    AttributeType::HasManufacturedDoseForm,
    AttributeType::HasUnitOfUse,
    AttributeType::HasComponentPack,
    AttributeType::HasDenominatorUnits,
    AttributeType::HasIntendedActiveIngredient,
    AttributeType::HasActiveIngredient,
    AttributeType::HasPreciseActiveIngredient,
    AttributeType::HasNumeratorUnits,
    AttributeType::HasTp,
    AttributeType::Strength,
    AttributeType::UnitOfUseSize,
    AttributeType::UnitOfUseQuantity,
    AttributeType::SubpackQuantity,
    AttributeType::HasConcentrationStrengthValue,
    AttributeType::HasConcentrationStrengthUnit,
    AttributeType::HasTotalQuantityValue,
    AttributeType::HasTotalQuantityUnit,
    AttributeType::ContainsClinicalDrug,
    AttributeType::ContainsDevice,
    AttributeType::HasDeviceType,
    AttributeType::Package,
    AttributeType::ContainsPackagedClinicalDrug,
    AttributeType::HasProductName,
    AttributeType::HasOtherIdentifyingInformation,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for attr in ALL {
            assert_eq!(AttributeType::from_id(attr.id()), Some(*attr));
        }
    }

    #[test]
    fn test_unknown_id() {
        assert_eq!(AttributeType::from_id(363698007), None);
        assert_eq!(AttributeType::from_id(0), None);
    }

    #[test]
    fn test_no_duplicate_ids() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.id(), b.id(), "duplicate id for {:?} and {:?}", a, b);
            }
        }
    }
}
