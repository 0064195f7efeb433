//! # amt-types
//!
//! Type definitions for AMT (SNOMED CT-AU) terminology release data.
//!
//! This crate provides the row record types for the RF2 snapshot files an
//! AMT release bundle carries, the closed vocabulary of recognized
//! relationship types, the seven AMT product types, and well-known
//! concept id constants.
//!
//! ## Features
//!
//! - `serde` (default): serialization support for the row types. Disable
//!   for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use amt_types::{well_known, AttributeType, ConceptRow, ProductType, SctId};
//!
//! let concept = ConceptRow {
//!     id: 21220011000036103,
//!     effective_time: 20180430,
//!     active: true,
//!     module_id: well_known::AMT_MODULE,
//!     definition_status_id: 900000000000073002,
//! };
//!
//! assert!(concept.active);
//!
//! let is_a: SctId = well_known::IS_A;
//! assert_eq!(AttributeType::from_id(is_a), Some(AttributeType::IsA));
//! assert_eq!(ProductType::Mpp.refset_id(), 929360081000036101);
//! ```

#![warn(missing_docs)]

pub mod attribute;
mod concept;
mod description;
pub mod product;
pub mod refset;
mod relationship;
pub mod sctid;
pub mod well_known;

// Re-export all public types at crate root
pub use attribute::AttributeType;
pub use concept::ConceptRow;
pub use description::DescriptionRow;
pub use product::ProductType;
pub use refset::{AssociationRefsetRow, LanguageRefsetRow, SimpleMapRefsetRow, SimpleRefsetRow};
pub use relationship::RelationshipRow;
pub use sctid::SctId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _id: SctId = 21220011000036103;
        let _attr = AttributeType::IsA;
        let _product = ProductType::Ctpp;
    }

    #[test]
    fn test_well_known_accessible() {
        assert_eq!(well_known::IS_A, 116680003);
        assert_eq!(well_known::AMT_MODULE, 900062011000036108);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let row = ConceptRow {
            id: 21220011000036103,
            effective_time: 20180430,
            active: true,
            module_id: well_known::AMT_MODULE,
            definition_status_id: 900000000000073002,
        };

        let json = serde_json::to_string(&row).unwrap();
        let parsed: ConceptRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, parsed);
    }
}
