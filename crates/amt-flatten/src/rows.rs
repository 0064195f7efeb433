//! [`Rf2Record`] implementations for the release file row types.
//!
//! One impl per file kind, each with its positional column layout.

use amt_types::{
    AssociationRefsetRow, ConceptRow, DescriptionRow, LanguageRefsetRow, RelationshipRow,
    SimpleMapRefsetRow, SimpleRefsetRow,
};
use csv::StringRecord;

use crate::parser::{field, Rf2Record};
use crate::types::FlattenResult;

/// Expected columns in a concept file.
const CONCEPT_COLUMNS: &[&str] = &["id", "effectiveTime", "active", "moduleId", "definitionStatusId"];

/// Expected columns in a description file.
const DESCRIPTION_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "conceptId",
    "languageCode",
    "typeId",
    "term",
    "caseSignificanceId",
];

/// Expected columns in a relationship file.
const RELATIONSHIP_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "sourceId",
    "destinationId",
    "relationshipGroup",
    "typeId",
    "characteristicTypeId",
    "modifierId",
];

/// Expected columns in a language reference set file.
const LANGUAGE_REFSET_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "acceptabilityId",
];

/// Expected columns in a simple map (ARTG id) reference set file.
const SIMPLE_MAP_REFSET_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "mapTarget",
];

/// Expected columns in a simple (type-marker) reference set file.
const SIMPLE_REFSET_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
];

/// Expected columns in an association reference set file.
const ASSOCIATION_REFSET_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "targetComponentId",
];

impl Rf2Record for ConceptRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = CONCEPT_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: field::sctid(record.get(0).unwrap_or(""))?,
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            definition_status_id: field::sctid(record.get(4).unwrap_or(""))?,
        })
    }
}

impl Rf2Record for DescriptionRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = DESCRIPTION_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: field::sctid(record.get(0).unwrap_or(""))?,
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            concept_id: field::sctid(record.get(4).unwrap_or(""))?,
            language_code: record.get(5).unwrap_or("").to_string(),
            type_id: field::sctid(record.get(6).unwrap_or(""))?,
            term: record.get(7).unwrap_or("").to_string(),
            case_significance_id: field::sctid(record.get(8).unwrap_or(""))?,
        })
    }
}

impl Rf2Record for RelationshipRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = RELATIONSHIP_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: field::sctid(record.get(0).unwrap_or(""))?,
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            source_id: field::sctid(record.get(4).unwrap_or(""))?,
            destination_id: field::sctid(record.get(5).unwrap_or(""))?,
            relationship_group: field::integer(record.get(6).unwrap_or(""))?,
            type_id: field::sctid(record.get(7).unwrap_or(""))?,
            characteristic_type_id: field::sctid(record.get(8).unwrap_or(""))?,
            modifier_id: field::sctid(record.get(9).unwrap_or(""))?,
        })
    }
}

impl Rf2Record for LanguageRefsetRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = LANGUAGE_REFSET_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: record.get(0).unwrap_or("").to_string(),
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            refset_id: field::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: field::sctid(record.get(5).unwrap_or(""))?,
            acceptability_id: field::sctid(record.get(6).unwrap_or(""))?,
        })
    }
}

impl Rf2Record for SimpleMapRefsetRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = SIMPLE_MAP_REFSET_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: record.get(0).unwrap_or("").to_string(),
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            refset_id: field::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: field::sctid(record.get(5).unwrap_or(""))?,
            map_target: record.get(6).unwrap_or("").to_string(),
        })
    }
}

impl Rf2Record for SimpleRefsetRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = SIMPLE_REFSET_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: record.get(0).unwrap_or("").to_string(),
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            refset_id: field::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: field::sctid(record.get(5).unwrap_or(""))?,
        })
    }
}

impl Rf2Record for AssociationRefsetRow {
    const EXPECTED_COLUMNS: &'static [&'static str] = ASSOCIATION_REFSET_COLUMNS;

    fn from_record(record: &StringRecord) -> FlattenResult<Self> {
        Ok(Self {
            id: record.get(0).unwrap_or("").to_string(),
            effective_time: field::effective_time(record.get(1).unwrap_or(""))?,
            active: field::boolean(record.get(2).unwrap_or(""))?,
            module_id: field::sctid(record.get(3).unwrap_or(""))?,
            refset_id: field::sctid(record.get(4).unwrap_or(""))?,
            referenced_component_id: field::sctid(record.get(5).unwrap_or(""))?,
            target_component_id: field::sctid(record.get(6).unwrap_or(""))?,
        })
    }
}
