//! In-memory concept cache built from one release bundle.
//!
//! Loading is single-pass per file, in dependency order: concepts first so
//! every later row can be checked against the known-concept set, then
//! relationships, language refset, descriptions, ARTG ids, product type
//! markers and finally the historical association files.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use amt_types::{
    well_known, AssociationRefsetRow, AttributeType, ConceptRow, DescriptionRow, LanguageRefsetRow,
    ProductType, RelationshipRow, SctId, SimpleMapRefsetRow, SimpleRefsetRow,
};
use tracing::{info, warn};

use crate::graph::{ClosedGraph, ConceptGraph};
use crate::locator::ReleaseFiles;
use crate::parser::Rf2FileParser;
use crate::replacement::Replacement;
use crate::report::ValidationReport;
use crate::types::{FlattenConfig, FlattenError, FlattenResult};
use crate::validate;

/// Report case name for inactive concepts found at the top of the CTPP branch.
pub const INACTIVE_CTPP_CASE: &str = "Inactive_CTPP";

/// A concept and the edges the flattener cares about.
///
/// Relations are stored as id sets rather than references so the cache has
/// no ownership cycles; resolution back to [`Concept`] goes through the
/// cache.
#[derive(Debug, Clone, Default)]
pub struct Concept {
    /// Concept id.
    pub id: SctId,
    /// Active flag from the concept file.
    pub active: bool,
    /// Fully specified name.
    pub fsn: String,
    /// Preferred term in the national dialect.
    pub preferred_term: String,
    /// Direct is-a parents.
    pub parents: BTreeSet<SctId>,
    /// Direct unit edges (has-MPUU, has-TPUU, contains-clinical-drug).
    pub units: BTreeSet<SctId>,
    /// Direct subpack edges (contains-packaged-clinical-drug).
    pub subpacks: BTreeSet<SctId>,
    /// Direct brand edges (has-TP, has-product-name).
    pub tps: BTreeSet<SctId>,
    /// ARTG registration ids, trimmed.
    pub artg_ids: BTreeSet<String>,
}

impl Concept {
    fn new(id: SctId, active: bool) -> Self {
        Self {
            id,
            active,
            ..Self::default()
        }
    }
}

/// The loaded release: concepts, the closed is-a hierarchy, product type
/// membership and replacement history.
#[derive(Debug)]
pub struct AmtCache {
    pub(crate) concepts: HashMap<SctId, Concept>,
    pub(crate) closure: ClosedGraph,
    pub(crate) refset_members: HashMap<ProductType, HashSet<SctId>>,
    pub(crate) ctpps: BTreeSet<SctId>,
    pub(crate) replacements: BTreeSet<Replacement>,
}

impl AmtCache {
    /// Loads a cache from a located release file set.
    ///
    /// Data-quality repairs and skips are recorded in `report`; with
    /// `config.strict` set, the first recorded problem aborts instead.
    ///
    /// # Errors
    /// Returns an error for unreadable or malformed files, rows referencing
    /// unknown concepts where a reference is mandatory, and any recoverable
    /// problem when strict.
    pub fn load(
        files: &ReleaseFiles,
        config: &FlattenConfig,
        report: &mut ValidationReport,
    ) -> FlattenResult<Self> {
        let mut loader = CacheLoader::default();

        loader.read_concepts(required(&files.concept_file, "concept snapshot")?)?;
        loader.read_relationships(required(&files.relationship_file, "relationship snapshot")?)?;
        loader.read_language_refset(required(
            &files.language_refset_file,
            "language refset snapshot",
        )?)?;
        loader.read_descriptions(required(&files.description_file, "description snapshot")?)?;
        loader.read_artg_refset(required(&files.artg_refset_file, "ARTG id refset snapshot")?)?;
        loader.read_product_refset(required(
            &files.product_refset_file,
            "product type refset snapshot",
        )?)?;
        for historical in &files.historical_association_files {
            loader.read_historical_refset(historical)?;
        }

        let mut cache = loader.finish(config, report)?;

        validate::validate_concepts(&mut cache, config.strict, report)?;
        info!(
            ctpps = cache.ctpps.len(),
            concepts = cache.concepts.len(),
            "loaded concept cache"
        );
        validate::validate_structure(&cache, config.strict, report)?;

        Ok(cache)
    }

    /// Looks up a concept.
    pub fn concept(&self, id: SctId) -> Option<&Concept> {
        self.concepts.get(&id)
    }

    /// Preferred term of a concept, empty if unknown.
    pub fn preferred_term(&self, id: SctId) -> &str {
        self.concepts
            .get(&id)
            .map_or("", |c| c.preferred_term.as_str())
    }

    /// The closed is-a hierarchy.
    pub fn closure(&self) -> &ClosedGraph {
        &self.closure
    }

    /// True if `id` is a member of `product_type`'s marker refset.
    pub fn is_member(&self, product_type: ProductType, id: SctId) -> bool {
        self.refset_members
            .get(&product_type)
            .is_some_and(|m| m.contains(&id))
    }

    /// Members of `product_type`'s marker refset.
    pub fn members(&self, product_type: ProductType) -> Option<&HashSet<SctId>> {
        self.refset_members.get(&product_type)
    }

    /// The active dispensed-pack concepts, in id order.
    pub fn ctpps(&self) -> impl Iterator<Item = SctId> + '_ {
        self.ctpps.iter().copied()
    }

    /// The recorded replacement history, sorted and de-duplicated.
    pub fn replacements(&self) -> &BTreeSet<Replacement> {
        &self.replacements
    }

    /// The units of a pack concept.
    ///
    /// A pack with direct unit edges contributes those; a composite pack
    /// with only subpack edges contributes the union of its subpacks'
    /// units, recursively. A visited set guards against subpack cycles in
    /// broken data.
    pub fn effective_units(&self, id: SctId) -> BTreeSet<SctId> {
        let mut units = BTreeSet::new();
        let mut visited = HashSet::new();
        self.collect_units(id, &mut units, &mut visited);
        units
    }

    fn collect_units(
        &self,
        id: SctId,
        units: &mut BTreeSet<SctId>,
        visited: &mut HashSet<SctId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let Some(concept) = self.concepts.get(&id) else {
            return;
        };
        if !concept.units.is_empty() {
            units.extend(concept.units.iter().copied());
        } else {
            for &subpack in &concept.subpacks {
                self.collect_units(subpack, units, visited);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        concepts: HashMap<SctId, Concept>,
        closure: ClosedGraph,
        refset_members: HashMap<ProductType, HashSet<SctId>>,
        ctpps: BTreeSet<SctId>,
    ) -> Self {
        Self {
            concepts,
            closure,
            refset_members,
            ctpps,
            replacements: BTreeSet::new(),
        }
    }
}

fn required<'a>(
    file: &'a Option<std::path::PathBuf>,
    file_type: &str,
) -> FlattenResult<&'a Path> {
    file.as_deref().ok_or_else(|| FlattenError::RequiredFileMissing {
        file_type: file_type.to_string(),
        directory: String::new(),
    })
}

/// Accumulates file rows into the cache structures before the graph is
/// closed.
#[derive(Default)]
struct CacheLoader {
    concepts: HashMap<SctId, Concept>,
    graph: ConceptGraph,
    preferred_descriptions: HashSet<SctId>,
    refset_members: HashMap<ProductType, HashSet<SctId>>,
    replacements: BTreeSet<Replacement>,
}

impl CacheLoader {
    fn read_concepts(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, ConceptRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| {
            self.handle_concept(row);
            Ok(())
        })?;
        info!(count, file = %path.display(), "read concept rows");
        Ok(())
    }

    fn read_relationships(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, RelationshipRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| {
            self.handle_relationship(row);
            Ok(())
        })?;
        info!(count, file = %path.display(), "read relationship rows");
        Ok(())
    }

    fn read_language_refset(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, LanguageRefsetRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| {
            self.handle_language_refset(row);
            Ok(())
        })?;
        info!(count, file = %path.display(), "read language refset rows");
        Ok(())
    }

    fn read_descriptions(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, DescriptionRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| {
            self.handle_description(row);
            Ok(())
        })?;
        info!(count, file = %path.display(), "read description rows");
        Ok(())
    }

    fn read_artg_refset(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, SimpleMapRefsetRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| self.handle_artg_refset(row))?;
        info!(count, file = %path.display(), "read ARTG id rows");
        Ok(())
    }

    fn read_product_refset(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, SimpleRefsetRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| {
            self.handle_product_refset(row);
            Ok(())
        })?;
        info!(count, file = %path.display(), "read product type rows");
        Ok(())
    }

    fn read_historical_refset(&mut self, path: &Path) -> FlattenResult<()> {
        let parser: Rf2FileParser<_, AssociationRefsetRow> = Rf2FileParser::from_path(path)?;
        let count = parser.for_each_row(|row| self.handle_historical_refset(row))?;
        info!(count, file = %path.display(), "read historical association rows");
        Ok(())
    }

    fn handle_concept(&mut self, row: ConceptRow) {
        if is_au_module(row.module_id)
            || is_amt_or_metadata_module(row.module_id)
            || is_international_module(row.module_id)
        {
            self.graph.add_vertex(row.id);
            self.concepts.insert(row.id, Concept::new(row.id, row.active));
        }
    }

    fn handle_relationship(&mut self, row: RelationshipRow) {
        if !row.active
            || !(is_amt_module(row.module_id)
                || is_au_module(row.module_id)
                || is_international_module(row.module_id))
        {
            return;
        }
        let Some(attribute) = row.attribute_type() else {
            return;
        };
        if !self.concepts.contains_key(&row.destination_id) {
            return;
        }
        let Some(source) = self.concepts.get_mut(&row.source_id) else {
            return;
        };
        match attribute {
            AttributeType::IsA => {
                source.parents.insert(row.destination_id);
                self.graph.add_edge(row.source_id, row.destination_id);
            }
            AttributeType::HasMpuu
            | AttributeType::HasTpuu
            | AttributeType::ContainsClinicalDrug => {
                source.units.insert(row.destination_id);
            }
            AttributeType::ContainsPackagedClinicalDrug => {
                source.subpacks.insert(row.destination_id);
            }
            AttributeType::HasTp | AttributeType::HasProductName => {
                source.tps.insert(row.destination_id);
            }
            _ => {}
        }
    }

    fn handle_language_refset(&mut self, row: LanguageRefsetRow) {
        if row.active
            && (is_amt_or_metadata_module(row.module_id) || is_au_module(row.module_id))
            && row.is_preferred()
        {
            self.preferred_descriptions.insert(row.referenced_component_id);
        }
    }

    fn handle_description(&mut self, row: DescriptionRow) {
        if !row.active
            || !(is_amt_or_metadata_module(row.module_id)
                || is_international_module(row.module_id)
                || is_au_module(row.module_id))
        {
            return;
        }
        let Some(concept) = self.concepts.get_mut(&row.concept_id) else {
            return;
        };
        if row.is_fsn() {
            concept.fsn = row.term;
        } else if self.preferred_descriptions.contains(&row.id) {
            concept.preferred_term = row.term;
        }
    }

    fn handle_artg_refset(&mut self, row: SimpleMapRefsetRow) -> FlattenResult<()> {
        if !row.active || !is_amt_module(row.module_id) {
            return Ok(());
        }
        let Some(concept) = self.concepts.get_mut(&row.referenced_component_id) else {
            return Err(FlattenError::MissingReference {
                concept: row.referenced_component_id,
                detail: format!("ARTG id member {} targets unknown concept", row.id),
            });
        };
        concept.artg_ids.insert(row.map_target.trim().to_string());
        Ok(())
    }

    fn handle_product_refset(&mut self, row: SimpleRefsetRow) {
        if !row.active || !is_amt_module(row.module_id) {
            return;
        }
        let Some(product_type) = ProductType::from_refset_id(row.refset_id) else {
            return;
        };
        self.refset_members
            .entry(product_type)
            .or_default()
            .insert(row.referenced_component_id);
    }

    fn handle_historical_refset(&mut self, row: AssociationRefsetRow) -> FlattenResult<()> {
        if !row.active
            || !is_amt_module(row.module_id)
            || !row.refers_to_concept()
            || !row.is_historical_association()
        {
            return Ok(());
        }

        for concept in [row.refset_id, row.referenced_component_id, row.target_component_id] {
            if !self.concepts.contains_key(&concept) {
                return Err(FlattenError::MissingReference {
                    concept,
                    detail: format!(
                        "historical association {} ({} -> {})",
                        row.id, row.referenced_component_id, row.target_component_id
                    ),
                });
            }
        }

        self.replacements.insert(Replacement {
            inactive_id: row.referenced_component_id,
            type_id: row.refset_id,
            active_id: row.target_component_id,
            effective_time: row.effective_time,
        });
        Ok(())
    }

    /// Closes the graph and extracts the CTPP working set.
    fn finish(
        self,
        config: &FlattenConfig,
        report: &mut ValidationReport,
    ) -> FlattenResult<AmtCache> {
        info!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            "closing is-a hierarchy"
        );
        let closure = self.graph.close(config.strict, report)?;

        let mut ctpps: BTreeSet<SctId> = closure
            .descendants_of(ProductType::Ctpp.root_concept_id())
            .into_iter()
            .filter(|&id| !ProductType::is_root_concept(id))
            .collect();

        let inactive: Vec<SctId> = ctpps
            .iter()
            .copied()
            .filter(|id| self.concepts.get(id).map_or(true, |c| !c.active))
            .collect();
        for id in inactive {
            warn!(ctpp = id, "found inactive CTPP");
            report.add_failure(
                INACTIVE_CTPP_CASE,
                "Inactive CTPP found",
                format!("{} |{}|", id, self.concepts.get(&id).map_or("", |c| &c.preferred_term)),
            );
            if config.strict {
                return Err(FlattenError::Invariant {
                    check: INACTIVE_CTPP_CASE.to_string(),
                    concepts: vec![id],
                });
            }
            ctpps.remove(&id);
        }

        Ok(AmtCache {
            concepts: self.concepts,
            closure,
            refset_members: self.refset_members,
            ctpps,
            replacements: self.replacements,
        })
    }
}

fn is_amt_module(module_id: SctId) -> bool {
    module_id == well_known::AMT_MODULE
}

fn is_au_module(module_id: SctId) -> bool {
    module_id == well_known::AU_MODULE
}

fn is_international_module(module_id: SctId) -> bool {
    module_id == well_known::INTERNATIONAL_MODULE
}

fn is_amt_or_metadata_module(module_id: SctId) -> bool {
    module_id == well_known::AMT_MODULE
        || module_id == well_known::INTERNATIONAL_METADATA_MODULE
        || module_id == well_known::AU_METADATA_MODULE
}
