//! Flat row assembly.
//!
//! Walks every dispensed pack and resolves the full hierarchy slice for
//! each of its branded units, emitting one row per (generic ingredient,
//! regulatory id) pair.

use std::collections::BTreeSet;

use amt_types::{ProductType, SctId};
use tracing::{error, info, warn};

use crate::cache::AmtCache;
use crate::report::ValidationReport;
use crate::resolver::AncestorResolver;
use crate::types::{BrandPolicy, FlattenConfig, FlattenError, FlattenResult};

/// Report case name for branded packs without a single brand concept.
pub const TPP_ERROR_CASE: &str = "TPP error";
/// Report case name for branded units without a resolvable brand concept.
pub const TPUU_ERROR_CASE: &str = "TPUU error";
/// Report case name for declared-vs-derived generic unit mismatches.
pub const MISMATCH_CASE: &str = "Mismatch";

/// One denormalized output row: a full slice of the pack hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    /// Dispensed pack id.
    pub ctpp_id: SctId,
    /// Dispensed pack preferred term.
    pub ctpp_pt: String,
    /// Regulatory id, possibly empty.
    pub artg_id: String,
    /// Branded pack id.
    pub tpp_id: SctId,
    /// Branded pack preferred term.
    pub tpp_pt: String,
    /// Branded unit id.
    pub tpuu_id: SctId,
    /// Branded unit preferred term.
    pub tpuu_pt: String,
    /// Branded pack's brand id.
    pub tpp_tp_id: SctId,
    /// Branded pack's brand preferred term.
    pub tpp_tp_pt: String,
    /// Branded unit's brand id.
    pub tpuu_tp_id: SctId,
    /// Branded unit's brand preferred term.
    pub tpuu_tp_pt: String,
    /// Generic pack id.
    pub mpp_id: SctId,
    /// Generic pack preferred term.
    pub mpp_pt: String,
    /// Generic unit id.
    pub mpuu_id: SctId,
    /// Generic unit preferred term.
    pub mpuu_pt: String,
    /// Generic ingredient id.
    pub mp_id: SctId,
    /// Generic ingredient preferred term.
    pub mp_pt: String,
}

/// Assembles flat rows from a loaded cache.
pub struct FlatRowAssembler<'a> {
    cache: &'a AmtCache,
    config: &'a FlattenConfig,
}

impl<'a> FlatRowAssembler<'a> {
    /// Creates an assembler over `cache`.
    pub fn new(cache: &'a AmtCache, config: &'a FlattenConfig) -> Self {
        Self { cache, config }
    }

    /// Assembles rows for every dispensed pack, in pack id order.
    ///
    /// In lenient mode a pack whose branded-pack, brand or generic-pack
    /// level cannot be resolved emits no rows; a unit whose levels cannot
    /// be resolved is skipped without affecting the pack's other units.
    ///
    /// # Errors
    /// Returns the first recorded problem as an error when strict.
    pub fn assemble(&self, report: &mut ValidationReport) -> FlattenResult<Vec<FlatRow>> {
        let resolver = AncestorResolver::new(self.cache, self.config.strict);
        let mut rows = Vec::new();
        let total = self.cache.ctpps().count();

        for (index, ctpp) in self.cache.ctpps().enumerate() {
            self.assemble_pack(ctpp, &resolver, report, &mut rows)?;
            if (index + 1) % 10_000 == 0 {
                info!(processed = index + 1, total, "assembling flat rows");
            }
        }

        info!(rows = rows.len(), packs = total, "assembled flat rows");
        Ok(rows)
    }

    fn assemble_pack(
        &self,
        ctpp: SctId,
        resolver: &AncestorResolver<'_>,
        report: &mut ValidationReport,
        rows: &mut Vec<FlatRow>,
    ) -> FlattenResult<()> {
        let tpp = if self.cache.is_member(ProductType::Tpp, ctpp) {
            ctpp
        } else {
            match resolver.unique_leaf_ancestor(
                ctpp,
                ProductType::Ctpp,
                ProductType::Tpp,
                report,
            )? {
                Some(tpp) => tpp,
                None => {
                    warn!(ctpp, "no TPP resolved, skipping pack");
                    return Ok(());
                }
            }
        };

        let Some(tpp_tp) = self.resolve_pack_brand(tpp, report)? else {
            return Ok(());
        };

        let mpp = match resolver.unique_leaf_ancestor(
            tpp,
            ProductType::Tpp,
            ProductType::Mpp,
            report,
        )? {
            Some(mpp) => mpp,
            None => {
                error!(tpp, "no MPP found for TPP, skipping pack");
                return Ok(());
            }
        };

        let artg_ids = self.artg_ids(ctpp);
        let mut derived_mpuus = BTreeSet::new();

        for tpuu in self.cache.effective_units(tpp) {
            let Some(tpuu_tp) = self.resolve_unit_brand(tpuu, resolver, report)? else {
                continue;
            };
            let Some(mpuu) = resolver.unique_leaf_ancestor(
                tpuu,
                ProductType::Tpuu,
                ProductType::Mpuu,
                report,
            )?
            else {
                continue;
            };
            derived_mpuus.insert(mpuu);

            for mp in resolver.leaf_ancestors(mpuu, ProductType::Mpuu, ProductType::Mp) {
                for artg_id in &artg_ids {
                    rows.push(self.row(ctpp, artg_id, tpp, tpuu, tpp_tp, tpuu_tp, mpp, mpuu, mp));
                }
            }
        }

        self.check_declared_units(mpp, &derived_mpuus, report);
        Ok(())
    }

    /// A branded pack must have exactly one direct brand edge.
    fn resolve_pack_brand(
        &self,
        tpp: SctId,
        report: &mut ValidationReport,
    ) -> FlattenResult<Option<SctId>> {
        let tps = self
            .cache
            .concept(tpp)
            .map(|c| c.tps.clone())
            .unwrap_or_default();

        if tps.len() == 1 {
            return Ok(tps.first().copied());
        }

        let candidates: Vec<SctId> = tps.iter().copied().collect();
        error!(tpp, ?candidates, "TPP does not have exactly one TP");
        report.add_failure(
            TPP_ERROR_CASE,
            &format!("TPP has too many TPs ({tpp})"),
            format!(
                "{} |{}| -> {:?}",
                tpp,
                self.cache.preferred_term(tpp),
                candidates
            ),
        );
        if self.config.strict {
            return Err(FlattenError::Ambiguity {
                origin: tpp,
                target: ProductType::Tp,
                candidates,
            });
        }
        Ok(None)
    }

    /// Resolves a branded unit's brand concept per the configured policy.
    fn resolve_unit_brand(
        &self,
        tpuu: SctId,
        resolver: &AncestorResolver<'_>,
        report: &mut ValidationReport,
    ) -> FlattenResult<Option<SctId>> {
        let tps = self
            .cache
            .concept(tpuu)
            .map(|c| c.tps.clone())
            .unwrap_or_default();

        match tps.len() {
            1 => Ok(tps.first().copied()),
            n if n > 1 => {
                let candidates: Vec<SctId> = tps.iter().copied().collect();
                error!(tpuu, ?candidates, "TPUU has too many TPs");
                report.add_failure(
                    TPUU_ERROR_CASE,
                    &format!("TPUU has too many TPs ({tpuu})"),
                    format!(
                        "{} |{}| -> {:?}",
                        tpuu,
                        self.cache.preferred_term(tpuu),
                        candidates
                    ),
                );
                if self.config.strict {
                    return Err(FlattenError::Ambiguity {
                        origin: tpuu,
                        target: ProductType::Tp,
                        candidates,
                    });
                }
                Ok(None)
            }
            _ => match self.config.tpuu_brand {
                BrandPolicy::AncestorFallback => resolver.unique_leaf_ancestor(
                    tpuu,
                    ProductType::Tpuu,
                    ProductType::Tp,
                    report,
                ),
                BrandPolicy::DirectEdge => {
                    error!(tpuu, "TPUU has no TPs");
                    report.add_failure(
                        TPUU_ERROR_CASE,
                        &format!("TPUU has no TPs ({tpuu})"),
                        format!("{} |{}|", tpuu, self.cache.preferred_term(tpuu)),
                    );
                    if self.config.strict {
                        return Err(FlattenError::Ambiguity {
                            origin: tpuu,
                            target: ProductType::Tp,
                            candidates: Vec::new(),
                        });
                    }
                    Ok(None)
                }
            },
        }
    }

    /// Regulatory ids of the pack, defaulting to one empty id so every
    /// resolvable pack emits at least one row per ingredient.
    fn artg_ids(&self, ctpp: SctId) -> Vec<String> {
        let ids: Vec<String> = self
            .cache
            .concept(ctpp)
            .map(|c| c.artg_ids.iter().cloned().collect())
            .unwrap_or_default();
        if ids.is_empty() {
            vec![String::new()]
        } else {
            ids
        }
    }

    /// Cross-checks the generic pack's declared units against the units
    /// derived through its branded chain. Differences are recorded but
    /// never fatal; the rows already emitted stand.
    fn check_declared_units(
        &self,
        mpp: SctId,
        derived: &BTreeSet<SctId>,
        report: &mut ValidationReport,
    ) {
        let declared = self.cache.effective_units(mpp);
        if declared == *derived {
            return;
        }

        let missing: Vec<SctId> = declared.difference(derived).copied().collect();
        let extra: Vec<SctId> = derived.difference(&declared).copied().collect();
        warn!(mpp, ?missing, ?extra, "MPP units differ from units derived via TPUUs");
        report.add_failure(
            MISMATCH_CASE,
            &format!("MPP mismatch ({mpp})"),
            format!(
                "MPP {} |{}| declared units missing from derived set {:?}, derived units not declared {:?}",
                mpp,
                self.cache.preferred_term(mpp),
                missing,
                extra
            ),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn row(
        &self,
        ctpp: SctId,
        artg_id: &str,
        tpp: SctId,
        tpuu: SctId,
        tpp_tp: SctId,
        tpuu_tp: SctId,
        mpp: SctId,
        mpuu: SctId,
        mp: SctId,
    ) -> FlatRow {
        let pt = |id: SctId| self.cache.preferred_term(id).to_string();
        FlatRow {
            ctpp_id: ctpp,
            ctpp_pt: pt(ctpp),
            artg_id: artg_id.to_string(),
            tpp_id: tpp,
            tpp_pt: pt(tpp),
            tpuu_id: tpuu,
            tpuu_pt: pt(tpuu),
            tpp_tp_id: tpp_tp,
            tpp_tp_pt: pt(tpp_tp),
            tpuu_tp_id: tpuu_tp,
            tpuu_tp_pt: pt(tpuu_tp),
            mpp_id: mpp,
            mpp_pt: pt(mpp),
            mpuu_id: mpuu,
            mpuu_pt: pt(mpuu),
            mp_id: mp,
            mp_pt: pt(mp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap, HashSet};

    use crate::cache::Concept;
    use crate::graph::ConceptGraph;
    use crate::resolver::MULTIPLE_PARENTS_CASE;

    struct Fixture {
        concepts: HashMap<SctId, Concept>,
        edges: Vec<(SctId, SctId)>,
        members: HashMap<ProductType, HashSet<SctId>>,
        ctpps: BTreeSet<SctId>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                concepts: HashMap::new(),
                edges: Vec::new(),
                members: HashMap::new(),
                ctpps: BTreeSet::new(),
            }
        }

        fn concept(&mut self, id: SctId) -> &mut Concept {
            self.concepts.entry(id).or_insert_with(|| Concept {
                id,
                active: true,
                preferred_term: format!("concept {id}"),
                fsn: format!("concept {id} (type)"),
                ..Concept::default()
            })
        }

        fn is_a(&mut self, child: SctId, parent: SctId) {
            self.concept(child).parents.insert(parent);
            self.concept(parent);
            self.edges.push((child, parent));
        }

        fn member(&mut self, product_type: ProductType, id: SctId) {
            self.concept(id);
            self.members.entry(product_type).or_default().insert(id);
            if product_type == ProductType::Ctpp {
                self.ctpps.insert(id);
            }
        }

        fn build(self) -> AmtCache {
            let mut graph = ConceptGraph::new();
            for &id in self.concepts.keys() {
                graph.add_vertex(id);
            }
            for (child, parent) in self.edges {
                graph.add_edge(child, parent);
            }
            let mut report = ValidationReport::new();
            let closure = graph.close(true, &mut report).unwrap();
            AmtCache::from_parts(self.concepts, closure, self.members, self.ctpps)
        }
    }

    /// The happy-path slice: CTPP 100 -> TPP 200 -> MPP 300, TPP has unit
    /// TPUU 201, MPUU 301 above it, MP 401 above that, brand TP 1 on both
    /// branded levels, ARTG id on the CTPP.
    fn happy_fixture() -> Fixture {
        let mut f = Fixture::new();
        f.member(ProductType::Ctpp, 100);
        f.member(ProductType::Tpp, 200);
        f.member(ProductType::Tpuu, 201);
        f.member(ProductType::Tp, 1);
        f.member(ProductType::Mpp, 300);
        f.member(ProductType::Mpuu, 301);
        f.member(ProductType::Mp, 401);
        f.is_a(100, 200);
        f.is_a(200, 300);
        f.is_a(201, 301);
        f.is_a(301, 401);
        f.concept(200).units.insert(201);
        f.concept(300).units.insert(301);
        f.concept(200).tps.insert(1);
        f.concept(201).tps.insert(1);
        f.concept(100).artg_ids.insert("AUST12345".to_string());
        f
    }

    fn assemble(cache: &AmtCache, config: &FlattenConfig) -> (Vec<FlatRow>, ValidationReport) {
        let mut report = ValidationReport::new();
        let rows = FlatRowAssembler::new(cache, config)
            .assemble(&mut report)
            .unwrap();
        (rows, report)
    }

    #[test]
    fn test_happy_path_single_row() {
        let cache = happy_fixture().build();
        let config = FlattenConfig {
            strict: true,
            ..FlattenConfig::default()
        };
        let (rows, report) = assemble(&cache, &config);

        assert!(report.is_empty());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.ctpp_id, 100);
        assert_eq!(row.artg_id, "AUST12345");
        assert_eq!(row.tpp_id, 200);
        assert_eq!(row.tpuu_id, 201);
        assert_eq!(row.tpp_tp_id, 1);
        assert_eq!(row.tpuu_tp_id, 1);
        assert_eq!(row.mpp_id, 300);
        assert_eq!(row.mpuu_id, 301);
        assert_eq!(row.mp_id, 401);
        assert_eq!(row.ctpp_pt, "concept 100");
    }

    #[test]
    fn test_cross_product_of_ingredients_and_artg_ids() {
        let mut f = happy_fixture();
        f.member(ProductType::Mp, 402);
        f.is_a(301, 402);
        f.concept(100).artg_ids.insert("AUST99999".to_string());
        let cache = f.build();
        let (rows, _) = assemble(&cache, &FlattenConfig::default());

        assert_eq!(rows.len(), 4);
        let pairs: BTreeSet<(SctId, String)> = rows
            .iter()
            .map(|r| (r.mp_id, r.artg_id.clone()))
            .collect();
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_pack_without_artg_ids_emits_empty_id() {
        let mut f = happy_fixture();
        f.concept(100).artg_ids.clear();
        let cache = f.build();
        let (rows, _) = assemble(&cache, &FlattenConfig::default());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].artg_id, "");
    }

    #[test]
    fn test_ctpp_that_is_its_own_tpp() {
        let mut f = happy_fixture();
        // Mark the CTPP as a TPP member as well; the branded pack level
        // then resolves to the CTPP itself.
        f.member(ProductType::Tpp, 100);
        f.concept(100).units.insert(201);
        f.concept(100).tps.insert(1);
        let cache = f.build();
        let (rows, _) = assemble(&cache, &FlattenConfig::default());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tpp_id, 100);
    }

    #[test]
    fn test_tpp_with_two_brands_skips_pack() {
        let mut f = happy_fixture();
        f.member(ProductType::Tp, 2);
        f.concept(200).tps.insert(2);
        let cache = f.build();

        let (rows, report) = assemble(&cache, &FlattenConfig::default());
        assert!(rows.is_empty());
        assert!(report.case(TPP_ERROR_CASE).is_some());

        let mut report = ValidationReport::new();
        let strict = FlattenConfig {
            strict: true,
            ..FlattenConfig::default()
        };
        assert!(FlatRowAssembler::new(&cache, &strict)
            .assemble(&mut report)
            .is_err());
    }

    #[test]
    fn test_tpuu_without_brand_direct_edge_policy() {
        let mut f = happy_fixture();
        f.concept(201).tps.clear();
        let cache = f.build();

        let (rows, report) = assemble(&cache, &FlattenConfig::default());
        assert!(rows.is_empty());
        let case = report.case(TPUU_ERROR_CASE).unwrap();
        assert!(case.failures[0].message.contains("201"));
    }

    #[test]
    fn test_tpuu_without_brand_ancestor_fallback_policy() {
        let mut f = happy_fixture();
        f.concept(201).tps.clear();
        // Brand reachable through the hierarchy instead of a direct edge.
        f.is_a(201, 1);
        let cache = f.build();

        let config = FlattenConfig {
            strict: false,
            tpuu_brand: BrandPolicy::AncestorFallback,
        };
        let (rows, report) = assemble(&cache, &config);
        assert!(report.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tpuu_tp_id, 1);
    }

    #[test]
    fn test_unresolvable_mpp_skips_pack_but_not_others() {
        let mut f = happy_fixture();
        // Second, well-formed pack alongside one whose TPP has no MPP.
        f.member(ProductType::Ctpp, 110);
        f.member(ProductType::Tpp, 210);
        f.is_a(110, 210);
        f.concept(210).tps.insert(1);
        let cache = f.build();

        let (rows, report) = assemble(&cache, &FlattenConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ctpp_id, 100);
        assert!(report.case(MULTIPLE_PARENTS_CASE).is_some());
    }

    #[test]
    fn test_declared_unit_mismatch_recorded_not_fatal() {
        let mut f = happy_fixture();
        // MPP declares an extra unit never reached via the branded chain.
        f.member(ProductType::Mpuu, 302);
        f.concept(300).units.insert(302);
        let cache = f.build();

        let (rows, report) = assemble(&cache, &FlattenConfig::default());
        assert_eq!(rows.len(), 1);
        let case = report.case(MISMATCH_CASE).unwrap();
        assert!(case.failures[0].detail.contains("[302]"));
    }

    #[test]
    fn test_mpuu_skip_leaves_other_units() {
        let mut f = happy_fixture();
        // Second unit with no MPUU above it.
        f.member(ProductType::Tpuu, 202);
        f.concept(200).units.insert(202);
        f.concept(202).tps.insert(1);
        let cache = f.build();

        let (rows, report) = assemble(&cache, &FlattenConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tpuu_id, 201);
        assert!(report.case(MULTIPLE_PARENTS_CASE).is_some());
        // 202 resolved nothing, so derived units still match the declared 301
        assert!(report.case(MISMATCH_CASE).is_none());
    }
}
