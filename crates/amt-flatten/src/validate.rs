//! Data-quality checks over the loaded cache.
//!
//! Each check pairs a predicate with a repair. In lenient mode offenders
//! are recorded in the report and repaired; in strict mode the first
//! non-empty check aborts the run after recording.

use std::collections::HashSet;

use amt_types::{ProductType, SctId};
use tracing::warn;

use crate::cache::{AmtCache, Concept};
use crate::report::ValidationReport;
use crate::types::{FlattenError, FlattenResult};

/// Report case name for pack/unit hierarchy inconsistencies.
pub const HIERARCHY_ERROR_CASE: &str = "hierarchy_error";

/// Runs the per-concept reference and naming checks.
///
/// # Errors
/// Returns [`FlattenError::Invariant`] for the first failed check when
/// strict.
pub(crate) fn validate_concepts(
    cache: &mut AmtCache,
    strict: bool,
    report: &mut ValidationReport,
) -> FlattenResult<()> {
    // Inactive concepts should not reference other things.
    check(
        cache,
        |c| !c.active && !c.parents.is_empty(),
        "Inactive concepts with parents",
        "Inactive_with_parents",
        strict,
        report,
        |c| c.parents.clear(),
    )?;
    check(
        cache,
        |c| !c.active && !c.tps.is_empty(),
        "Inactive concepts with TPs",
        "Inactive_with_TPs",
        strict,
        report,
        |c| c.tps.clear(),
    )?;
    check(
        cache,
        |c| !c.active && !c.units.is_empty(),
        "Inactive concepts with Units",
        "Inactive_with_Units",
        strict,
        report,
        |c| c.units.clear(),
    )?;
    check(
        cache,
        |c| !c.active && !c.artg_ids.is_empty(),
        "Inactive concepts with ARTGIDs",
        "Inactive_with_ARTGIDs",
        strict,
        report,
        |c| c.artg_ids.clear(),
    )?;

    // Every concept should carry both names.
    check(
        cache,
        |c| c.fsn.is_empty(),
        "Concepts with null or empty FSN",
        "Null_or_empty_FSN",
        strict,
        report,
        |c| c.fsn = format!("Concept {} has no FSN!!!", c.id),
    )?;
    check(
        cache,
        |c| c.preferred_term.is_empty(),
        "Concepts with null or empty PT",
        "Null_or_empty_PT",
        strict,
        report,
        |c| c.preferred_term = format!("Concept {} has no Preferred Term!!!", c.id),
    )?;

    // Active concepts should only reference active things. The inactive id
    // set is snapshotted first; the repairs below must not shift it.
    let inactive: HashSet<SctId> = cache
        .concepts
        .values()
        .filter(|c| !c.active)
        .map(|c| c.id)
        .collect();

    check(
        cache,
        |c| c.active && c.units.iter().any(|u| inactive.contains(u)),
        "Active concept with inactive linked unit/s",
        "Active_concept_inactive_units",
        strict,
        report,
        |c| c.units.retain(|u| !inactive.contains(u)),
    )?;
    check(
        cache,
        |c| c.active && c.tps.iter().any(|t| inactive.contains(t)),
        "Active concept with inactive linked TP/s",
        "Active_concept_inactive_TP",
        strict,
        report,
        |c| c.tps.retain(|t| !inactive.contains(t)),
    )?;
    check(
        cache,
        |c| c.active && c.parents.iter().any(|p| inactive.contains(p)),
        "Active concept with inactive linked parent/s",
        "Active_concept_inactive_parents",
        strict,
        report,
        |c| c.parents.retain(|p| !inactive.contains(p)),
    )?;

    Ok(())
}

fn check<P, F>(
    cache: &mut AmtCache,
    predicate: P,
    message: &str,
    case_name: &str,
    strict: bool,
    report: &mut ValidationReport,
    fix: F,
) -> FlattenResult<()>
where
    P: Fn(&Concept) -> bool,
    F: Fn(&mut Concept),
{
    let mut offenders: Vec<SctId> = cache
        .concepts
        .values()
        .filter(|c| predicate(c))
        .map(|c| c.id)
        .collect();
    offenders.sort_unstable();

    if offenders.is_empty() {
        return Ok(());
    }

    warn!(check = case_name, ?offenders, "{message}");
    report.add_failure(
        case_name,
        message,
        offenders
            .iter()
            .map(|id| format!("{} |{}|", id, cache.preferred_term(*id)))
            .collect::<Vec<_>>()
            .join(", "),
    );

    if strict {
        return Err(FlattenError::Invariant {
            check: case_name.to_string(),
            concepts: offenders,
        });
    }

    warn!("repair applied for erroneous input data, results may be unreliable");
    for id in &offenders {
        if let Some(concept) = cache.concepts.get_mut(id) {
            fix(concept);
        }
    }

    Ok(())
}

/// Checks the pack/unit structure of the hierarchy.
///
/// Flags pack concepts with no units at all, generic packs carrying
/// branded units and branded packs carrying generic units. These cannot be
/// repaired, so in lenient mode they are recorded and the run proceeds.
///
/// # Errors
/// Returns [`FlattenError::Invariant`] when strict and any pack is flagged.
pub(crate) fn validate_structure(
    cache: &AmtCache,
    strict: bool,
    report: &mut ValidationReport,
) -> FlattenResult<()> {
    let closure = cache.closure();
    let tpp_root = ProductType::Tpp.root_concept_id();
    let tpuu_root = ProductType::Tpuu.root_concept_id();

    let pack_ids: Vec<SctId> = closure
        .descendants_of(ProductType::Mpp.root_concept_id())
        .into_iter()
        .filter(|&id| !ProductType::is_root_concept(id))
        .collect();

    let mut packs_without_units = Vec::new();
    let mut mpps_with_branded_units = Vec::new();
    let mut tpps_with_generic_units = Vec::new();

    for &id in &pack_ids {
        let units = cache.effective_units(id);
        if units.is_empty() {
            packs_without_units.push(id);
            continue;
        }

        let is_branded_pack = closure.is_ancestor_of(tpp_root, id);
        if !is_branded_pack && units.iter().any(|&u| closure.is_ancestor_of(tpuu_root, u)) {
            mpps_with_branded_units.push(id);
        }
        if is_branded_pack && units.iter().any(|&u| !closure.is_ancestor_of(tpuu_root, u)) {
            tpps_with_generic_units.push(id);
        }
    }

    if packs_without_units.is_empty()
        && mpps_with_branded_units.is_empty()
        && tpps_with_generic_units.is_empty()
    {
        return Ok(());
    }

    let describe = |ids: &[SctId]| {
        ids.iter()
            .map(|&id| format!("{} |{}|", id, cache.preferred_term(id)))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let detail = format!(
        "pack concepts with no units [{}], MPPs with TPUU units [{}], TPP/CTPPs with MPUU units [{}]",
        describe(&packs_without_units),
        describe(&mpps_with_branded_units),
        describe(&tpps_with_generic_units),
    );
    warn!(%detail, "pack/unit hierarchy inconsistencies detected");
    report.add_failure(
        HIERARCHY_ERROR_CASE,
        "Detected pack concepts with no units and/or MPPs with TPUU units and/or TPP/CTPPs with MPUU units",
        detail,
    );

    if strict {
        let mut concepts = packs_without_units;
        concepts.extend(mpps_with_branded_units);
        concepts.extend(tpps_with_generic_units);
        concepts.sort_unstable();
        return Err(FlattenError::Invariant {
            check: HIERARCHY_ERROR_CASE.to_string(),
            concepts,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    use crate::graph::ConceptGraph;

    fn concept(id: SctId, active: bool) -> Concept {
        Concept {
            id,
            active,
            fsn: format!("concept {id} (thing)"),
            preferred_term: format!("concept {id}"),
            ..Concept::default()
        }
    }

    fn cache_with(concepts: Vec<Concept>, edges: &[(SctId, SctId)]) -> AmtCache {
        let mut graph = ConceptGraph::new();
        for c in &concepts {
            graph.add_vertex(c.id);
        }
        for &(child, parent) in edges {
            graph.add_edge(child, parent);
        }
        let mut report = ValidationReport::new();
        let closure = graph.close(false, &mut report).unwrap();

        let map: HashMap<SctId, Concept> = concepts.into_iter().map(|c| (c.id, c)).collect();
        AmtCache::from_parts(map, closure, HashMap::new(), BTreeSet::new())
    }

    #[test]
    fn test_inactive_concept_references_repaired() {
        let mut inactive = concept(1, false);
        inactive.parents.insert(2);
        inactive.artg_ids.insert("123".to_string());
        let mut cache = cache_with(vec![inactive, concept(2, true)], &[]);

        let mut report = ValidationReport::new();
        validate_concepts(&mut cache, false, &mut report).unwrap();

        let repaired = cache.concept(1).unwrap();
        assert!(repaired.parents.is_empty());
        assert!(repaired.artg_ids.is_empty());
        assert!(report.case("Inactive_with_parents").is_some());
        assert!(report.case("Inactive_with_ARTGIDs").is_some());
    }

    #[test]
    fn test_inactive_references_strict_aborts() {
        let mut inactive = concept(1, false);
        inactive.parents.insert(2);
        let mut cache = cache_with(vec![inactive, concept(2, true)], &[]);

        let mut report = ValidationReport::new();
        let err = validate_concepts(&mut cache, true, &mut report).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::Invariant { ref check, .. } if check == "Inactive_with_parents"
        ));
        // recorded before aborting
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn test_missing_names_get_placeholders() {
        let mut nameless = concept(1, true);
        nameless.fsn.clear();
        nameless.preferred_term.clear();
        let mut cache = cache_with(vec![nameless], &[]);

        let mut report = ValidationReport::new();
        validate_concepts(&mut cache, false, &mut report).unwrap();

        let repaired = cache.concept(1).unwrap();
        assert_eq!(repaired.fsn, "Concept 1 has no FSN!!!");
        assert_eq!(repaired.preferred_term, "Concept 1 has no Preferred Term!!!");
    }

    #[test]
    fn test_active_concept_inactive_unit_removed() {
        let mut pack = concept(1, true);
        pack.units.insert(10);
        pack.units.insert(11);
        let mut cache = cache_with(vec![pack, concept(10, false), concept(11, true)], &[]);

        let mut report = ValidationReport::new();
        validate_concepts(&mut cache, false, &mut report).unwrap();

        assert_eq!(
            cache.concept(1).unwrap().units.iter().copied().collect::<Vec<_>>(),
            vec![11]
        );
    }

    #[test]
    fn test_clean_cache_passes() {
        let mut cache = cache_with(vec![concept(1, true)], &[]);
        let mut report = ValidationReport::new();
        validate_concepts(&mut cache, true, &mut report).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_structure_flags_generic_pack_with_branded_unit() {
        let mpp_root = ProductType::Mpp.root_concept_id();
        let tpuu_root = ProductType::Tpuu.root_concept_id();

        let mut pack = concept(1, true);
        pack.units.insert(10);
        let cache = cache_with(
            vec![
                pack,
                concept(10, true),
                concept(mpp_root, true),
                concept(tpuu_root, true),
            ],
            &[(1, mpp_root), (10, tpuu_root)],
        );

        let mut report = ValidationReport::new();
        validate_structure(&cache, false, &mut report).unwrap();
        assert!(report.case(HIERARCHY_ERROR_CASE).is_some());

        let mut report = ValidationReport::new();
        assert!(validate_structure(&cache, true, &mut report).is_err());
    }

    #[test]
    fn test_structure_flags_pack_without_units() {
        let mpp_root = ProductType::Mpp.root_concept_id();
        let cache = cache_with(
            vec![concept(1, true), concept(mpp_root, true)],
            &[(1, mpp_root)],
        );

        let mut report = ValidationReport::new();
        validate_structure(&cache, false, &mut report).unwrap();
        let case = report.case(HIERARCHY_ERROR_CASE).unwrap();
        assert!(case.failures[0].detail.contains("1 |concept 1|"));
    }
}
