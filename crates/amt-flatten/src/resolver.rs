//! Leaf-ancestor resolution over the closed hierarchy.
//!
//! Answers "which concepts of type T immediately dominate this concept":
//! every ancestor that is a member of T's marker refset, minus enumeration
//! roots, minus members of the origin's own type, minus any candidate that
//! is itself an ancestor of another candidate.

use std::collections::BTreeSet;

use amt_types::{ProductType, SctId};

use crate::cache::AmtCache;
use crate::report::ValidationReport;
use crate::types::{FlattenError, FlattenResult};

/// Report case name for unique-ancestor queries that did not return exactly
/// one result.
pub const MULTIPLE_PARENTS_CASE: &str = "multiple parents";

/// Resolves minimal typed ancestors against a loaded cache.
pub struct AncestorResolver<'a> {
    cache: &'a AmtCache,
    strict: bool,
}

impl<'a> AncestorResolver<'a> {
    /// Creates a resolver over `cache`.
    pub fn new(cache: &'a AmtCache, strict: bool) -> Self {
        Self { cache, strict }
    }

    /// The minimal ancestors of `origin` that are members of `target`.
    ///
    /// The result is idempotent over the closed graph: every returned
    /// concept is a `target` member and no returned concept is an ancestor
    /// of another.
    pub fn leaf_ancestors(
        &self,
        origin: SctId,
        origin_type: ProductType,
        target: ProductType,
    ) -> BTreeSet<SctId> {
        let closure = self.cache.closure();

        let mut candidates: BTreeSet<SctId> = closure
            .ancestors(origin)
            .iter()
            .copied()
            .filter(|&a| self.cache.is_member(target, a))
            .filter(|&a| !ProductType::is_root_concept(a))
            .filter(|&a| !self.cache.is_member(origin_type, a))
            .collect();

        let redundant: BTreeSet<SctId> = candidates
            .iter()
            .flat_map(|&c| closure.ancestors(c).iter().copied())
            .collect();
        candidates.retain(|c| !redundant.contains(c));

        candidates
    }

    /// The single minimal `target` ancestor of `origin`.
    ///
    /// Zero or multiple candidates is recorded in the report; the lenient
    /// caller gets `None` and skips whatever depended on the result.
    ///
    /// # Errors
    /// Returns [`FlattenError::Ambiguity`] when strict and the candidate
    /// count is not one.
    pub fn unique_leaf_ancestor(
        &self,
        origin: SctId,
        origin_type: ProductType,
        target: ProductType,
        report: &mut ValidationReport,
    ) -> FlattenResult<Option<SctId>> {
        let candidates = self.leaf_ancestors(origin, origin_type, target);

        if candidates.len() == 1 {
            return Ok(candidates.first().copied());
        }

        let candidate_list: Vec<SctId> = candidates.iter().copied().collect();
        report.add_failure(
            MULTIPLE_PARENTS_CASE,
            &format!("Expected 1 {target} ancestor for concept {origin}"),
            format!(
                "{} |{}| -> {:?}",
                origin,
                self.cache.preferred_term(origin),
                candidate_list
            ),
        );

        if self.strict {
            return Err(FlattenError::Ambiguity {
                origin,
                target,
                candidates: candidate_list,
            });
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use crate::cache::Concept;
    use crate::graph::ConceptGraph;

    /// A small branded-pack slice: 100 (CTPP) -> 200 (TPP) -> 300 (MPP),
    /// with 250 an extra TPP above 200 and 310 an MPP above 300.
    fn test_cache() -> AmtCache {
        let ids = [100u64, 200, 250, 300, 310];
        let edges = [(100u64, 200u64), (200, 250), (200, 300), (300, 310)];

        let mut graph = ConceptGraph::new();
        for &id in &ids {
            graph.add_vertex(id);
        }
        for &(child, parent) in &edges {
            graph.add_edge(child, parent);
        }
        let mut report = ValidationReport::new();
        let closure = graph.close(true, &mut report).unwrap();

        let concepts: HashMap<SctId, Concept> = ids
            .iter()
            .map(|&id| {
                (
                    id,
                    Concept {
                        id,
                        active: true,
                        preferred_term: format!("concept {id}"),
                        ..Concept::default()
                    },
                )
            })
            .collect();

        let mut members: HashMap<ProductType, HashSet<SctId>> = HashMap::new();
        members.insert(ProductType::Ctpp, HashSet::from([100]));
        members.insert(ProductType::Tpp, HashSet::from([200, 250]));
        members.insert(ProductType::Mpp, HashSet::from([300, 310]));

        AmtCache::from_parts(concepts, closure, members, BTreeSet::from([100]))
    }

    #[test]
    fn test_redundant_higher_ancestor_removed() {
        let cache = test_cache();
        let resolver = AncestorResolver::new(&cache, true);

        // Both 200 and 250 are TPP members, but 250 is an ancestor of 200
        // so only the minimal one survives.
        let result = resolver.leaf_ancestors(100, ProductType::Ctpp, ProductType::Tpp);
        assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![200]);
    }

    #[test]
    fn test_origin_type_members_excluded() {
        let mut cache = test_cache();
        // Mark 200 as also being a CTPP member; it must then be excluded
        // from CTPP-origin queries.
        cache
            .refset_members
            .get_mut(&ProductType::Ctpp)
            .unwrap()
            .insert(200);

        let resolver = AncestorResolver::new(&cache, false);
        let result = resolver.leaf_ancestors(100, ProductType::Ctpp, ProductType::Tpp);
        // 200 excluded, leaving 250 as the minimal remaining TPP.
        assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![250]);
    }

    #[test]
    fn test_unique_resolution() {
        let cache = test_cache();
        let resolver = AncestorResolver::new(&cache, true);
        let mut report = ValidationReport::new();

        let mpp = resolver
            .unique_leaf_ancestor(200, ProductType::Tpp, ProductType::Mpp, &mut report)
            .unwrap();
        assert_eq!(mpp, Some(300));
        assert!(report.is_empty());
    }

    #[test]
    fn test_zero_candidates_lenient_returns_none() {
        let cache = test_cache();
        let resolver = AncestorResolver::new(&cache, false);
        let mut report = ValidationReport::new();

        let result = resolver
            .unique_leaf_ancestor(310, ProductType::Mpp, ProductType::Tpp, &mut report)
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(report.case(MULTIPLE_PARENTS_CASE).unwrap().failures.len(), 1);
    }

    #[test]
    fn test_multiple_candidates_strict_aborts() {
        let mut cache = test_cache();
        // Break the chain so 250 is no longer redundant: hang it off 100
        // directly instead of above 200.
        cache.closure = {
            let mut graph = ConceptGraph::new();
            for id in [100u64, 200, 250, 300, 310] {
                graph.add_vertex(id);
            }
            for (child, parent) in [(100u64, 200u64), (100, 250), (200, 300), (300, 310)] {
                graph.add_edge(child, parent);
            }
            let mut report = ValidationReport::new();
            graph.close(true, &mut report).unwrap()
        };

        let resolver = AncestorResolver::new(&cache, true);
        let mut report = ValidationReport::new();

        let err = resolver
            .unique_leaf_ancestor(100, ProductType::Ctpp, ProductType::Tpp, &mut report)
            .unwrap_err();
        match err {
            FlattenError::Ambiguity {
                origin, candidates, ..
            } => {
                assert_eq!(origin, 100);
                assert_eq!(candidates, vec![200, 250]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // recorded before aborting
        assert!(!report.is_empty());
    }
}
