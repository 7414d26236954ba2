//! Resolution scenarios
//!
//! These tests run candidate sets through the whole resolver (fast path,
//! incremental search, verification and diagnostics) and check the
//! invariants every result must hold.

use std::sync::Arc;

use indexmap::IndexMap;

use super::*;
use crate::error::ResolverError;
use crate::package::{Candidate, CandidateSet, Link, LinkKind, Origin, PackageMetadata};

/// Helper to create mod metadata
fn pkg(id: &str, version: &str) -> PackageMetadata {
    PackageMetadata::new(id, version)
}

fn link(source: &str, target: &str, constraint: &str, kind: LinkKind) -> Link {
    Link::parse(source, target, &[constraint], kind).unwrap()
}

/// Helper to create a mod with hard requirements
fn pkg_with_depends(id: &str, version: &str, depends: Vec<(&str, &str)>) -> PackageMetadata {
    let mut metadata = pkg(id, version);
    for (target, constraint) in depends {
        metadata = metadata.with_link(link(id, target, constraint, LinkKind::Depends));
    }
    metadata
}

/// Helper to create a mod with hard exclusions
fn pkg_with_breaks(id: &str, version: &str, breaks: Vec<(&str, &str)>) -> PackageMetadata {
    let mut metadata = pkg(id, version);
    for (target, constraint) in breaks {
        metadata = metadata.with_link(link(id, target, constraint, LinkKind::Breaks));
    }
    metadata
}

/// Candidate sets built from (metadata, depth) pairs; each gets its own origin
fn sets(mods: Vec<(PackageMetadata, u32)>) -> IndexMap<String, CandidateSet> {
    let mut sets: IndexMap<String, CandidateSet> = IndexMap::new();
    for (index, (metadata, depth)) in mods.into_iter().enumerate() {
        let origin = Origin::from_path(std::path::Path::new(&format!("/mods/{}-{}.jar", metadata.id, index)));
        let candidate = Arc::new(Candidate::new(metadata, origin, depth));
        sets.entry(candidate.id().to_string())
            .or_insert_with(|| CandidateSet::new(candidate.id()))
            .insert(candidate);
    }
    sets.sort_keys();
    sets
}

fn selected(result: &ResolutionResult) -> Vec<String> {
    result.candidates().map(|c| c.to_string()).collect()
}

fn failure(err: ResolverError) -> ResolutionFailure {
    match err {
        ResolverError::Resolution(failure) => failure,
        other => panic!("expected a resolution failure, got: {}", other),
    }
}

/// Invariants of every successful result
fn assert_invariants(sets: &IndexMap<String, CandidateSet>, result: &ResolutionResult) {
    let selection = result.selection();

    for (id, candidate) in selection {
        assert_eq!(id, candidate.id());
        for link in &candidate.metadata().depends {
            let target = selection.get(&link.target).expect("dependency selected");
            assert!(link.matches(target.metadata()), "{} unmet", link);
        }
        for link in &candidate.metadata().breaks {
            if let Some(target) = selection.get(&link.target) {
                assert!(!link.matches(target.metadata()), "{} violated", link);
            }
        }
    }

    for set in sets.values().filter(|s| s.is_mandatory()) {
        assert!(result.contains(set.id()), "mandatory {} missing", set.id());
    }
}

#[test]
fn test_requirement_satisfied() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", ">=1.0")]), 0),
        (pkg("b", "1.2"), 0),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "b@1.2"]);
    assert_invariants(&sets, &result);
}

#[test]
fn test_missing_dependency_on_fast_path() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", ">=2.0")]), 0),
        (pkg("b", "1.0"), 0),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::MissingDependency);
    let text = failure.to_string();
    assert!(text.contains("requires b >=2.0"), "{}", text);
}

#[test]
fn test_missing_dependency_on_general_path() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", ">=2.0")]), 0),
        (pkg("b", "1.0"), 1),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::MissingDependency);
    assert!(failure.has_kind(ProblemKind::MissingMandatory));
    assert!(failure.to_string().contains("b >=2.0"));
}

#[test]
fn test_breaks_on_fast_path() {
    let sets = sets(vec![
        (pkg_with_breaks("a", "1.0", vec![("b", "*")]), 0),
        (pkg("b", "1.0"), 0),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::Contradiction);
    assert!(failure.to_string().contains("a@1.0 is incompatible with b@1.0"));
}

#[test]
fn test_breaks_on_general_path() {
    let sets = sets(vec![
        (pkg_with_breaks("a", "1.0", vec![("b", "*")]), 0),
        (pkg("b", "1.0"), 0),
        (pkg("b", "1.1"), 1),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::Contradiction);
}

#[test]
fn test_newest_compatible_version_is_chosen() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", "<3.0")]), 0),
        (pkg("b", "1.0"), 1),
        (pkg("b", "2.5"), 1),
        (pkg("b", "3.0"), 1),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "b@2.5"]);
    assert_invariants(&sets, &result);
}

#[test]
fn test_newest_version_without_requirements() {
    let sets = sets(vec![(pkg("a", "1.0"), 1), (pkg("a", "1.1"), 1), (pkg("a", "1.0.5"), 1)]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.1"]);
}

#[test]
fn test_optional_id_is_dropped() {
    // c is only nested and needs something that does not exist
    let sets = sets(vec![
        (pkg("a", "1.0"), 0),
        (pkg_with_depends("c", "1.0", vec![("missing", "*")]), 1),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0"]);
    assert_invariants(&sets, &result);
}

#[test]
fn test_mandatory_wins_over_nested_copy() {
    let sets = sets(vec![
        (pkg("lib", "2.0"), 0),
        (pkg_with_depends("a", "1.0", vec![("lib", "*")]), 0),
        (pkg("lib", "1.0"), 1),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "lib@2.0"]);
}

#[test]
fn test_earlier_id_constrains_later_ones() {
    // a is decided first; its requirement pins the older b
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", "1.x")]), 0),
        (pkg("b", "2.0"), 1),
        (pkg("b", "1.4"), 1),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "b@1.4"]);
    assert_invariants(&sets, &result);
}

#[test]
fn test_older_version_avoids_breaks() {
    let sets = sets(vec![
        (pkg("a", "1.0"), 0),
        (pkg_with_breaks("b", "2.0", vec![("a", "*")]), 1),
        (pkg("b", "1.0"), 1),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "b@1.0"]);
}

#[test]
fn test_transitive_missing_dependency_is_named() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", "*")]), 0),
        (pkg_with_depends("b", "1.0", vec![("c", ">=1.0")]), 1),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::MissingDependency);
    let text = failure.to_string();
    assert!(text.contains("b@1.0 requires c >=1.0, which is missing"), "{}", text);
    assert!(text.contains("Mandatory mod a could not be resolved"), "{}", text);
}

#[test]
fn test_contradiction_between_mandatory_ids() {
    // both roots need different versions of a nested library
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("lib", "1.x")]), 0),
        (pkg_with_depends("b", "1.0", vec![("lib", "2.x")]), 0),
        (pkg("lib", "1.0"), 1),
        (pkg("lib", "2.0"), 1),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::Contradiction);
    let text = failure.to_string();
    assert!(
        text.contains("Conflicting requirements on lib: a@1.0 requires lib 1.x, b@1.0 requires lib 2.x"),
        "{}",
        text
    );
    assert!(!text.contains("No version of"), "{}", text);
}

#[test]
fn test_contradiction_blames_the_clashing_mods() {
    // aaa is decided first but has nothing to do with the clash
    let sets = sets(vec![
        (pkg("aaa", "1.0"), 0),
        (pkg("x", "1.0"), 0),
        (pkg("x", "2.0"), 0),
        (pkg_with_breaks("y", "1.0", vec![("x", "*")]), 0),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.kind(), ProblemKind::Contradiction);
    let text = failure.to_string();
    assert!(text.contains("y@1.0 is incompatible with x@2.0 (breaks x *)"), "{}", text);
    assert!(text.contains("y@1.0 is incompatible with x@1.0 (breaks x *)"), "{}", text);
    assert!(text.contains("Mandatory mod x could not be resolved"), "{}", text);
    assert!(!text.contains("aaa"), "{}", text);
}

#[test]
fn test_failure_carries_warnings() {
    let sets = sets(vec![
        (pkg_with_breaks("a", "1.0", vec![("b", "*")]), 0),
        (pkg("b", "1.0"), 0),
        (
            pkg("c", "1.0").with_link(link("c", "absent", "*", LinkKind::Recommends)),
            0,
        ),
    ]);

    let failure = failure(resolve_candidates(&sets).unwrap_err());
    assert_eq!(failure.warnings().len(), 1);
    assert!(failure.to_string().contains("c@1.0 recommends absent *, which is missing"));
}

#[test]
fn test_warnings_do_not_fail() {
    let sets = sets(vec![
        (
            pkg("a", "1.0")
                .with_link(link("a", "b", ">=2.0", LinkKind::Recommends))
                .with_link(link("a", "c", "*", LinkKind::Conflicts)),
            0,
        ),
        (pkg("b", "1.0"), 0),
        (pkg("c", "1.0"), 0),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(result.len(), 3);
    assert_eq!(result.warnings().len(), 2);
}

#[test]
fn test_duplicate_version_is_suspicious() {
    let sets = sets(vec![(pkg("a", "1.0"), 0), (pkg("a", "1.0"), 1)]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result
        .warnings()
        .iter()
        .any(|w| matches!(w, Warning::SuspiciousDuplicateVersion { .. })));
}

#[test]
fn test_opaque_versions() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", "nightly-7")]), 0),
        (pkg("b", "nightly-7"), 1),
        (pkg("b", "nightly-8"), 1),
    ]);

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "b@nightly-7"]);
}

#[test]
fn test_empty_input() {
    let result = resolve_candidates(&IndexMap::new()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_solver_never_selects_two_per_id() {
    let sets = sets(vec![
        (pkg_with_depends("a", "1.0", vec![("b", "*"), ("c", "*")]), 0),
        (pkg_with_depends("b", "1.0", vec![("c", "1.x")]), 1),
        (pkg("b", "2.0"), 1),
        (pkg("c", "1.0"), 1),
        (pkg("c", "2.0"), 2),
        (pkg_with_depends("c", "1.1", vec![("d", "*")]), 2),
    ]);

    let pool = Pool::from_sets(&sets);
    let selection = Solver::new(&pool).solve().unwrap();
    let mut ids: Vec<_> = selection.values().map(|c| c.id().to_string()).collect();
    ids.dedup();
    assert_eq!(ids.len(), selection.len());

    let result = resolve_candidates(&sets).unwrap();
    assert_eq!(selected(&result), vec!["a@1.0", "b@2.0", "c@2.0"]);
    assert_invariants(&sets, &result);
}
