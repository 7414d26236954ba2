use std::time::Instant;

use indexmap::IndexMap;

use super::diagnostics::collect_warnings;
use super::pool::Pool;
use super::problem::{ProblemSet, ResolutionFailure};
use super::result::{ResolutionResult, Selection};
use super::solver::{SolveFailure, Solver};
use super::verify::verify_selection;
use crate::error::{ResolverError, Result};
use crate::package::CandidateSet;

/// Select one candidate per id from frozen candidate sets.
///
/// Hard-constraint problems are reported together in one
/// [`ResolutionFailure`] that also carries the soft warnings.
pub fn resolve_candidates(sets: &IndexMap<String, CandidateSet>) -> Result<ResolutionResult> {
    let start = Instant::now();

    let selection = if sets.values().all(CandidateSet::is_single_root) {
        log::debug!("Every mod id has a single root candidate, skipping the solver");
        sets.values()
            .filter_map(|set| set.candidates().first().map(|c| (set.id().to_string(), c.clone())))
            .collect::<Selection>()
    } else {
        let pool = Pool::from_sets(sets);
        log::debug!("Solving over {} candidate(s) for {} mod id(s)", pool.len(), sets.len());

        match Solver::new(&pool).solve() {
            Ok(selection) => selection,
            Err(SolveFailure::Problems(problems)) => {
                return Err(fail(problems, sets, &Selection::new()));
            }
            Err(SolveFailure::InternalInvariant { id, selected }) => {
                return Err(ResolverError::InternalInvariant { id, selected });
            }
        }
    };

    let problems = verify_selection(&selection, sets);
    if !problems.is_empty() {
        return Err(fail(problems, sets, &selection));
    }

    let warnings = collect_warnings(sets, &selection);
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    log::info!(
        "Resolved {} mod(s) in {:.2}s",
        selection.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(ResolutionResult::new(selection, warnings))
}

fn fail(problems: ProblemSet, sets: &IndexMap<String, CandidateSet>, selection: &Selection) -> ResolverError {
    let warnings = collect_warnings(sets, selection);
    let failure = ResolutionFailure::new(problems, warnings);
    log::error!("{}", failure);
    ResolverError::Resolution(failure)
}
