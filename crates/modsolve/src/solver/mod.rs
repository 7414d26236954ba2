//! Selection of one candidate per mod id.
//!
//! # Architecture
//!
//! - [`Pool`]: arena of all candidates, addressed by [`PackageId`]
//! - [`RuleGenerator`]: turns candidates and their hard links into clauses
//! - [`SatSolver`]: DPLL search with unit propagation over those clauses
//! - [`Solver`]: incremental assumption search, one id at a time
//! - [`resolve_candidates`]: fast path, general path, verification and
//!   soft diagnostics
//!
//! # Algorithm Overview
//!
//! 1. **Fast path**: when every id has exactly one candidate found at depth
//!    0 there is nothing to choose.
//! 2. **Rule generation**: exactly-one per mandatory id, at-most-one per id,
//!    one clause per `depends` and one per matching `breaks` pair.
//! 3. **Incremental search**: ids in sorted order; for each id the newest
//!    candidate that keeps all committed assumptions satisfiable is kept.
//! 4. **Verification**: every hard link is rechecked against the selection.
//! 5. **Diagnostics**: recommends, conflicts and duplicate versions are
//!    reported as warnings.

mod decisions;
mod diagnostics;
mod pool;
mod problem;
mod resolve;
mod result;
mod rule;
mod rule_generator;
mod rule_set;
mod sat;
mod solver;
mod verify;

#[cfg(test)]
mod tests;

pub use decisions::Decisions;
pub use diagnostics::{collect_warnings, Warning};
pub use pool::{PackageId, Pool};
pub use problem::{Problem, ProblemKind, ProblemSet, ResolutionFailure};
pub use resolve::resolve_candidates;
pub use result::{ResolutionResult, Selection};
pub use rule::{Literal, Rule, RuleType};
pub use rule_generator::RuleGenerator;
pub use rule_set::RuleSet;
pub use sat::SatSolver;
pub use solver::{SolveFailure, Solver};
pub use verify::verify_selection;
