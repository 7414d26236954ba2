use std::fmt;

use super::diagnostics::Warning;
use crate::package::Link;

/// Broad category of a hard-constraint failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// A hard requirement has no acceptable candidate
    MissingDependency,
    /// Hard constraints contradict each other
    Contradiction,
    /// A mandatory id could not be selected
    MissingMandatory,
}

/// A problem encountered during resolution.
///
/// Problems explain why no valid selection exists.
#[derive(Debug, Clone)]
pub enum Problem {
    /// `source` depends on `link`, which nothing available satisfies
    MissingDependency {
        source: String,
        link: Link,
        /// Versions of the target that exist but do not match
        available: Vec<String>,
    },
    /// `source` breaks `other`, and both would have to be selected
    Breaks {
        source: String,
        link: Link,
        other: String,
    },
    /// Selected mods need versions of `id` that no single candidate meets
    ConflictingRequirements { id: String, requirements: Vec<String> },
    /// No candidate of `id` fits the other hard constraints
    Unsatisfiable { id: String, tried: Vec<String> },
    /// A mandatory id ended up without a candidate
    MissingMandatory { id: String },
}

impl Problem {
    pub fn kind(&self) -> ProblemKind {
        match self {
            Problem::MissingDependency { .. } => ProblemKind::MissingDependency,
            Problem::Breaks { .. }
            | Problem::ConflictingRequirements { .. }
            | Problem::Unsatisfiable { .. } => ProblemKind::Contradiction,
            Problem::MissingMandatory { .. } => ProblemKind::MissingMandatory,
        }
    }

    /// Generate a human-readable description of this problem
    pub fn describe(&self) -> String {
        match self {
            Problem::MissingDependency {
                source,
                link,
                available,
            } => {
                if available.is_empty() {
                    format!(
                        "{} requires {} {}, which is missing",
                        source, link.target, link.constraint
                    )
                } else {
                    format!(
                        "{} requires {} {}, but only the wrong version is present: {}",
                        source,
                        link.target,
                        link.constraint,
                        available.join(", ")
                    )
                }
            }
            Problem::Breaks {
                source,
                link,
                other,
            } => format!(
                "{} is incompatible with {} (breaks {} {})",
                source, other, link.target, link.constraint
            ),
            Problem::ConflictingRequirements { id, requirements } => format!(
                "Conflicting requirements on {}: {}",
                id,
                requirements.join(", ")
            ),
            Problem::Unsatisfiable { id, tried } => format!(
                "No version of {} is compatible with the other mods (tried {})",
                id,
                tried.join(", ")
            ),
            Problem::MissingMandatory { id } => {
                format!("Mandatory mod {} could not be resolved", id)
            }
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Collection of problems, without duplicate descriptions
#[derive(Debug, Clone, Default)]
pub struct ProblemSet {
    problems: Vec<Problem>,
}

impl ProblemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a problem unless an identical one is already recorded
    pub fn add(&mut self, problem: Problem) {
        let description = problem.describe();
        if self.problems.iter().all(|p| p.describe() != description) {
            self.problems.push(problem);
        }
    }

    pub fn extend(&mut self, other: ProblemSet) {
        for problem in other.problems {
            self.add(problem);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn has_kind(&self, kind: ProblemKind) -> bool {
        self.problems.iter().any(|p| p.kind() == kind)
    }

    /// Generate a complete description of all problems
    pub fn describe(&self) -> String {
        self.problems
            .iter()
            .map(|p| format!("  - {}", p.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The single combined failure of a resolution run
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    problems: ProblemSet,
    warnings: Vec<Warning>,
}

impl ResolutionFailure {
    pub fn new(problems: ProblemSet, warnings: Vec<Warning>) -> Self {
        Self { problems, warnings }
    }

    pub fn problems(&self) -> &ProblemSet {
        &self.problems
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The most specific kind: a named missing dependency first, then a
    /// contradiction, then a mandatory id that could not be resolved
    pub fn kind(&self) -> ProblemKind {
        if self.problems.has_kind(ProblemKind::MissingDependency) {
            ProblemKind::MissingDependency
        } else if self.problems.has_kind(ProblemKind::Contradiction) {
            ProblemKind::Contradiction
        } else {
            ProblemKind::MissingMandatory
        }
    }

    pub fn has_kind(&self, kind: ProblemKind) -> bool {
        self.problems.has_kind(kind)
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mod resolution failed:")?;
        write!(f, "{}", self.problems.describe())?;

        if !self.warnings.is_empty() {
            write!(f, "\nWarnings:")?;
            for warning in &self.warnings {
                write!(f, "\n  - {}", warning)?;
            }
        }
        Ok(())
    }
}
