use indexmap::IndexMap;

use super::problem::{Problem, ProblemSet};
use super::result::Selection;
use crate::package::CandidateSet;

/// Recheck every hard link of a selection.
///
/// Each unmet `depends` becomes a missing dependency problem and each
/// matched `breaks` a contradiction; all of them are reported together.
pub fn verify_selection(selection: &Selection, sets: &IndexMap<String, CandidateSet>) -> ProblemSet {
    let mut problems = ProblemSet::new();

    for candidate in selection.values() {
        let metadata = candidate.metadata();

        for link in &metadata.depends {
            let satisfied = selection
                .get(&link.target)
                .map(|target| **target != **candidate && link.matches(target.metadata()))
                .unwrap_or(false);

            if !satisfied {
                let available = sets
                    .get(&link.target)
                    .map(|set| {
                        set.sorted_newest_first()
                            .iter()
                            .map(|c| c.version().to_string())
                            .collect()
                    })
                    .unwrap_or_default();

                problems.add(Problem::MissingDependency {
                    source: candidate.to_string(),
                    link: link.clone(),
                    available,
                });
            }
        }

        for link in &metadata.breaks {
            if let Some(target) = selection.get(&link.target) {
                if **target != **candidate && link.matches(target.metadata()) {
                    problems.add(Problem::Breaks {
                        source: candidate.to_string(),
                        link: link.clone(),
                        other: target.to_string(),
                    });
                }
            }
        }
    }

    problems
}
