use super::decisions::Decisions;
use super::pool::PackageId;
use super::rule::Literal;
use super::rule_set::RuleSet;

/// A branching point: `literal` was tried at `level`; `flipped` once its
/// negation has been tried as well
struct Branch {
    literal: Literal,
    level: u32,
    flipped: bool,
}

/// DPLL search with unit propagation over a fixed rule set.
///
/// Variables are the package ids `1..=variables`. Branching tries "not
/// selected" first, so models stay small; backtracking is chronological.
pub struct SatSolver<'a> {
    rules: &'a RuleSet,
    variables: usize,
}

impl<'a> SatSolver<'a> {
    pub fn new(rules: &'a RuleSet, variables: usize) -> Self {
        Self { rules, variables }
    }

    /// Find a model in which every assumption holds.
    ///
    /// Returns the selected package ids, or `None` when the rules and the
    /// assumptions are unsatisfiable together.
    pub fn solve(&self, assumptions: &[Literal]) -> Option<Vec<PackageId>> {
        self.solve_with(assumptions, &vec![true; self.rules.len()])
    }

    /// Rule ids of a minimal subset of the rules that is unsatisfiable
    /// together with `assumptions`.
    ///
    /// Rules are dropped one at a time in id order whenever the remaining
    /// ones stay unsatisfiable. `None` when the assumptions are satisfiable.
    pub fn unsatisfiable_core(&self, assumptions: &[Literal]) -> Option<Vec<u32>> {
        let mut active = vec![true; self.rules.len()];
        if self.solve_with(assumptions, &active).is_some() {
            return None;
        }

        for index in 0..active.len() {
            active[index] = false;
            if self.solve_with(assumptions, &active).is_some() {
                active[index] = true;
            }
        }

        Some(
            active
                .iter()
                .enumerate()
                .filter(|&(_, &on)| on)
                .map(|(id, _)| id as u32)
                .collect(),
        )
    }

    /// Search using only the rules whose id is marked in `active`
    fn solve_with(&self, assumptions: &[Literal], active: &[bool]) -> Option<Vec<PackageId>> {
        let mut decisions = Decisions::with_capacity(self.variables);

        for &assumption in assumptions {
            if !decisions.decide(assumption) {
                return None;
            }
        }
        if let Err(rule_id) = self.propagate(&mut decisions, active) {
            log::trace!("Assumptions {:?} conflict in rule {}", assumptions, rule_id);
            return None;
        }

        let mut branches: Vec<Branch> = Vec::new();

        loop {
            let Some(variable) = self.next_undecided(&decisions) else {
                return Some(decisions.installed());
            };

            decisions.increment_level();
            let level = decisions.level();
            decisions.decide(-variable);
            branches.push(Branch {
                literal: -variable,
                level,
                flipped: false,
            });

            while let Err(rule_id) = self.propagate(&mut decisions, active) {
                log::trace!("Conflict in rule {} at level {}", rule_id, decisions.level());

                // Backtrack to the most recent branch with an untried value
                loop {
                    let branch = branches.pop()?;
                    decisions.revert_to_level(branch.level - 1);
                    if branch.flipped {
                        continue;
                    }

                    decisions.increment_level();
                    decisions.decide(-branch.literal);
                    branches.push(Branch {
                        literal: -branch.literal,
                        level: branch.level,
                        flipped: true,
                    });
                    break;
                }
            }
        }
    }

    /// Unit propagation until fixpoint; `Err` carries the id of a falsified rule
    fn propagate(&self, decisions: &mut Decisions, active: &[bool]) -> Result<(), u32> {
        loop {
            let mut changed = false;

            for rule in self.rules.iter().filter(|r| active[r.id() as usize]) {
                let mut unassigned: Option<Literal> = None;
                let mut unassigned_count = 0;
                let mut satisfied = false;

                for &literal in rule.literals() {
                    if decisions.satisfied(literal) {
                        satisfied = true;
                        break;
                    }
                    if !decisions.conflict(literal) {
                        unassigned_count += 1;
                        unassigned = Some(literal);
                    }
                }

                if satisfied {
                    continue;
                }

                match (unassigned_count, unassigned) {
                    (0, _) => return Err(rule.id()),
                    (1, Some(literal)) => {
                        decisions.decide(literal);
                        changed = true;
                    }
                    _ => {}
                }
            }

            if !changed {
                return Ok(());
            }
        }
    }

    fn next_undecided(&self, decisions: &Decisions) -> Option<PackageId> {
        (1..=self.variables as PackageId).find(|&id| decisions.undecided(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Rule;

    fn rules(list: Vec<Rule>) -> RuleSet {
        let mut set = RuleSet::new();
        for rule in list {
            set.add(rule);
        }
        set
    }

    #[test]
    fn test_empty_rules_select_nothing() {
        let set = RuleSet::new();
        assert_eq!(SatSolver::new(&set, 3).solve(&[]), Some(Vec::new()));
    }

    #[test]
    fn test_assumption_with_propagation() {
        // 1 requires 2 or 3; 2 and 3 conflict; 3 is excluded
        let set = rules(vec![
            Rule::requires(1, vec![2, 3]),
            Rule::same_name(2, 3),
            Rule::requires(3, Vec::new()),
        ]);
        let mut model = SatSolver::new(&set, 3).solve(&[1]).unwrap();
        model.sort();
        assert_eq!(model, vec![1, 2]);
    }

    #[test]
    fn test_unsatisfiable_assumptions() {
        let set = rules(vec![Rule::breaks(1, 2)]);
        assert!(SatSolver::new(&set, 2).solve(&[1, 2]).is_none());
        assert!(SatSolver::new(&set, 2).solve(&[1, -1]).is_none());
    }

    #[test]
    fn test_backtracking_finds_positive_branch() {
        // one of 1 or 2 must be selected, and 1 requires 3 which is excluded
        let set = rules(vec![
            Rule::require_one(vec![1, 2]),
            Rule::requires(1, vec![3]),
            Rule::requires(3, Vec::new()),
        ]);
        let model = SatSolver::new(&set, 3).solve(&[]).unwrap();
        assert_eq!(model, vec![2]);
    }

    #[test]
    fn test_search_needs_flips() {
        // at least one of 1..3, each pair excludes, 1 and 2 need 4, 4 excluded
        let set = rules(vec![
            Rule::require_one(vec![1, 2, 3]),
            Rule::same_name(1, 2),
            Rule::same_name(1, 3),
            Rule::same_name(2, 3),
            Rule::requires(1, vec![4]),
            Rule::requires(2, vec![4]),
            Rule::requires(4, Vec::new()),
        ]);
        let model = SatSolver::new(&set, 4).solve(&[]).unwrap();
        assert_eq!(model, vec![3]);
    }

    #[test]
    fn test_unsatisfiable_rules() {
        let set = rules(vec![Rule::require_one(vec![1]), Rule::requires(1, Vec::new())]);
        assert!(SatSolver::new(&set, 1).solve(&[]).is_none());
    }

    #[test]
    fn test_unsatisfiable_core_is_minimal() {
        // 1..=3 contradict each other; with 1 assumed, 2 and 3 are enough
        let set = rules(vec![
            Rule::require_one(vec![4]),
            Rule::require_one(vec![1]),
            Rule::require_one(vec![2]),
            Rule::breaks(1, 2),
            Rule::same_name(1, 3),
        ]);
        let sat = SatSolver::new(&set, 4);
        assert_eq!(sat.unsatisfiable_core(&[]), Some(vec![1, 2, 3]));
        assert_eq!(sat.unsatisfiable_core(&[-4, 1]), Some(vec![2, 3]));
    }

    #[test]
    fn test_satisfiable_rules_have_no_core() {
        let set = rules(vec![Rule::require_one(vec![1, 2]), Rule::breaks(1, 2)]);
        assert!(SatSolver::new(&set, 2).unsatisfiable_core(&[]).is_none());
    }
}
