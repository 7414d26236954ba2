use indexmap::IndexMap;

use super::pool::{PackageId, Pool};
use super::problem::{Problem, ProblemSet};
use super::result::Selection;
use super::rule::{Literal, Rule, RuleType};
use super::rule_generator::RuleGenerator;
use super::rule_set::RuleSet;
use super::sat::SatSolver;

/// Why the general path produced no selection
#[derive(Debug, Clone)]
pub enum SolveFailure {
    /// Hard constraints cannot be met
    Problems(ProblemSet),
    /// The model selected several candidates of one id
    InternalInvariant { id: String, selected: Vec<String> },
}

/// Incremental assumption search over a candidate pool
pub struct Solver<'a> {
    pool: &'a Pool,
}

impl<'a> Solver<'a> {
    pub fn new(pool: &'a Pool) -> Self {
        Self { pool }
    }

    /// Pick at most one candidate per id, exactly one for mandatory ids.
    ///
    /// Ids are handled in pool order (sorted by id). For each id the newest
    /// candidate that is satisfiable together with the candidates committed
    /// so far is committed as well. Optional ids without such a candidate
    /// are dropped; a mandatory one fails the whole resolution.
    pub fn solve(&self) -> Result<Selection, SolveFailure> {
        let rules = RuleGenerator::new(self.pool).generate();
        let sat = SatSolver::new(&rules, self.pool.len());
        let mut assumptions: Vec<Literal> = Vec::new();

        for (name, ids) in self.pool.names() {
            let mut accepted = None;

            for &package_id in ids {
                assumptions.push(package_id);
                if sat.solve(&assumptions).is_some() {
                    accepted = Some(package_id);
                    break;
                }
                log::trace!("{} is not satisfiable with the current selection", self.pool.pretty(package_id));
                assumptions.pop();
            }

            match accepted {
                Some(package_id) => {
                    log::debug!("Assuming {}", self.pool.pretty(package_id));
                }
                None if self.pool.is_mandatory(name) => {
                    log::debug!("No candidate of mandatory mod {} can be selected", name);
                    return Err(SolveFailure::Problems(self.explain(name, &rules, &sat, &assumptions)));
                }
                None => {
                    log::debug!("Dropping optional mod {}: no candidate is compatible", name);
                }
            }
        }

        let Some(model) = sat.solve(&assumptions) else {
            let mut problems = ProblemSet::new();
            for (name, _) in self.pool.names().filter(|(name, _)| self.pool.is_mandatory(name)) {
                problems.add(Problem::MissingMandatory { id: name.to_string() });
            }
            return Err(SolveFailure::Problems(problems));
        };

        self.build_selection(&model)
    }

    fn build_selection(&self, model: &[PackageId]) -> Result<Selection, SolveFailure> {
        let mut selection = Selection::new();
        let mut model = model.to_vec();
        model.sort_unstable();

        for package_id in model {
            let Some(candidate) = self.pool.candidate(package_id) else {
                continue;
            };

            if let Some(existing) = selection.get(candidate.id()) {
                let mut selected = vec![existing.to_string(), candidate.to_string()];
                selected.dedup();
                return Err(SolveFailure::InternalInvariant {
                    id: candidate.id().to_string(),
                    selected,
                });
            }
            selection.insert(candidate.id().to_string(), candidate.clone());
        }

        Ok(selection)
    }

    /// Explain why no candidate of a mandatory id fits the committed ones.
    ///
    /// The explanation is built from a minimal unsatisfiable subset of the
    /// rules, so it names the links that actually clash rather than the id
    /// the search happened to be on.
    fn explain(&self, name: &str, rules: &RuleSet, sat: &SatSolver, committed: &[Literal]) -> ProblemSet {
        let mut problems = ProblemSet::new();
        let mut mandatory: Vec<&str> = Vec::new();
        let mut requirements: IndexMap<&str, Vec<&Rule>> = IndexMap::new();

        let core = sat.unsatisfiable_core(committed).unwrap_or_default();
        log::debug!("Conflict involves {} of {} rule(s)", core.len(), rules.len());

        for rule in core.iter().filter_map(|&id| rules.get(id)) {
            match rule.rule_type() {
                RuleType::RequireOne => mandatory.extend(rule.target_name()),
                RuleType::SameName => {}
                RuleType::PackageRequires => {
                    let (Some(source), Some(link)) = (rule.source_package(), rule.link()) else {
                        continue;
                    };
                    if rule.is_assertion() {
                        problems.add(Problem::MissingDependency {
                            source: self.pool.pretty(source),
                            link: link.clone(),
                            available: self
                                .pool
                                .packages_by_name(&link.target)
                                .iter()
                                .filter(|&&id| id != source)
                                .filter_map(|&id| self.pool.candidate(id))
                                .map(|c| c.version().to_string())
                                .collect(),
                        });
                    } else {
                        requirements.entry(link.target.as_str()).or_default().push(rule);
                    }
                }
                RuleType::PackageBreaks => {
                    let (Some(source), Some(link)) = (rule.source_package(), rule.link()) else {
                        continue;
                    };
                    let Some(other) = rule.literals().iter().map(|&l| -l).find(|&id| id != source) else {
                        continue;
                    };
                    problems.add(Problem::Breaks {
                        source: self.pool.pretty(source),
                        link: link.clone(),
                        other: self.pool.pretty(other),
                    });
                }
            }
        }

        for (target, clashing) in requirements.into_iter().filter(|(_, rules)| rules.len() > 1) {
            problems.add(Problem::ConflictingRequirements {
                id: target.to_string(),
                requirements: clashing
                    .iter()
                    .filter_map(|rule| Some((rule.source_package()?, rule.link()?)))
                    .map(|(source, link)| {
                        format!("{} requires {} {}", self.pool.pretty(source), link.target, link.constraint)
                    })
                    .collect(),
            });
        }

        if problems.is_empty() {
            let candidates = self.pool.packages_by_name(name);
            problems.add(Problem::Unsatisfiable {
                id: name.to_string(),
                tried: candidates.iter().map(|&id| self.pool.pretty(id)).collect(),
            });
        }

        if mandatory.is_empty() {
            mandatory.push(name);
        }
        for id in mandatory {
            problems.add(Problem::MissingMandatory { id: id.to_string() });
        }
        problems
    }
}
