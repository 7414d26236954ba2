use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;

use super::diagnostics::Warning;
use crate::package::Candidate;

/// Selected candidate per mod id
pub type Selection = IndexMap<String, Arc<Candidate>>;

/// Outcome of a successful resolution: exactly one candidate per selected id
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    selected: Selection,
    warnings: Vec<Warning>,
}

impl ResolutionResult {
    pub fn new(mut selected: Selection, warnings: Vec<Warning>) -> Self {
        selected.sort_keys();
        Self { selected, warnings }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Candidate>> {
        self.selected.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.keys().map(String::as_str)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Arc<Candidate>> {
        self.selected.values()
    }

    pub fn selection(&self) -> &Selection {
        &self.selected
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_selection(self) -> Selection {
        self.selected
    }

    /// Selected candidates with every mod after the mods it depends on.
    ///
    /// Ties are broken by id; a dependency cycle is broken by starting with
    /// the smallest id still waiting.
    pub fn load_order(&self) -> Vec<Arc<Candidate>> {
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut pending: HashMap<&str, usize> = HashMap::new();

        for (id, candidate) in &self.selected {
            let mut count = 0;
            let mut seen: Vec<&str> = Vec::new();
            for link in &candidate.metadata().depends {
                let target = link.target.as_str();
                if target == id.as_str() || seen.contains(&target) {
                    continue;
                }
                if let Some(dependency) = self.selected.get(target) {
                    if link.matches(dependency.metadata()) {
                        seen.push(target);
                        dependents.entry(dependency.id()).or_default().push(id.as_str());
                        count += 1;
                    }
                }
            }
            pending.insert(id.as_str(), count);
        }

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut order = Vec::with_capacity(self.selected.len());

        while order.len() < self.selected.len() {
            let next = match ready.pop_first() {
                Some(id) => id,
                None => {
                    // Cycle: every remaining id waits on another one
                    let Some(id) = pending
                        .iter()
                        .filter(|(_, &count)| count > 0)
                        .map(|(&id, _)| id)
                        .min()
                    else {
                        break;
                    };
                    log::debug!("Breaking dependency cycle at {}", id);
                    id
                }
            };

            pending.insert(next, 0);
            if let Some(candidate) = self.selected.get(next) {
                order.push(candidate.clone());
            }

            for dependent in dependents.get(next).into_iter().flatten() {
                if let Some(count) = pending.get_mut(dependent) {
                    if *count > 0 {
                        *count -= 1;
                        if *count == 0 {
                            ready.insert(*dependent);
                        }
                    }
                }
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{Link, LinkKind, Origin, PackageMetadata};

    fn result(mods: Vec<PackageMetadata>) -> ResolutionResult {
        let mut selection = Selection::new();
        for metadata in mods {
            let origin = Origin::builtin(&metadata.id);
            let candidate = Arc::new(Candidate::new(metadata, origin, 0));
            selection.insert(candidate.id().to_string(), candidate);
        }
        ResolutionResult::new(selection, Vec::new())
    }

    fn depends(source: &str, target: &str) -> Link {
        Link::parse(source, target, &["*"], LinkKind::Depends).unwrap()
    }

    fn ids(order: Vec<Arc<Candidate>>) -> Vec<String> {
        order.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn test_dependencies_load_first() {
        let result = result(vec![
            PackageMetadata::new("aa", "1.0").with_link(depends("aa", "zz")),
            PackageMetadata::new("mm", "1.0"),
            PackageMetadata::new("zz", "1.0").with_link(depends("zz", "mm")),
        ]);
        assert_eq!(ids(result.load_order()), vec!["mm", "zz", "aa"]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let result = result(vec![
            PackageMetadata::new("cc", "1.0"),
            PackageMetadata::new("bb", "1.0"),
            PackageMetadata::new("aa", "1.0"),
        ]);
        assert_eq!(ids(result.load_order()), vec!["aa", "bb", "cc"]);
        assert_eq!(result.ids().collect::<Vec<_>>(), vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn test_cycles_are_broken() {
        let result = result(vec![
            PackageMetadata::new("aa", "1.0").with_link(depends("aa", "bb")),
            PackageMetadata::new("bb", "1.0").with_link(depends("bb", "aa")),
            PackageMetadata::new("cc", "1.0").with_link(depends("cc", "aa")),
        ]);
        assert_eq!(ids(result.load_order()), vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn test_missing_dependency_is_ignored() {
        let result = result(vec![PackageMetadata::new("aa", "1.0").with_link(depends("aa", "gone"))]);
        assert_eq!(ids(result.load_order()), vec!["aa"]);
    }
}
