use std::sync::Arc;

use indexmap::IndexMap;

use crate::package::{Candidate, CandidateSet, Link};

/// Candidate index used as a SAT variable; positive literals select it
pub type PackageId = i32;

/// Arena of every candidate taking part in resolution.
///
/// Ids are 1-based and handed out id by id (sorted by mod id), newest
/// version first inside each id.
#[derive(Debug, Default)]
pub struct Pool {
    candidates: Vec<Arc<Candidate>>,
    by_name: IndexMap<String, Vec<PackageId>>,
    mandatory: IndexMap<String, bool>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the arena from frozen candidate sets
    pub fn from_sets(sets: &IndexMap<String, CandidateSet>) -> Self {
        let mut pool = Self::new();

        let mut ids: Vec<&String> = sets.keys().collect();
        ids.sort();

        for id in ids {
            let set = &sets[id.as_str()];
            for candidate in set.sorted_newest_first() {
                pool.add(candidate, set.is_mandatory());
            }
        }

        pool
    }

    /// Add a candidate, returning its package id
    pub fn add(&mut self, candidate: Arc<Candidate>, mandatory: bool) -> PackageId {
        self.candidates.push(candidate.clone());
        let package_id = self.candidates.len() as PackageId;

        let name = candidate.id().to_string();
        self.by_name.entry(name.clone()).or_default().push(package_id);
        let flag = self.mandatory.entry(name).or_insert(false);
        *flag |= mandatory;

        package_id
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Get a candidate by package id
    pub fn candidate(&self, package_id: PackageId) -> Option<&Arc<Candidate>> {
        if package_id < 1 {
            return None;
        }
        self.candidates.get((package_id - 1) as usize)
    }

    /// All package ids, in arena order
    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> {
        1..=(self.candidates.len() as PackageId)
    }

    /// Mod ids with their candidates, in arena order
    pub fn names(&self) -> impl Iterator<Item = (&str, &[PackageId])> {
        self.by_name.iter().map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    /// Candidates of one mod id, newest first
    pub fn packages_by_name(&self, name: &str) -> &[PackageId] {
        self.by_name.get(name).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    pub fn is_mandatory(&self, name: &str) -> bool {
        self.mandatory.get(name).copied().unwrap_or(false)
    }

    /// Candidates other than `source` that satisfy `link`
    pub fn what_provides(&self, link: &Link, source: PackageId) -> Vec<PackageId> {
        self.packages_by_name(&link.target)
            .iter()
            .copied()
            .filter(|&id| id != source)
            .filter(|&id| {
                self.candidate(id)
                    .map(|c| link.matches(c.metadata()))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// `id@version` for messages
    pub fn pretty(&self, package_id: PackageId) -> String {
        self.candidate(package_id)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("#{}", package_id))
    }
}
