use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use crate::package::{Candidate, CandidateSet};

/// Candidate sets filled concurrently by discovery tasks
#[derive(Debug, Default)]
pub struct CandidatePool {
    sets: Mutex<IndexMap<String, CandidateSet>>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate, returning it unless an equal (id, origin) exists
    pub fn insert(&self, candidate: Candidate) -> Option<Arc<Candidate>> {
        let candidate = Arc::new(candidate);
        let mut sets = self.sets.lock().unwrap_or_else(|e| e.into_inner());
        let set = sets
            .entry(candidate.id().to_string())
            .or_insert_with(|| CandidateSet::new(candidate.id()));

        if set.insert(candidate.clone()) {
            Some(candidate)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.sets.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of candidates over all ids
    pub fn candidate_count(&self) -> usize {
        let sets = self.sets.lock().unwrap_or_else(|e| e.into_inner());
        sets.values().map(CandidateSet::len).sum()
    }

    /// Take the sets out of the pool, ordered by id
    pub fn freeze(&self) -> IndexMap<String, CandidateSet> {
        let mut sets = std::mem::take(&mut *self.sets.lock().unwrap_or_else(|e| e.into_inner()));
        sets.sort_keys();
        sets
    }
}
