//! Compound predicate combining several predicates

use std::fmt;

use super::VersionPredicate;
use crate::Version;

/// Predicates combined with AND (conjunctive) or OR (disjunctive) logic
#[derive(Debug, Clone)]
pub struct MultiConstraint {
    predicates: Vec<VersionPredicate>,
    conjunctive: bool,
}

impl MultiConstraint {
    pub fn new(predicates: Vec<VersionPredicate>, conjunctive: bool) -> Self {
        Self {
            predicates,
            conjunctive,
        }
    }

    pub fn predicates(&self) -> &[VersionPredicate] {
        &self.predicates
    }

    pub fn is_conjunctive(&self) -> bool {
        self.conjunctive
    }

    pub fn is_disjunctive(&self) -> bool {
        !self.conjunctive
    }

    pub fn matches(&self, version: &Version) -> bool {
        if self.conjunctive {
            self.predicates.iter().all(|p| p.matches(version))
        } else {
            self.predicates.iter().any(|p| p.matches(version))
        }
    }
}

impl fmt::Display for MultiConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.conjunctive { " " } else { " || " };
        let parts: Vec<String> = self.predicates.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(separator))
    }
}
