//! Version-range predicate attached to a relationship

use std::fmt;

use super::{Constraint, MultiConstraint};
use crate::version_parser::{VersionParser, VersionParserError};
use crate::Version;

/// A version-range predicate.
///
/// Matching is pure: the same version always gives the same answer.
#[derive(Debug, Clone)]
pub enum VersionPredicate {
    /// Matches every version, written `*`
    Any,
    /// A single comparison
    Single(Constraint),
    /// Several predicates combined with AND or OR
    Multi(MultiConstraint),
}

impl VersionPredicate {
    /// Parse a predicate expression such as `>=1.2 <2` or `1.x || ^2.1`
    pub fn parse(input: &str) -> Result<Self, VersionParserError> {
        VersionParser::new().parse_predicate(input)
    }

    /// Combine predicates so that any of them matching is enough.
    ///
    /// Metadata may list several accepted ranges for one relationship.
    pub fn any_of(mut predicates: Vec<VersionPredicate>) -> Self {
        match predicates.len() {
            0 => VersionPredicate::Any,
            1 => predicates.remove(0),
            _ => VersionPredicate::Multi(MultiConstraint::new(predicates, false)),
        }
    }

    /// Combine predicates so that all of them must match
    pub fn all_of(mut predicates: Vec<VersionPredicate>) -> Self {
        predicates.retain(|p| !p.is_any());
        match predicates.len() {
            0 => VersionPredicate::Any,
            1 => predicates.remove(0),
            _ => VersionPredicate::Multi(MultiConstraint::new(predicates, true)),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, VersionPredicate::Any)
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionPredicate::Any => true,
            VersionPredicate::Single(constraint) => constraint.matches(version),
            VersionPredicate::Multi(multi) => multi.matches(version),
        }
    }
}

impl Default for VersionPredicate {
    fn default() -> Self {
        VersionPredicate::Any
    }
}

impl From<Constraint> for VersionPredicate {
    fn from(constraint: Constraint) -> Self {
        VersionPredicate::Single(constraint)
    }
}

impl fmt::Display for VersionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPredicate::Any => write!(f, "*"),
            VersionPredicate::Single(constraint) => write!(f, "{}", constraint),
            VersionPredicate::Multi(multi) => write!(f, "{}", multi),
        }
    }
}
