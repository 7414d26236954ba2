//! Single-operator version constraint

use std::fmt;

use super::Operator;
use crate::Version;

/// A single comparison against a bound version, e.g. `>=1.2.0`
#[derive(Debug, Clone)]
pub struct Constraint {
    operator: Operator,
    version: Version,
}

impl Constraint {
    pub fn new(operator: Operator, version: impl Into<Version>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check a candidate version against this constraint.
    ///
    /// Two semantic versions are compared by order. If either side is opaque
    /// only `=` and `!=` can match, by exact string comparison.
    pub fn matches(&self, candidate: &Version) -> bool {
        match candidate.compare(&self.version) {
            Some(ordering) => self.operator.accepts(ordering),
            None => match self.operator {
                Operator::Equal => candidate.as_str() == self.version.as_str(),
                Operator::NotEqual => candidate.as_str() != self.version.as_str(),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}
