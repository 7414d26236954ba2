use std::fmt;

use modsolve_semver::{Version, VersionParserError, VersionPredicate};
use serde::{Deserialize, Serialize};

use super::PackageMetadata;

/// Kind of relationship one mod declares towards another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Hard requirement
    Depends,
    /// Soft requirement, only warned about
    Recommends,
    /// Soft exclusion, only warned about
    Conflicts,
    /// Hard exclusion
    Breaks,
}

impl LinkKind {
    /// Returns a human-readable description of the link kind
    pub fn description(&self) -> &'static str {
        match self {
            LinkKind::Depends => "depends on",
            LinkKind::Recommends => "recommends",
            LinkKind::Conflicts => "conflicts with",
            LinkKind::Breaks => "breaks",
        }
    }

    /// Hard links take part in resolution; soft links only produce warnings
    pub fn is_hard(&self) -> bool {
        matches!(self, LinkKind::Depends | LinkKind::Breaks)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A relationship from a source mod to a target id guarded by a version predicate
#[derive(Debug, Clone)]
pub struct Link {
    /// Declaring mod id
    pub source: String,
    /// Referenced mod id
    pub target: String,
    /// Parsed predicate
    pub predicate: VersionPredicate,
    /// Predicate as written in the metadata
    pub constraint: String,
    pub kind: LinkKind,
}

impl Link {
    /// Creates a link from an already parsed predicate
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        predicate: VersionPredicate,
        kind: LinkKind,
    ) -> Self {
        let constraint = predicate.to_string();
        Self {
            source: source.into(),
            target: target.into(),
            predicate,
            constraint,
            kind,
        }
    }

    /// Creates a link from predicate expressions; any of them matching is enough
    pub fn parse<S: AsRef<str>>(
        source: impl Into<String>,
        target: impl Into<String>,
        constraints: &[S],
        kind: LinkKind,
    ) -> Result<Self, VersionParserError> {
        let predicates = constraints
            .iter()
            .map(|c| VersionPredicate::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let constraint = if constraints.is_empty() {
            "*".to_string()
        } else {
            constraints
                .iter()
                .map(|c| c.as_ref().trim())
                .collect::<Vec<_>>()
                .join(" || ")
        };

        Ok(Self {
            source: source.into(),
            target: target.into(),
            predicate: VersionPredicate::any_of(predicates),
            constraint,
            kind,
        })
    }

    /// Check a version of the target against the predicate
    pub fn matches_version(&self, version: &Version) -> bool {
        self.predicate.matches(version)
    }

    /// Check whether a mod is the target of this link in an accepted version
    pub fn matches(&self, metadata: &PackageMetadata) -> bool {
        metadata.id == self.target && self.matches_version(&metadata.version)
    }

    /// Returns a human-readable description of this link
    pub fn description(&self) -> String {
        format!(
            "{} {} {} {}",
            self.source,
            self.kind.description(),
            self.target,
            self.constraint
        )
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
