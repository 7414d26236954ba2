use std::fmt;

use indexmap::IndexMap;
use modsolve_semver::Version;

use super::result::Selection;
use crate::package::{CandidateSet, Link};
use crate::validation::{validate_id, InvalidIdError};

/// A soft finding. Never fails resolution; always surfaced.
#[derive(Debug, Clone)]
pub enum Warning {
    /// A recommended mod is absent, or present in a version outside the range
    UnmetRecommendation {
        source: String,
        link: Link,
        /// Selected version of the target, when it is present
        found: Option<String>,
    },
    /// A mod declared as conflicting is selected
    PresentConflict {
        source: String,
        link: Link,
        other: String,
    },
    /// Several distinct candidates of one id carry the same version
    SuspiciousDuplicateVersion {
        id: String,
        version: String,
        origins: Vec<String>,
    },
    /// A soft link names an id that can never exist
    InvalidReference {
        source: String,
        link: Link,
        error: InvalidIdError,
    },
}

impl Warning {
    pub fn describe(&self) -> String {
        match self {
            Warning::UnmetRecommendation {
                source,
                link,
                found: None,
            } => format!(
                "{} recommends {} {}, which is missing",
                source, link.target, link.constraint
            ),
            Warning::UnmetRecommendation {
                source,
                link,
                found: Some(version),
            } => format!(
                "{} recommends {} {}, but {}@{} is selected",
                source, link.target, link.constraint, link.target, version
            ),
            Warning::PresentConflict {
                source,
                link,
                other,
            } => format!(
                "{} conflicts with {} ({} {}); they may not work correctly together",
                source, other, link.target, link.constraint
            ),
            Warning::SuspiciousDuplicateVersion {
                id,
                version,
                origins,
            } => format!(
                "Found {} distinct candidates of {}@{}: {}",
                origins.len(),
                id,
                version,
                origins.join(", ")
            ),
            Warning::InvalidReference {
                source,
                link,
                error,
            } => format!("{} {} an invalid mod id: {}", source, link.kind, error),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Check soft links of the selection and look for duplicate versions
pub fn collect_warnings(sets: &IndexMap<String, CandidateSet>, selection: &Selection) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for candidate in selection.values() {
        let source = candidate.to_string();
        let metadata = candidate.metadata();

        for link in &metadata.recommends {
            match selection.get(&link.target) {
                Some(target) if link.matches(target.metadata()) => {}
                Some(target) => warnings.push(Warning::UnmetRecommendation {
                    source: source.clone(),
                    link: link.clone(),
                    found: Some(target.version().to_string()),
                }),
                None => warnings.push(unresolved(&source, link)),
            }
        }

        for link in &metadata.conflicts {
            match selection.get(&link.target) {
                Some(target) if **target != **candidate && link.matches(target.metadata()) => {
                    warnings.push(Warning::PresentConflict {
                        source: source.clone(),
                        link: link.clone(),
                        other: target.to_string(),
                    })
                }
                Some(_) => {}
                None => {
                    if let Err(error) = validate_id(&link.target) {
                        warnings.push(Warning::InvalidReference {
                            source: source.clone(),
                            link: link.clone(),
                            error,
                        });
                    }
                }
            }
        }
    }

    for set in sets.values() {
        let mut groups: Vec<(&Version, Vec<String>)> = Vec::new();
        for candidate in set.candidates() {
            match groups
                .iter_mut()
                .find(|(version, _)| version.is_equivalent(candidate.version()))
            {
                Some((_, origins)) => origins.push(candidate.origin().to_string()),
                None => groups.push((candidate.version(), vec![candidate.origin().to_string()])),
            }
        }

        for (version, origins) in groups {
            if origins.len() > 1 {
                warnings.push(Warning::SuspiciousDuplicateVersion {
                    id: set.id().to_string(),
                    version: version.to_string(),
                    origins,
                });
            }
        }
    }

    warnings
}

fn unresolved(source: &str, link: &Link) -> Warning {
    match validate_id(&link.target) {
        Err(error) => Warning::InvalidReference {
            source: source.to_string(),
            link: link.clone(),
            error,
        },
        Ok(()) => Warning::UnmetRecommendation {
            source: source.to_string(),
            link: link.clone(),
            found: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{Candidate, LinkKind, Origin, PackageMetadata};
    use std::sync::Arc;

    fn candidate(metadata: PackageMetadata, origin: &str) -> Arc<Candidate> {
        Arc::new(Candidate::new(metadata, Origin::builtin(origin), 0))
    }

    fn soft(source: &str, target: &str, constraint: &str, kind: LinkKind) -> Link {
        Link::parse(source, target, &[constraint], kind).unwrap()
    }

    fn select(candidates: &[Arc<Candidate>]) -> (IndexMap<String, CandidateSet>, Selection) {
        let mut sets = IndexMap::new();
        let mut selection = Selection::new();
        for c in candidates {
            sets.entry(c.id().to_string())
                .or_insert_with(|| CandidateSet::new(c.id()))
                .insert(c.clone());
            selection.insert(c.id().to_string(), c.clone());
        }
        (sets, selection)
    }

    #[test]
    fn test_recommendations() {
        let a = candidate(
            PackageMetadata::new("a", "1.0")
                .with_link(soft("a", "b", ">=2.0", LinkKind::Recommends))
                .with_link(soft("a", "c", "*", LinkKind::Recommends))
                .with_link(soft("a", "Bad.Id", "*", LinkKind::Recommends)),
            "a",
        );
        let b = candidate(PackageMetadata::new("b", "1.0"), "b");
        let (sets, selection) = select(&[a, b]);

        let warnings = collect_warnings(&sets, &selection);
        assert_eq!(warnings.len(), 3);
        assert!(matches!(&warnings[0], Warning::UnmetRecommendation { found: Some(v), .. } if v == "1.0"));
        assert!(matches!(&warnings[1], Warning::UnmetRecommendation { found: None, .. }));
        assert!(matches!(&warnings[2], Warning::InvalidReference { .. }));
        assert!(warnings[2].to_string().contains("Mod id `Bad.Id`"));
    }

    #[test]
    fn test_present_conflict() {
        let a = candidate(
            PackageMetadata::new("a", "1.0")
                .with_link(soft("a", "b", "*", LinkKind::Conflicts))
                .with_link(soft("a", "c", "*", LinkKind::Conflicts)),
            "a",
        );
        let b = candidate(PackageMetadata::new("b", "1.0"), "b");
        let (sets, selection) = select(&[a, b]);

        let warnings = collect_warnings(&sets, &selection);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "a@1.0 conflicts with b@1.0 (b *); they may not work correctly together"
        );
    }

    #[test]
    fn test_suspicious_duplicate_version() {
        let mut set = CandidateSet::new("a");
        set.insert(candidate(PackageMetadata::new("a", "1.0"), "one"));
        set.insert(candidate(PackageMetadata::new("a", "1.0.0"), "two"));
        set.insert(candidate(PackageMetadata::new("a", "2.0"), "three"));
        let mut sets = IndexMap::new();
        sets.insert("a".to_string(), set);

        let warnings = collect_warnings(&sets, &Selection::new());
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            Warning::SuspiciousDuplicateVersion { id, origins, .. } => {
                assert_eq!(id, "a");
                assert_eq!(origins, &vec!["builtin:one".to_string(), "builtin:two".to_string()]);
            }
            other => panic!("unexpected warning: {}", other),
        }
    }
}
