//! Semantic and opaque versions

use std::cmp::Ordering;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // MAJOR(.MINOR)*(-PRERELEASE)?(+BUILD)? with an optional leading "v"
    static ref SEMANTIC_RE: Regex = Regex::new(
        r"^v?(?P<core>\d+(?:\.\d+)*)(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$"
    ).unwrap();
}

/// A version following the semantic scheme.
///
/// Any number of numeric components is accepted (`1`, `1.2`, `1.2.3.4`);
/// missing components compare as zero. Build metadata is kept for display
/// but ignored when ordering.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    components: Vec<u64>,
    prerelease: Option<String>,
    build: Option<String>,
    raw: String,
}

impl SemanticVersion {
    /// Parse a semantic version, returning `None` if the string does not follow the scheme
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let caps = SEMANTIC_RE.captures(input)?;

        let components = caps["core"]
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            components,
            prerelease: caps.name("pre").map(|m| m.as_str().to_string()),
            build: caps.name("build").map(|m| m.as_str().to_string()),
            raw: input.to_string(),
        })
    }

    /// Build a release version from numeric components
    pub fn from_components(components: Vec<u64>) -> Self {
        let raw = components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        Self {
            components,
            prerelease: None,
            build: None,
            raw,
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Get a numeric component, treating missing ones as zero
    pub fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }

    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The smallest release above every version sharing the first `index + 1` components.
    ///
    /// `1.4.2` bumped at index 0 is `2`, at index 1 it is `1.5`.
    pub fn bumped(&self, index: usize) -> SemanticVersion {
        let mut components: Vec<u64> = (0..=index).map(|i| self.component(i)).collect();
        components[index] = components[index].saturating_add(1);
        SemanticVersion::from_components(components)
    }

    /// The version as it was written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    // numeric identifiers sort before alphanumeric ones
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }

        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => compare_prerelease(a, b),
        }
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A declared version: semantic when it parses as such, opaque otherwise
#[derive(Debug, Clone)]
pub enum Version {
    Semantic(SemanticVersion),
    Opaque(String),
}

impl Version {
    /// Parse a version string. Never fails: unparseable strings become opaque versions.
    pub fn parse(input: &str) -> Self {
        match SemanticVersion::parse(input) {
            Some(semantic) => Version::Semantic(semantic),
            None => Version::Opaque(input.trim().to_string()),
        }
    }

    pub fn semantic(&self) -> Option<&SemanticVersion> {
        match self {
            Version::Semantic(v) => Some(v),
            Version::Opaque(_) => None,
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, Version::Semantic(_))
    }

    /// The version as it was written
    pub fn as_str(&self) -> &str {
        match self {
            Version::Semantic(v) => v.as_str(),
            Version::Opaque(s) => s,
        }
    }

    /// Ordered comparison, only defined when both versions are semantic
    pub fn compare(&self, other: &Version) -> Option<Ordering> {
        match (self, other) {
            (Version::Semantic(a), Version::Semantic(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality across schemes: ordered equality for two semantic versions,
    /// exact string equality otherwise
    pub fn is_equivalent(&self, other: &Version) -> bool {
        match self.compare(other) {
            Some(ordering) => ordering == Ordering::Equal,
            None => self.as_str() == other.as_str(),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Version::parse(value)
    }
}
