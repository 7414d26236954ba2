use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use modsolve_semver::Version;

use super::PackageMetadata;

/// Where a candidate came from: a normalized filesystem path, or a
/// `builtin:` name for packages contributed by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Origin(String);

impl Origin {
    /// Origin of a scanned source; the path is expected to be canonical already
    pub fn from_path(path: &Path) -> Self {
        Origin(path.to_string_lossy().into_owned())
    }

    pub fn builtin(name: &str) -> Self {
        Origin(format!("builtin:{}", name))
    }

    pub fn is_builtin(&self) -> bool {
        self.0.starts_with("builtin:")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discovered (metadata, origin, depth) triple.
///
/// Identity is (id, origin): the same mod found twice at the same place is
/// one candidate.
#[derive(Debug, Clone)]
pub struct Candidate {
    metadata: Arc<PackageMetadata>,
    origin: Origin,
    depth: u32,
}

impl Candidate {
    pub fn new(metadata: impl Into<Arc<PackageMetadata>>, origin: Origin, depth: u32) -> Self {
        Self {
            metadata: metadata.into(),
            origin,
            depth,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn version(&self) -> &Version {
        &self.metadata.version
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// 0 for directly supplied sources and built-ins
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.origin == other.origin
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
        self.origin.hash(state);
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metadata)
    }
}

/// All candidates sharing one id
#[derive(Debug, Clone)]
pub struct CandidateSet {
    id: String,
    candidates: Vec<Arc<Candidate>>,
    mandatory: bool,
}

impl CandidateSet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            candidates: Vec::new(),
            mandatory: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a candidate; returns false when an equal (id, origin) is already present
    pub fn insert(&mut self, candidate: Arc<Candidate>) -> bool {
        if self.candidates.iter().any(|c| **c == *candidate) {
            return false;
        }
        if candidate.is_root() {
            self.mandatory = true;
        }
        self.candidates.push(candidate);
        true
    }

    /// Set when any member came from a directly supplied source
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn candidates(&self) -> &[Arc<Candidate>] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Exactly one member, found at depth 0
    pub fn is_single_root(&self) -> bool {
        self.candidates.len() == 1 && self.candidates[0].is_root()
    }

    /// Members ordered newest first.
    ///
    /// Semantic versions come first in descending order; opaque versions
    /// cannot be ordered and follow in discovery order.
    pub fn sorted_newest_first(&self) -> Vec<Arc<Candidate>> {
        let (mut semantic, opaque): (Vec<_>, Vec<_>) = self
            .candidates
            .iter()
            .cloned()
            .partition(|c| c.version().is_semantic());

        semantic.sort_by(|a, b| match (a.version().semantic(), b.version().semantic()) {
            (Some(va), Some(vb)) => vb.cmp(va),
            _ => std::cmp::Ordering::Equal,
        });

        semantic.extend(opaque);
        semantic
    }
}
