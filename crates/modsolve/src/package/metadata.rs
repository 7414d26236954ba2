use std::fmt;

use modsolve_semver::Version;
use serde::{Deserialize, Serialize};

use super::{Link, LinkKind};

/// Newest metadata schema version understood by the bundled parser
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Side a mod is meant to run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(rename = "*")]
    Any,
    Client,
    Server,
}

impl Environment {
    /// Parse `*`, `client` or `server` (case-insensitive)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "*" | "" => Some(Environment::Any),
            "client" => Some(Environment::Client),
            "server" => Some(Environment::Server),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Any => "*",
            Environment::Client => "client",
            Environment::Server => "server",
        }
    }

    /// Whether a mod declared for `declared` may load in this environment
    pub fn allows(&self, declared: Environment) -> bool {
        *self == Environment::Any || declared == Environment::Any || *self == declared
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed metadata of one mod. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub id: String,
    pub version: Version,
    pub name: Option<String>,
    pub description: Option<String>,
    pub environment: Environment,
    pub depends: Vec<Link>,
    pub recommends: Vec<Link>,
    pub conflicts: Vec<Link>,
    pub breaks: Vec<Link>,
    /// Nested archive entries, relative to the containing root
    pub nested: Vec<String>,
    pub schema_version: u32,
}

impl PackageMetadata {
    pub fn new(id: impl Into<String>, version: &str) -> Self {
        Self {
            id: id.into(),
            version: Version::parse(version),
            name: None,
            description: None,
            environment: Environment::Any,
            depends: Vec::new(),
            recommends: Vec::new(),
            conflicts: Vec::new(),
            breaks: Vec::new(),
            nested: Vec::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Add a relationship, filed under its kind
    pub fn with_link(mut self, link: Link) -> Self {
        self.links_mut(link.kind).push(link);
        self
    }

    pub fn with_nested(mut self, entry: impl Into<String>) -> Self {
        self.nested.push(entry.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn links(&self, kind: LinkKind) -> &[Link] {
        match kind {
            LinkKind::Depends => &self.depends,
            LinkKind::Recommends => &self.recommends,
            LinkKind::Conflicts => &self.conflicts,
            LinkKind::Breaks => &self.breaks,
        }
    }

    fn links_mut(&mut self, kind: LinkKind) -> &mut Vec<Link> {
        match kind {
            LinkKind::Depends => &mut self.depends,
            LinkKind::Recommends => &mut self.recommends,
            LinkKind::Conflicts => &mut self.conflicts,
            LinkKind::Breaks => &mut self.breaks,
        }
    }

    /// `id@version`
    pub fn pretty_string(&self) -> String {
        format!("{}@{}", self.id, self.version)
    }
}

impl fmt::Display for PackageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_allows() {
        assert!(Environment::Any.allows(Environment::Client));
        assert!(Environment::Server.allows(Environment::Any));
        assert!(Environment::Client.allows(Environment::Client));
        assert!(!Environment::Client.allows(Environment::Server));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("Client"), Some(Environment::Client));
        assert_eq!(Environment::parse("*"), Some(Environment::Any));
        assert_eq!(Environment::parse("both"), None);
    }

    #[test]
    fn test_with_link_files_by_kind() {
        let metadata = PackageMetadata::new("a", "1.0")
            .with_link(Link::parse("a", "b", &["*"], LinkKind::Depends).unwrap())
            .with_link(Link::parse("a", "c", &["*"], LinkKind::Breaks).unwrap());
        assert_eq!(metadata.depends.len(), 1);
        assert_eq!(metadata.breaks.len(), 1);
        assert!(metadata.links(LinkKind::Recommends).is_empty());
        assert_eq!(metadata.to_string(), "a@1.0");
    }
}
