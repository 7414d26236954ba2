use std::fmt;

use super::pool::PackageId;
use crate::package::Link;

/// A literal in SAT terms - positive means "select", negative means "don't select"
pub type Literal = i32;

/// Types of rules generated during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// A mandatory id must have one of its candidates selected
    RequireOne,
    /// Two candidates of the same id cannot both be selected
    SameName,
    /// If A is selected, one of the candidates satisfying its dependency must be
    PackageRequires,
    /// A and a candidate it breaks cannot both be selected
    PackageBreaks,
}

/// A SAT rule (clause): satisfied when at least one literal is true.
///
/// - `[A, B]` - one of A or B must be selected
/// - `[-A]` - A must not be selected
/// - `[-A, B, C]` - if A is selected, then B or C must be
/// - `[-A, -B]` - A and B cannot both be selected
#[derive(Clone)]
pub struct Rule {
    literals: Vec<Literal>,
    rule_type: RuleType,
    /// Assigned by RuleSet
    id: u32,
    /// Candidate whose link produced the rule
    source_package: Option<PackageId>,
    /// Mod id the rule is about
    target_name: Option<String>,
    /// Link as declared, for package rules
    link: Option<Link>,
}

impl Rule {
    pub fn new(literals: Vec<Literal>, rule_type: RuleType) -> Self {
        Self {
            literals,
            rule_type,
            id: 0,
            source_package: None,
            target_name: None,
            link: None,
        }
    }

    /// One of these candidates must be selected
    pub fn require_one(packages: Vec<PackageId>) -> Self {
        Self::new(packages, RuleType::RequireOne)
    }

    /// These two candidates cannot both be selected
    pub fn same_name(a: PackageId, b: PackageId) -> Self {
        Self::new(vec![-a, -b], RuleType::SameName)
    }

    /// If source is selected, one of targets must be; with no targets the source is excluded
    pub fn requires(source: PackageId, targets: Vec<PackageId>) -> Self {
        let mut literals = vec![-source];
        literals.extend(targets);
        Self::new(literals, RuleType::PackageRequires).with_source(source)
    }

    /// Source and target cannot both be selected
    pub fn breaks(source: PackageId, target: PackageId) -> Self {
        Self::new(vec![-source, -target], RuleType::PackageBreaks).with_source(source)
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn with_source(mut self, package: PackageId) -> Self {
        self.source_package = Some(package);
        self
    }

    pub fn with_target(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Attach the link the rule encodes; its target becomes the rule's target
    pub fn with_link(mut self, link: &Link) -> Self {
        self.target_name = Some(link.target.clone());
        self.link = Some(link.clone());
        self
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn source_package(&self) -> Option<PackageId> {
        self.source_package
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    /// Single-literal clause
    pub fn is_assertion(&self) -> bool {
        self.literals.len() == 1
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("type", &self.rule_type)
            .field("literals", &self.literals)
            .finish()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literals: Vec<String> = self.literals.iter().map(|l| l.to_string()).collect();
        write!(f, "({})", literals.join(" | "))
    }
}
