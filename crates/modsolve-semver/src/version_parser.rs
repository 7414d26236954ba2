//! Parser for version-range predicates

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::constraint::{Constraint, Operator, VersionPredicate};
use crate::{SemanticVersion, Version};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParserError {
    #[error("Invalid version constraint \"{0}\"")]
    InvalidConstraint(String),

    #[error("Empty alternative in version constraint \"{0}\"")]
    EmptyAlternative(String),

    #[error("Could not parse version \"{version}\" in constraint \"{constraint}\": a semantic version is required")]
    NotSemantic { constraint: String, version: String },
}

lazy_static! {
    // OR constraint splitter
    static ref OR_CONSTRAINT_RE: Regex = Regex::new(r"\s*\|\|\s*").unwrap();

    // Whole-version wildcards: *, x, X, *.*
    static ref WILDCARD_RE: Regex = Regex::new(r"^v?[xX*](?:\.[xX*])*$").unwrap();

    // Partial wildcards: 1.x, 1.2.*, 1.x.x
    static ref X_RANGE_RE: Regex = Regex::new(r"^v?(\d+(?:\.\d+)*)(?:\.[xX*])+$").unwrap();
}

/// Parses predicate expressions into [`VersionPredicate`] values.
///
/// Grammar: alternatives separated by `||`; inside an alternative, terms
/// separated by whitespace or commas are ANDed. A term is `*`, an operator
/// followed by a version, a caret or tilde range, a wildcard range such as
/// `1.2.x`, or a bare version meaning equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionParser;

impl VersionParser {
    pub fn new() -> Self {
        VersionParser
    }

    /// Parse a full predicate expression
    pub fn parse_predicate(&self, input: &str) -> Result<VersionPredicate, VersionParserError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(VersionPredicate::Any);
        }

        let mut alternatives = Vec::new();
        for alternative in OR_CONSTRAINT_RE.split(input) {
            let alternative = alternative.trim();
            if alternative.is_empty() {
                return Err(VersionParserError::EmptyAlternative(input.to_string()));
            }
            alternatives.push(self.parse_conjunction(alternative)?);
        }

        if alternatives.iter().any(VersionPredicate::is_any) {
            return Ok(VersionPredicate::Any);
        }

        Ok(VersionPredicate::any_of(alternatives))
    }

    fn parse_conjunction(&self, input: &str) -> Result<VersionPredicate, VersionParserError> {
        let mut predicates = Vec::new();
        for term in tokenize(input) {
            predicates.extend(self.parse_term(&term)?);
        }
        Ok(VersionPredicate::all_of(predicates))
    }

    fn parse_term(&self, term: &str) -> Result<Vec<VersionPredicate>, VersionParserError> {
        if WILDCARD_RE.is_match(term) {
            return Ok(vec![VersionPredicate::Any]);
        }

        if let Some(rest) = term.strip_prefix('^') {
            let version = require_semantic(term, rest)?;
            // ^1.2 stays on major 1; ^0.3 stays on minor 0.3
            let index = if version.component(0) != 0 || version.components().len() == 1 {
                0
            } else {
                1
            };
            return Ok(range(version, index));
        }

        if let Some(rest) = term.strip_prefix("~>").or_else(|| term.strip_prefix('~')) {
            let version = require_semantic(term, rest)?;
            let index = if version.components().len() == 1 { 0 } else { 1 };
            return Ok(range(version, index));
        }

        for op in Operator::supported_operators() {
            if let Some(rest) = term.strip_prefix(op) {
                let rest = rest.trim();
                if rest.is_empty() || WILDCARD_RE.is_match(rest) || X_RANGE_RE.is_match(rest) {
                    return Err(VersionParserError::InvalidConstraint(term.to_string()));
                }
                let operator = Operator::parse(op)
                    .map_err(|_| VersionParserError::InvalidConstraint(term.to_string()))?;
                return Ok(vec![Constraint::new(operator, Version::parse(rest)).into()]);
            }
        }

        if let Some(caps) = X_RANGE_RE.captures(term) {
            let version = require_semantic(term, &caps[1])?;
            let index = version.components().len() - 1;
            return Ok(range(version, index));
        }

        if term.contains(|c: char| matches!(c, '*' | '^' | '~' | '|')) {
            return Err(VersionParserError::InvalidConstraint(term.to_string()));
        }

        Ok(vec![Constraint::new(Operator::Equal, Version::parse(term)).into()])
    }
}

/// Split a conjunction into terms, gluing a bare operator to the version after it
fn tokenize(input: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut pending: Option<String> = None;

    for token in input.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let token = match pending.take() {
            Some(op) => format!("{}{}", op, token),
            None => token.to_string(),
        };
        let is_bare_operator = Operator::supported_operators().contains(&token.as_str())
            || matches!(token.as_str(), "^" | "~" | "~>");
        if is_bare_operator {
            pending = Some(token);
        } else {
            terms.push(token);
        }
    }

    // a trailing operator is kept so that parsing reports it
    if let Some(op) = pending {
        terms.push(op);
    }

    terms
}

fn require_semantic(term: &str, version: &str) -> Result<SemanticVersion, VersionParserError> {
    SemanticVersion::parse(version).ok_or_else(|| VersionParserError::NotSemantic {
        constraint: term.to_string(),
        version: version.to_string(),
    })
}

/// `>=version <version.bumped(index)`
fn range(version: SemanticVersion, index: usize) -> Vec<VersionPredicate> {
    let upper = version.bumped(index);
    vec![
        Constraint::new(Operator::GreaterThanOrEqual, Version::Semantic(version)).into(),
        Constraint::new(Operator::LessThan, Version::Semantic(upper)).into(),
    ]
}
