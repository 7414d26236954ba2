//! Mod id validation

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ID_RE: Regex = Regex::new(r"^[a-z][a-z0-9_-]{1,63}$").unwrap();
}

/// Maximum id length, in characters
pub const MAX_ID_LENGTH: usize = 64;

/// One rule an id breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdViolation {
    Empty,
    TooShort,
    TooLong { length: usize },
    InvalidFirstCharacter(char),
    InvalidCharacters(Vec<char>),
}

impl fmt::Display for IdViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdViolation::Empty => write!(f, "it is empty"),
            IdViolation::TooShort => write!(
                f,
                "it is only a single character (it must be at least 2 characters long)"
            ),
            IdViolation::TooLong { .. } => write!(f, "it has more than {} characters", MAX_ID_LENGTH),
            IdViolation::InvalidFirstCharacter(c) => write!(
                f,
                "it starts with an invalid character '{}' (it must be a lowercase a-z letter)",
                c
            ),
            IdViolation::InvalidCharacters(chars) => {
                let listed = chars
                    .iter()
                    .map(|c| format!("'{}'", c))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "it contains invalid characters: {} (it must only consist of a-z, 0-9, - and _)",
                    listed
                )
            }
        }
    }
}

/// An id that failed validation, with every rule it breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIdError {
    pub id: String,
    pub violations: Vec<IdViolation>,
}

impl fmt::Display for InvalidIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        let joined = match clauses.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        };
        write!(
            f,
            "Mod id `{}` does not match the requirements because {}",
            self.id, joined
        )
    }
}

impl std::error::Error for InvalidIdError {}

/// List every rule `id` breaks; empty when the id is valid
pub fn check_id(id: &str) -> Vec<IdViolation> {
    if ID_RE.is_match(id) {
        return Vec::new();
    }

    let mut violations = Vec::new();
    let length = id.chars().count();

    if length == 0 {
        violations.push(IdViolation::Empty);
        return violations;
    }

    if length == 1 {
        violations.push(IdViolation::TooShort);
    } else if length > MAX_ID_LENGTH {
        violations.push(IdViolation::TooLong { length });
    }

    let mut chars = id.chars();
    let mut invalid: Vec<char> = Vec::new();
    if let Some(first) = chars.next() {
        if !first.is_ascii_lowercase() {
            violations.push(IdViolation::InvalidFirstCharacter(first));
        }
    }

    for c in chars {
        let allowed = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_';
        if !allowed && !invalid.contains(&c) {
            invalid.push(c);
        }
    }

    if !invalid.is_empty() {
        violations.push(IdViolation::InvalidCharacters(invalid));
    }

    violations
}

/// Validate an id, failing with the full list of broken rules
pub fn validate_id(id: &str) -> Result<(), InvalidIdError> {
    let violations = check_id(id);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(InvalidIdError {
            id: id.to_string(),
            violations,
        })
    }
}

pub fn is_valid_id(id: &str) -> bool {
    ID_RE.is_match(id)
}
