//! Version parsing and version-range predicates
//!
//! Mod metadata declares a version string and relationships guarded by
//! version predicates. Versions that follow the semantic scheme are compared
//! by order; anything else is an opaque string that only matches by equality.

pub mod constraint;
mod version;
mod version_parser;

pub use constraint::{Constraint, MultiConstraint, Operator, VersionPredicate};
pub use version::{SemanticVersion, Version};
pub use version_parser::{VersionParser, VersionParserError};
