//! Constraint types for version matching

mod constraint;
mod multi_constraint;
mod operator;
mod predicate;

pub use constraint::Constraint;
pub use multi_constraint::MultiConstraint;
pub use operator::{InvalidOperatorError, Operator};
pub use predicate::VersionPredicate;
