//! Mod metadata, relationships and discovered candidates

mod candidate;
mod link;
mod metadata;
mod parser;

pub use candidate::{Candidate, CandidateSet, Origin};
pub use link::{Link, LinkKind};
pub use metadata::{Environment, PackageMetadata, CURRENT_SCHEMA_VERSION};
pub use parser::{MetadataParser, SchemaError};
