use std::io::Read;

use thiserror::Error;

use super::PackageMetadata;

/// Malformed metadata, reported without the origin; discovery attaches it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SchemaError {
    pub message: String,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a metadata stream into zero or more parsed mods
pub trait MetadataParser: Send + Sync {
    fn parse(&self, reader: &mut dyn Read) -> Result<Vec<PackageMetadata>, SchemaError>;
}
