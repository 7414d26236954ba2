use crate::package::{Origin, PackageMetadata};

/// A package contributed by the host instead of being scanned
#[derive(Debug, Clone)]
pub struct BuiltinPackage {
    pub metadata: PackageMetadata,
    pub origin: Origin,
}

impl BuiltinPackage {
    pub fn new(metadata: PackageMetadata) -> Self {
        let origin = Origin::builtin(&metadata.id);
        Self { metadata, origin }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}
