//! The bundled `mod.json` metadata format

mod loader;
mod schema;

pub use loader::{parse_mod_json, JsonMetadataParser};
pub use schema::{ModJson, NestedJar, PredicateList};
