use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::package::{Environment, CURRENT_SCHEMA_VERSION};

/// Raw `mod.json` document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModJson {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    pub id: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub depends: IndexMap<String, PredicateList>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub recommends: IndexMap<String, PredicateList>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub conflicts: IndexMap<String, PredicateList>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub breaks: IndexMap<String, PredicateList>,

    /// Archives bundled inside this mod
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jars: Vec<NestedJar>,
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// One predicate string or a list of alternatives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateList {
    Single(String),
    Multiple(Vec<String>),
}

impl PredicateList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            PredicateList::Single(s) => std::slice::from_ref(s),
            PredicateList::Multiple(list) => list,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedJar {
    pub file: String,
}
