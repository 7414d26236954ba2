use std::io::Read;

use indexmap::IndexMap;
use serde_json::Value;

use super::schema::{ModJson, PredicateList};
use crate::package::{
    Link, LinkKind, MetadataParser, PackageMetadata, SchemaError, CURRENT_SCHEMA_VERSION,
};
use modsolve_semver::Version;

/// Parses `mod.json` streams holding one object or an array of objects
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMetadataParser;

impl JsonMetadataParser {
    pub fn new() -> Self {
        JsonMetadataParser
    }
}

impl MetadataParser for JsonMetadataParser {
    fn parse(&self, reader: &mut dyn Read) -> Result<Vec<PackageMetadata>, SchemaError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| SchemaError::new(format!("Failed to read metadata: {}", e)))?;
        parse_mod_json(&content)
    }
}

/// Parse `mod.json` content
pub fn parse_mod_json(content: &str) -> Result<Vec<PackageMetadata>, SchemaError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| SchemaError::new(format!("Failed to parse JSON: {}", e)))?;

    let documents = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(SchemaError::new(format!(
                "Expected an object or an array of objects, found {}",
                json_type(&other)
            )))
        }
    };

    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            let raw: ModJson = serde_json::from_value(document)
                .map_err(|e| SchemaError::new(format!("Invalid entry #{}: {}", index, e)))?;
            convert(raw)
        })
        .collect()
}

fn convert(raw: ModJson) -> Result<PackageMetadata, SchemaError> {
    if raw.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(SchemaError::new(format!(
            "Mod '{}' uses schema version {}, newest supported is {}",
            raw.id, raw.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }

    let mut metadata = PackageMetadata {
        id: raw.id.clone(),
        version: Version::parse(&raw.version),
        name: raw.name,
        description: raw.description,
        environment: raw.environment,
        depends: convert_links(&raw.id, &raw.depends, LinkKind::Depends)?,
        recommends: convert_links(&raw.id, &raw.recommends, LinkKind::Recommends)?,
        conflicts: convert_links(&raw.id, &raw.conflicts, LinkKind::Conflicts)?,
        breaks: convert_links(&raw.id, &raw.breaks, LinkKind::Breaks)?,
        nested: Vec::with_capacity(raw.jars.len()),
        schema_version: raw.schema_version,
    };

    for jar in raw.jars {
        if jar.file.trim().is_empty() {
            return Err(SchemaError::new(format!(
                "Mod '{}' declares a nested jar without a file",
                metadata.id
            )));
        }
        metadata.nested.push(jar.file);
    }

    Ok(metadata)
}

fn convert_links(
    source: &str,
    links: &IndexMap<String, PredicateList>,
    kind: LinkKind,
) -> Result<Vec<Link>, SchemaError> {
    links
        .iter()
        .map(|(target, predicates)| {
            Link::parse(source, target.as_str(), predicates.as_slice(), kind).map_err(|e| {
                SchemaError::new(format!(
                    "Invalid version predicate for '{}' in {} of '{}': {}",
                    target,
                    kind_key(kind),
                    source,
                    e
                ))
            })
        })
        .collect()
}

fn kind_key(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Depends => "depends",
        LinkKind::Recommends => "recommends",
        LinkKind::Conflicts => "conflicts",
        LinkKind::Breaks => "breaks",
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Environment;

    #[test]
    fn test_parse_single_object() {
        let json = r#"{
            "schemaVersion": 1,
            "id": "examplemod",
            "version": "1.2.0",
            "name": "Example",
            "environment": "client",
            "depends": { "fabric": ">=0.4", "minecraft": ["1.14.x", "1.15.x"] },
            "recommends": { "modmenu": "*" },
            "breaks": { "optifine": "*" },
            "jars": [ { "file": "META-INF/jars/lib.jar" } ]
        }"#;

        let parsed = parse_mod_json(json).unwrap();
        assert_eq!(parsed.len(), 1);
        let metadata = &parsed[0];
        assert_eq!(metadata.id, "examplemod");
        assert_eq!(metadata.version.to_string(), "1.2.0");
        assert_eq!(metadata.name.as_deref(), Some("Example"));
        assert_eq!(metadata.environment, Environment::Client);
        assert_eq!(metadata.depends.len(), 2);
        assert_eq!(metadata.depends[1].target, "minecraft");
        assert!(metadata.depends[1].matches_version(&Version::parse("1.15.2")));
        assert_eq!(metadata.recommends.len(), 1);
        assert_eq!(metadata.breaks[0].kind, LinkKind::Breaks);
        assert_eq!(metadata.nested, vec!["META-INF/jars/lib.jar"]);
    }

    #[test]
    fn test_parse_array_and_defaults() {
        let json = r#"[ { "id": "first", "version": "1" }, { "id": "second", "version": "snapshot" } ]"#;
        let parsed = JsonMetadataParser::new().parse(&mut json.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(parsed[0].environment, Environment::Any);
        assert!(!parsed[1].version.is_semantic());
    }

    #[test]
    fn test_empty_array_yields_nothing() {
        assert!(parse_mod_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_schema_errors() {
        assert!(parse_mod_json("not json").is_err());
        assert!(parse_mod_json("42").is_err());
        assert!(parse_mod_json(r#"{ "version": "1.0" }"#).is_err());
        assert!(parse_mod_json(r#"{ "id": "a", "version": "1", "schemaVersion": 2 }"#).is_err());
        assert!(parse_mod_json(r#"{ "id": "aa", "version": "1", "depends": { "b": ">=" } }"#).is_err());
        assert!(parse_mod_json(r#"{ "id": "aa", "version": "1", "environment": "both" }"#).is_err());
    }

    #[test]
    fn test_schema_version_zero_is_accepted() {
        let parsed = parse_mod_json(r#"{ "id": "old", "version": "1.0", "schemaVersion": 0 }"#).unwrap();
        assert_eq!(parsed[0].schema_version, 0);
    }
}
