/// Integration tests for the configuration system
///
/// These tests load `modsolve.json` project files and check that the
/// values reach discovery.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use modsolve::config::{ConfigSource, CONFIG_FILE};
use modsolve::{CandidateFinder, DirectoryCandidateFinder, Environment, ModResolver, ResolverConfig};
use tempfile::TempDir;

#[test]
fn test_project_file_values() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE),
        r#"{"config": {"discovery-timeout": 5, "workers": 2, "environment": "client"}}"#,
    )
    .unwrap();

    let config = ResolverConfig::build(Some(project.path()), false).unwrap();

    assert_eq!(config.discovery_timeout(), Duration::from_secs(5));
    assert_eq!(config.worker_count(), 2);
    assert_eq!(config.environment, Environment::Client);
    assert_eq!(config.get_source("workers"), Some(&ConfigSource::Project));
    assert_eq!(config.get_source("metadata-file"), Some(&ConfigSource::Default));
}

#[test]
fn test_command_overrides_project_file() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE),
        r#"{"config": {"discovery-timeout": 5}}"#,
    )
    .unwrap();

    let mut config = ResolverConfig::build(Some(project.path()), false).unwrap();
    config.set_discovery_timeout(60);

    assert_eq!(config.discovery_timeout, 60);
    assert_eq!(config.get_source("discovery-timeout"), Some(&ConfigSource::Command));
}

#[tokio::test]
async fn test_custom_metadata_file_drives_discovery() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE),
        r#"{"config": {"metadata-file": "quilt.mod.json"}}"#,
    )
    .unwrap();

    let mods = project.path().join("mods");
    fs::create_dir_all(mods.join("a")).unwrap();
    fs::create_dir_all(mods.join("b")).unwrap();
    fs::write(mods.join("a").join("quilt.mod.json"), r#"{"id": "a", "version": "1.0"}"#).unwrap();
    fs::write(mods.join("b").join("mod.json"), r#"{"id": "b", "version": "1.0"}"#).unwrap();

    let config = ResolverConfig::build(Some(project.path()), false).unwrap();
    let resolver = ModResolver::builder().with_config(config).build().unwrap();
    let mut context = resolver.new_context();
    let finders: Vec<Arc<dyn CandidateFinder>> = vec![Arc::new(DirectoryCandidateFinder::new(&mods))];

    let result = resolver.resolve(&mut context, &finders, Vec::new()).await.unwrap();

    assert_eq!(result.ids().collect::<Vec<_>>(), vec!["a"]);
}
