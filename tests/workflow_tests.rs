use anyhow::Result;
use datainit::domain::{BUILD_FILE, DATA_INITS_DIR};
use datainit::infra::{Readiness, Settings};
use datainit::services::{ContainerDatabase, DataInitOrchestrator};
use datainit::test_support::{MockDatabase, MockRuntime};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn create_orchestrator(root: &Path) -> (DataInitOrchestrator, Arc<MockRuntime>) {
    let mock = Arc::new(MockRuntime::new());
    let database = Arc::new(MockDatabase::new(mock.clone()));
    let settings = Settings::with_root(root).with_readiness(Readiness::FixedDelay(Duration::ZERO));
    let orchestrator = DataInitOrchestrator::new(mock.clone(), database, &settings);
    (orchestrator, mock)
}

fn add_definition(root: &Path, definition: &str) -> Result<()> {
    let source = root.join(DATA_INITS_DIR).join(definition);
    fs::create_dir_all(&source)?;
    fs::write(source.join(BUILD_FILE), "FROM alpine\nCMD [\"seed\"]\n")?;
    fs::create_dir_all(root.join(definition))?;
    Ok(())
}

fn bootstrap_sequence() -> Vec<String> {
    [
        "stop:storageprovider-init",
        "remove:storageprovider-init",
        "run_detached:storageprovider-init",
        "run:beeldbank-dev/storageprovider-checker:latest",
        "stop:beeldbank-elastic-init",
        "remove:beeldbank-elastic-init",
        "run_detached:beeldbank-elastic-init",
        "run:beeldbank-dev/elastic-checker:latest",
        "stop:beeldbank-redis-init",
        "remove:beeldbank-redis-init",
        "run_detached:beeldbank-redis-init",
        "run:beeldbank-dev/redis-checker:latest",
        "db_start:beeldbank-postgres-init",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn teardown_sequence() -> Vec<String> {
    [
        "stop:storageprovider-init",
        "remove:storageprovider-init",
        "stop:beeldbank-elastic-init",
        "remove:beeldbank-elastic-init",
        "stop:beeldbank-redis-init",
        "remove:beeldbank-redis-init",
        "db_stop:beeldbank-postgres-init",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn test_workflow_full_cycle_order() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    add_definition(root, "users")?;
    add_definition(root, "assets/images")?;
    add_definition(root, "assets/videos")?;

    let (orchestrator, mock) = create_orchestrator(root);
    let discovered = orchestrator.discover()?;
    assert_eq!(discovered.len(), 3);

    orchestrator.run_data_init()?;

    let mut expected = bootstrap_sequence();
    for definition in &discovered {
        let tag = definition.image_tag("beeldbank-dev");
        expected.push(format!("build_image:{tag}"));
        expected.push(format!("run:{tag}"));
    }
    expected.extend(teardown_sequence());

    assert_eq!(mock.get_commands(), expected);

    // every staged build file existed during its build and is gone afterwards
    let builds = mock.get_builds();
    assert_eq!(builds.len(), 3);
    for build in &builds {
        assert!(build.build_file_present, "{} built without its file", build.tag);
        assert!(!build.build_file.exists());
    }

    assert!(mock.running_containers().is_empty());

    Ok(())
}

#[test]
fn test_workflow_without_definitions() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join(DATA_INITS_DIR))?;

    let (orchestrator, mock) = create_orchestrator(root);
    orchestrator.run_data_init()?;

    let mut expected = bootstrap_sequence();
    expected.extend(teardown_sequence());
    assert_eq!(mock.get_commands(), expected);

    Ok(())
}

#[test]
fn test_workflow_creates_mount_dirs() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join(DATA_INITS_DIR))?;

    let (orchestrator, _mock) = create_orchestrator(root);
    orchestrator.run_data_init()?;

    assert!(root.join("data/storageprovider").is_dir());
    assert!(root.join("data/elastic").is_dir());

    Ok(())
}

#[test]
fn test_workflow_rerun_after_leftovers() -> Result<()> {
    // containers left behind by a crashed run are cleaned before start
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    add_definition(root, "users")?;

    let (orchestrator, mock) = create_orchestrator(root);
    orchestrator.run_data_init()?;
    orchestrator.run_data_init()?;

    assert_eq!(mock.count_commands("build_image:beeldbank-dev/users-migration:latest"), 2);
    assert!(mock.running_containers().is_empty());

    Ok(())
}

#[test]
fn test_workflow_with_container_database() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    add_definition(root, "users")?;

    let mock = Arc::new(MockRuntime::new());
    let settings = Settings::with_root(root).with_readiness(Readiness::FixedDelay(Duration::ZERO));
    let database = Arc::new(ContainerDatabase::new(mock.clone(), &settings));
    let orchestrator = DataInitOrchestrator::new(mock.clone(), database, &settings);

    orchestrator.run_data_init()?;

    let mut expected = bootstrap_sequence();
    expected.pop();
    expected.extend(
        [
            "stop:beeldbank-postgres-init",
            "remove:beeldbank-postgres-init",
            "run_detached:beeldbank-postgres-init",
            "run:beeldbank-dev/postgres-checker:latest",
            "build_image:beeldbank-dev/users-migration:latest",
            "run:beeldbank-dev/users-migration:latest",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    let mut teardown = teardown_sequence();
    teardown.pop();
    expected.extend(teardown);
    expected.push("stop:beeldbank-postgres-init".to_string());
    expected.push("remove:beeldbank-postgres-init".to_string());

    let commands = mock.get_commands();
    assert_eq!(commands, expected);

    // postgres is up and checked before the first data-init is built
    let position = |cmd: &str| commands.iter().position(|c| c == cmd).unwrap();
    let first_build = position("build_image:beeldbank-dev/users-migration:latest");
    assert!(
        position("run:beeldbank-dev/redis-checker:latest")
            < position("run_detached:beeldbank-postgres-init")
    );
    assert!(position("run_detached:beeldbank-postgres-init") < first_build);
    assert!(position("run:beeldbank-dev/postgres-checker:latest") < first_build);

    assert!(mock.running_containers().is_empty());

    Ok(())
}
