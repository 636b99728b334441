use crate::domain::{
    CommandExecutionError, ContainerRuntime, DatabaseMigrator, DetachedRun, DisposableRun, Link,
    POSTGRES,
};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockState {
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct MockContainer {
    pub image: String,
    pub state: MockState,
}

/// What the mock saw when an image was built
#[derive(Debug, Clone)]
pub struct MockBuild {
    pub tag: String,
    pub build_file: PathBuf,
    pub context_dir: PathBuf,
    /// Whether the build file existed at the moment of the build
    pub build_file_present: bool,
}

/// In-memory [`ContainerRuntime`] recording every call as `op:subject`.
///
/// Recorded forms: `run_detached:<name>`, `run:<image>`, `stop:<name>`,
/// `remove:<name>`, `build_image:<tag>`.
#[derive(Debug)]
pub struct MockRuntime {
    containers: RwLock<HashMap<String, MockContainer>>,
    commands: RwLock<Vec<String>>,
    builds: RwLock<Vec<MockBuild>>,
    last_links: RwLock<Vec<Link>>,
    fail_on: RwLock<Option<String>>,
    fail_budget: RwLock<HashMap<String, u32>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            commands: RwLock::new(Vec::new()),
            builds: RwLock::new(Vec::new()),
            last_links: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
            fail_budget: RwLock::new(HashMap::new()),
        }
    }

    /// Fails every call whose operation (`stop`, `run`, ...) or full
    /// recorded command (`run:redis-checker`) equals `target`
    pub fn set_fail_on(&self, target: &str) {
        *self.fail_on.write().unwrap() = Some(target.to_string());
    }

    /// Fails the exact recorded `command` for its next `times` calls
    pub fn fail_times(&self, command: &str, times: u32) {
        self.fail_budget
            .write()
            .unwrap()
            .insert(command.to_string(), times);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    pub fn count_commands(&self, command: &str) -> usize {
        self.commands
            .read()
            .unwrap()
            .iter()
            .filter(|c| *c == command)
            .count()
    }

    pub fn get_builds(&self) -> Vec<MockBuild> {
        self.builds.read().unwrap().clone()
    }

    /// Links passed to the most recent disposable run
    pub fn last_links(&self) -> Vec<Link> {
        self.last_links.read().unwrap().clone()
    }

    pub fn container_exists(&self, name: &str) -> bool {
        self.containers.read().unwrap().contains_key(name)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.containers
            .read()
            .unwrap()
            .get(name)
            .is_some_and(|c| c.state == MockState::Running)
    }

    pub fn running_containers(&self) -> Vec<String> {
        self.containers
            .read()
            .unwrap()
            .iter()
            .filter(|(_, c)| c.state == MockState::Running)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    pub fn check_fail(&self, operation: &str, cmd: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation || fail_on == cmd {
                return Err(CommandExecutionError::new(cmd, Some(1)).into());
            }
        }

        if let Some(remaining) = self.fail_budget.write().unwrap().get_mut(cmd) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CommandExecutionError::new(cmd, Some(1)).into());
            }
        }

        Ok(())
    }

    fn call(&self, operation: &str, subject: &str) -> Result<String> {
        let cmd = format!("{operation}:{subject}");
        self.record_command(&cmd);
        self.check_fail(operation, &cmd)?;
        Ok(cmd)
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn run_detached(&self, spec: &DetachedRun) -> Result<()> {
        let cmd = self.call("run_detached", &spec.name)?;

        let mut containers = self.containers.write().unwrap();
        if containers.contains_key(&spec.name) {
            // name already in use
            return Err(CommandExecutionError::new(cmd, Some(125)).into());
        }

        containers.insert(
            spec.name.clone(),
            MockContainer {
                image: spec.image.clone(),
                state: MockState::Running,
            },
        );
        Ok(())
    }

    fn run_disposable(&self, spec: &DisposableRun) -> Result<()> {
        *self.last_links.write().unwrap() = spec.links.clone();
        self.call("run", &spec.image)?;
        Ok(())
    }

    fn stop_container(&self, name: &str) -> Result<()> {
        let cmd = self.call("stop", name)?;

        match self.containers.write().unwrap().get_mut(name) {
            Some(container) => {
                container.state = MockState::Stopped;
                Ok(())
            }
            None => Err(CommandExecutionError::new(cmd, Some(1)).into()),
        }
    }

    fn remove_container(&self, name: &str) -> Result<()> {
        self.call("remove", name)?;
        self.containers.write().unwrap().remove(name);
        Ok(())
    }

    fn build_image(&self, tag: &str, build_file: &Path, context_dir: &Path) -> Result<()> {
        self.builds.write().unwrap().push(MockBuild {
            tag: tag.to_string(),
            build_file: build_file.to_path_buf(),
            context_dir: context_dir.to_path_buf(),
            build_file_present: build_file.exists(),
        });
        self.call("build_image", tag)?;
        Ok(())
    }
}

/// [`DatabaseMigrator`] that records `db_start:<name>` / `db_stop:<name>`
/// into the same log as the [`MockRuntime`] it wraps
#[derive(Debug)]
pub struct MockDatabase {
    runtime: Arc<MockRuntime>,
    name: String,
}

impl MockDatabase {
    pub fn new(runtime: Arc<MockRuntime>) -> Self {
        Self::with_name(runtime, POSTGRES.container_name)
    }

    pub fn with_name(runtime: Arc<MockRuntime>, name: &str) -> Self {
        Self {
            runtime,
            name: name.to_string(),
        }
    }
}

impl DatabaseMigrator for MockDatabase {
    fn start(&self) -> Result<()> {
        self.runtime.call("db_start", &self.name)?;
        Ok(())
    }

    fn stop_and_clean(&self) -> Result<()> {
        self.runtime.call("db_stop", &self.name)?;
        Ok(())
    }

    fn container_name(&self) -> &str {
        &self.name
    }
}
