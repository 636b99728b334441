use super::{DetachedRun, DisposableRun};
use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// Trait for container engine operations.
///
/// Every method maps to exactly one engine command; a non-zero exit is
/// reported as a [`CommandExecutionError`](super::CommandExecutionError)
/// wrapped in the returned error.
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Start a named container in the background
    fn run_detached(&self, spec: &DetachedRun) -> Result<()>;

    /// Run a container to completion and discard it
    fn run_disposable(&self, spec: &DisposableRun) -> Result<()>;

    /// Stop a container
    fn stop_container(&self, name: &str) -> Result<()>;

    /// Remove a container
    fn remove_container(&self, name: &str) -> Result<()>;

    /// Build an image
    fn build_image(&self, tag: &str, build_file: &Path, context_dir: &Path) -> Result<()>;
}

/// The relational database the data-inits migrate against.
///
/// Kept behind a trait so the orchestrator does not care how the database
/// is provisioned.
pub trait DatabaseMigrator: Send + Sync + Debug {
    /// Start the database and wait until it accepts connections
    fn start(&self) -> Result<()>;

    /// Stop and remove the database container; must tolerate it being absent
    fn stop_and_clean(&self) -> Result<()>;

    /// Container name data-inits link to as `postgres`
    fn container_name(&self) -> &str;
}
