use crate::domain::{CommandExecutionError, ContainerRuntime, DetachedRun, DisposableRun};
use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

pub const DEFAULT_ENGINE: &str = "docker";

/// A program plus its argument vector. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Runs to completion with inherited stdio
    pub fn run(&self) -> Result<(), CommandExecutionError> {
        debug!("executando: {self}");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| {
                warn!("não foi possível executar {:?}: {e}", self.program);
                CommandExecutionError::new(self.to_string(), None)
            })?;

        if status.success() {
            return Ok(());
        }

        Err(CommandExecutionError::new(self.to_string(), status.code()))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// [`ContainerRuntime`] backed by the docker CLI (or a compatible engine)
#[derive(Debug, Clone)]
pub struct DockerAdapter {
    engine: String,
}

impl DockerAdapter {
    pub fn new() -> Self {
        Self::with_engine(DEFAULT_ENGINE)
    }

    pub fn with_engine(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
        }
    }

    fn engine(&self) -> Invocation {
        Invocation::new(&self.engine)
    }

    pub fn run_detached_invocation(&self, spec: &DetachedRun) -> Invocation {
        let mut inv = self.engine().args(["run", "-d"]);

        for port in &spec.ports {
            inv = inv.arg("-p").arg(port);
        }

        inv = inv.arg("--name").arg(&spec.name);

        for volume in &spec.volumes {
            inv = inv.arg("-v").arg(volume);
        }

        inv.arg(&spec.image)
    }

    pub fn run_disposable_invocation(&self, spec: &DisposableRun) -> Invocation {
        let mut inv = self.engine().args(["run", "--rm"]);

        for link in &spec.links {
            inv = inv.arg("--link").arg(link.to_string());
        }

        inv.arg(&spec.image)
    }

    pub fn build_invocation(&self, tag: &str, build_file: &Path, context_dir: &Path) -> Invocation {
        self.engine()
            .args(["build", "-f"])
            .arg(build_file)
            .args(["-t", tag])
            .arg(context_dir)
    }
}

impl Default for DockerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for DockerAdapter {
    fn run_detached(&self, spec: &DetachedRun) -> Result<()> {
        self.run_detached_invocation(spec).run()?;
        Ok(())
    }

    fn run_disposable(&self, spec: &DisposableRun) -> Result<()> {
        self.run_disposable_invocation(spec).run()?;
        Ok(())
    }

    fn stop_container(&self, name: &str) -> Result<()> {
        self.engine().args(["stop", name]).run()?;
        Ok(())
    }

    fn remove_container(&self, name: &str) -> Result<()> {
        if let Err(e) = self.engine().args(["rm", name]).run() {
            // `No such container` is expected when nothing was left behind
            warn!("  Não foi possível remover {name} (pode não existir): {e}");
        }

        Ok(())
    }

    fn build_image(&self, tag: &str, build_file: &Path, context_dir: &Path) -> Result<()> {
        self.build_invocation(tag, build_file, context_dir).run()?;
        Ok(())
    }
}
