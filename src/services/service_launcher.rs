use crate::domain::{ContainerRuntime, ServiceDescriptor};
use crate::infra::{Readiness, Settings};
use crate::services::ServiceCleaner;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound for the doubling wait between checker retries
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Starts auxiliary service containers and waits for their checker to pass
pub struct ServiceLauncher {
    runtime: Arc<dyn ContainerRuntime>,
    cleaner: ServiceCleaner,
    root: PathBuf,
    readiness: Readiness,
}

impl ServiceLauncher {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, settings: &Settings) -> Self {
        Self {
            cleaner: ServiceCleaner::new(runtime.clone()),
            runtime,
            root: settings.root.clone(),
            readiness: settings.readiness,
        }
    }

    /// Pre-cleans any leftover container with the same name, launches the
    /// service in the background and blocks until its checker succeeds.
    pub fn start_service(&self, svc: &ServiceDescriptor) -> Result<()> {
        if let Err(e) = self.cleaner.stop_and_remove(svc.container_name) {
            warn!(
                "  Problema ao limpar {}, seguindo em frente: {}",
                svc.container_name, e
            );
        }

        if let Some(mount) = svc.mount {
            let host_dir = self.root.join(mount.host_dir);
            fs::create_dir_all(&host_dir).with_context(|| format!("criando {:?}", host_dir))?;
        }

        info!("Iniciando {} ({})...", svc.alias, svc.image);
        self.runtime.run_detached(&svc.to_detached_run(&self.root))?;

        self.wait_until_ready(svc)
    }

    /// Runs the service's checker container once
    pub fn check(&self, svc: &ServiceDescriptor) -> Result<()> {
        self.runtime.run_disposable(&svc.to_checker_run())
    }

    fn wait_until_ready(&self, svc: &ServiceDescriptor) -> Result<()> {
        match self.readiness {
            Readiness::FixedDelay(delay) => {
                info!("Aguardando {} subir ({:?})", svc.alias, delay);
                thread::sleep(delay);
                self.check(svc)
            }
            Readiness::Poll {
                delay,
                interval,
                retries,
            } => {
                info!("Aguardando {} subir (até {} nova(s) tentativa(s))", svc.alias, retries);
                thread::sleep(delay);

                let mut remaining = retries;
                let mut wait = interval;
                loop {
                    match self.check(svc) {
                        Ok(()) => {
                            debug!("{} respondeu ao checker", svc.alias);
                            return Ok(());
                        }
                        Err(e) if remaining == 0 => return Err(e),
                        Err(e) => {
                            warn!("{} ainda não está pronto: {}", svc.alias, e);
                            remaining -= 1;
                            thread::sleep(wait);
                            wait = next_backoff(wait);
                        }
                    }
                }
            }
        }
    }
}

/// Doubles `current`, capped at [`MAX_POLL_INTERVAL`]
fn next_backoff(current: Duration) -> Duration {
    current.saturating_mul(2).min(MAX_POLL_INTERVAL)
}
