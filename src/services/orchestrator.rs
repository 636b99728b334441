use crate::domain::{
    ContainerRuntime, DataInitDefinition, DatabaseMigrator, ELASTIC, REDIS, STORAGE_PROVIDER,
    ServiceDescriptor,
};
use crate::infra::{DefinitionDiscovery, RunLock, Settings};
use crate::services::{DataInitRunner, ServiceCleaner, ServiceLauncher};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Auxiliary containers managed here, in start and teardown order.
/// The database comes last and is owned by the [`DatabaseMigrator`].
pub const AUXILIARY_SERVICES: [ServiceDescriptor; 3] = [STORAGE_PROVIDER, ELASTIC, REDIS];

/// Bootstraps the auxiliary services, seeds every data-init and tears
/// everything down again
pub struct DataInitOrchestrator {
    launcher: ServiceLauncher,
    cleaner: ServiceCleaner,
    database: Arc<dyn DatabaseMigrator>,
    runner: DataInitRunner,
    root: PathBuf,
}

impl DataInitOrchestrator {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        database: Arc<dyn DatabaseMigrator>,
        settings: &Settings,
    ) -> Self {
        Self {
            launcher: ServiceLauncher::new(runtime.clone(), settings),
            cleaner: ServiceCleaner::new(runtime.clone()),
            runner: DataInitRunner::new(runtime, settings, database.container_name()),
            database,
            root: settings.root.clone(),
        }
    }

    /// Full cycle: storage, search, cache, database, data-inits, teardown.
    ///
    /// Teardown runs on every exit path; the first failure is returned
    /// after it.
    pub fn run_data_init(&self) -> Result<()> {
        let _lock = RunLock::acquire(&self.root)?;
        let _teardown = TeardownGuard { orchestrator: self };

        self.start_services()?;
        info!("Todos os serviços prontos, seguindo...");

        self.seed()?;
        info!("Data-inits concluídos");

        Ok(())
    }

    /// Lists the data-init definitions under the root
    pub fn discover(&self) -> Result<Vec<DataInitDefinition>> {
        DefinitionDiscovery::new(&self.root)?.discover_all()
    }

    /// Best-effort stop and removal of all four auxiliary services
    pub fn teardown(&self) {
        info!("Encerrando serviços auxiliares...");

        for svc in &AUXILIARY_SERVICES {
            match self.cleaner.stop_and_remove(svc.container_name) {
                Ok(_) => debug!("{} removido", svc.container_name),
                Err(e) => error!("Falha ao remover {}: {}", svc.container_name, e),
            }
        }

        match self.database.stop_and_clean() {
            Ok(_) => debug!("{} removido", self.database.container_name()),
            Err(e) => error!(
                "Falha ao remover {}: {}",
                self.database.container_name(),
                e
            ),
        }
    }

    fn start_services(&self) -> Result<()> {
        for svc in &AUXILIARY_SERVICES {
            self.launcher.start_service(svc)?;
        }

        self.database.start()
    }

    fn seed(&self) -> Result<()> {
        let discovery = DefinitionDiscovery::new(&self.root)?;
        let definitions = discovery.discover_all()?;
        info!(
            "{} data-init(s) encontrado(s) em {:?}",
            definitions.len(),
            discovery.base_dir()
        );

        for definition in &definitions {
            self.runner.build_and_run(definition)?;
        }

        Ok(())
    }
}

struct TeardownGuard<'a> {
    orchestrator: &'a DataInitOrchestrator,
}

impl Drop for TeardownGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.teardown();
    }
}
