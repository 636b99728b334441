use crate::domain::{ContainerRuntime, DatabaseMigrator, POSTGRES, ServiceDescriptor};
use crate::infra::Settings;
use crate::services::{ServiceCleaner, ServiceLauncher};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// Postgres provisioned as one more auxiliary container
pub struct ContainerDatabase {
    descriptor: ServiceDescriptor,
    launcher: ServiceLauncher,
    cleaner: ServiceCleaner,
}

impl ContainerDatabase {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, settings: &Settings) -> Self {
        Self::with_descriptor(runtime, settings, POSTGRES)
    }

    pub fn with_descriptor(
        runtime: Arc<dyn ContainerRuntime>,
        settings: &Settings,
        descriptor: ServiceDescriptor,
    ) -> Self {
        Self {
            descriptor,
            launcher: ServiceLauncher::new(runtime.clone(), settings),
            cleaner: ServiceCleaner::new(runtime),
        }
    }
}

impl fmt::Debug for ContainerDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerDatabase")
            .field("container", &self.descriptor.container_name)
            .finish()
    }
}

impl DatabaseMigrator for ContainerDatabase {
    fn start(&self) -> Result<()> {
        self.launcher.start_service(&self.descriptor)
    }

    fn stop_and_clean(&self) -> Result<()> {
        self.cleaner.stop_and_remove(self.descriptor.container_name)
    }

    fn container_name(&self) -> &str {
        self.descriptor.container_name
    }
}
