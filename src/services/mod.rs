mod data_init_runner;
mod database;
mod orchestrator;
mod service_cleaner;
mod service_launcher;

pub use data_init_runner::{DataInitRunner, StagedBuildFile};
pub use database::ContainerDatabase;
pub use orchestrator::{AUXILIARY_SERVICES, DataInitOrchestrator};
pub use service_cleaner::ServiceCleaner;
pub use service_launcher::ServiceLauncher;
