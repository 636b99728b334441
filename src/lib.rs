pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    CommandExecutionError, ContainerRuntime, DataInitDefinition, DatabaseMigrator,
    ServiceDescriptor,
};
pub use infra::{DockerAdapter, Settings};
pub use services::{ContainerDatabase, DataInitOrchestrator};
