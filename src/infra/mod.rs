pub mod config;
pub mod definition_discovery;
pub mod docker_adapter;
pub mod run_lock;

pub use config::{Readiness, Settings, load_settings};
pub use definition_discovery::DefinitionDiscovery;
pub use docker_adapter::{DockerAdapter, Invocation};
pub use run_lock::RunLock;
