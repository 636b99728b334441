mod container;
pub mod definition;
mod error;
pub mod service;
pub mod traits;

pub use container::{DetachedRun, DisposableRun, Link};
pub use definition::{BUILD_FILE, DATA_INITS_DIR, DEFAULT_IMAGE_REPO, DataInitDefinition};
pub use error::CommandExecutionError;
pub use service::{ELASTIC, Mount, POSTGRES, REDIS, STORAGE_PROVIDER, ServiceDescriptor};
pub use traits::{ContainerRuntime, DatabaseMigrator};
