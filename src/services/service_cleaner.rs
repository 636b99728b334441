use crate::domain::ContainerRuntime;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Stops and removes auxiliary containers by name
#[derive(Clone)]
pub struct ServiceCleaner {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ServiceCleaner {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    /// Stop followed by remove. A container that is not running (or does
    /// not exist) is not an error; only the remove result is reported.
    pub fn stop_and_remove(&self, name: &str) -> Result<()> {
        if let Err(e) = self.runtime.stop_container(name) {
            debug!("{name} não estava rodando: {e}");
        }

        self.runtime.remove_container(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetachedRun, REDIS};
    use crate::test_support::MockRuntime;
    use std::path::Path;

    #[test]
    fn test_stop_and_remove_running_container() {
        let mock = Arc::new(MockRuntime::new());
        mock.run_detached(&REDIS.to_detached_run(Path::new("/bb")))
            .unwrap();

        let cleaner = ServiceCleaner::new(mock.clone());
        cleaner.stop_and_remove("beeldbank-redis-init").unwrap();

        assert!(!mock.container_exists("beeldbank-redis-init"));
        assert_eq!(
            mock.get_commands()[1..],
            [
                "stop:beeldbank-redis-init".to_string(),
                "remove:beeldbank-redis-init".to_string(),
            ]
        );
    }

    #[test]
    fn test_never_started_container_is_not_an_error() {
        let mock = Arc::new(MockRuntime::new());
        let cleaner = ServiceCleaner::new(mock.clone());

        assert!(cleaner.stop_and_remove("ghost").is_ok());
        assert_eq!(mock.get_commands(), vec!["stop:ghost", "remove:ghost"]);
    }

    #[test]
    fn test_idempotent() {
        let mock = Arc::new(MockRuntime::new());
        mock.run_detached(&DetachedRun {
            name: "pg".to_string(),
            image: "postgres".to_string(),
            ports: vec![],
            volumes: vec![],
        })
        .unwrap();
        let cleaner = ServiceCleaner::new(mock.clone());

        assert!(cleaner.stop_and_remove("pg").is_ok());
        assert!(cleaner.stop_and_remove("pg").is_ok());
        assert!(!mock.container_exists("pg"));
    }

    #[test]
    fn test_remove_failure_is_reported() {
        let mock = Arc::new(MockRuntime::new());
        mock.set_fail_on("remove");
        let cleaner = ServiceCleaner::new(mock.clone());

        assert!(cleaner.stop_and_remove("pg").is_err());
    }
}
