use std::path::Path;

use super::container::{DetachedRun, DisposableRun, Link};

/// Host directory (relative to the project root) bind-mounted into a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mount {
    pub host_dir: &'static str,
    pub container_path: &'static str,
}

/// One auxiliary service the data-inits depend on.
///
/// Descriptors are compile-time constants; see [`STORAGE_PROVIDER`],
/// [`ELASTIC`], [`REDIS`] and [`POSTGRES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub container_name: &'static str,
    pub image: &'static str,
    pub port: &'static str,
    pub mount: Option<Mount>,
    pub checker_image: &'static str,
    /// Hostname the service is linked under, both for the checker and for data-inits
    pub alias: &'static str,
}

pub const STORAGE_PROVIDER: ServiceDescriptor = ServiceDescriptor {
    container_name: "storageprovider-init",
    image: "beeldbank-dev/storageprovider:latest",
    port: "6544:6544",
    mount: Some(Mount {
        host_dir: "data/storageprovider",
        container_path: "/beeldbank_store",
    }),
    checker_image: "beeldbank-dev/storageprovider-checker:latest",
    alias: "storageprovider",
};

pub const ELASTIC: ServiceDescriptor = ServiceDescriptor {
    container_name: "beeldbank-elastic-init",
    image: "geosolutions/elasticsearch-plugins",
    port: "9200:9200",
    mount: Some(Mount {
        host_dir: "data/elastic",
        container_path: "/usr/share/elasticsearch/data",
    }),
    checker_image: "beeldbank-dev/elastic-checker:latest",
    alias: "elastic",
};

pub const REDIS: ServiceDescriptor = ServiceDescriptor {
    container_name: "beeldbank-redis-init",
    image: "redis",
    port: "6379:6379",
    mount: None,
    checker_image: "beeldbank-dev/redis-checker:latest",
    alias: "redis",
};

pub const POSTGRES: ServiceDescriptor = ServiceDescriptor {
    container_name: "beeldbank-postgres-init",
    image: "postgres",
    port: "5432:5432",
    mount: None,
    checker_image: "beeldbank-dev/postgres-checker:latest",
    alias: "postgres",
};

impl ServiceDescriptor {
    /// `host:container` volume argument with the host side resolved against `root`
    pub fn volume(&self, root: &Path) -> Option<String> {
        self.mount.map(|m| {
            format!(
                "{}:{}",
                root.join(m.host_dir).to_string_lossy(),
                m.container_path
            )
        })
    }

    pub fn link(&self) -> Link {
        Link::new(self.container_name, self.alias)
    }

    pub fn to_detached_run(&self, root: &Path) -> DetachedRun {
        DetachedRun {
            name: self.container_name.to_string(),
            image: self.image.to_string(),
            ports: vec![self.port.to_string()],
            volumes: self.volume(root).into_iter().collect(),
        }
    }

    pub fn to_checker_run(&self) -> DisposableRun {
        DisposableRun {
            image: self.checker_image.to_string(),
            links: vec![self.link()],
        }
    }
}
