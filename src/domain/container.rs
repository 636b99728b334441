use std::fmt;

/// `--link <container>:<alias>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub container: String,
    pub alias: String,
}

impl Link {
    pub fn new(container: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            alias: alias.into(),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.alias)
    }
}

/// Long-running, named container started in the background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedRun {
    pub name: String,
    pub image: String,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
}

/// Short-lived container that is removed once it exits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposableRun {
    pub image: String,
    pub links: Vec<Link>,
}
