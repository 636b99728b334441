use crate::domain::DEFAULT_IMAGE_REPO;
use crate::infra::docker_adapter::DEFAULT_ENGINE;
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_NAME: &str = "datainit.toml";

/// Flat wait before a service checker runs
pub const DEFAULT_READINESS_DELAY: Duration = Duration::from_secs(10);

#[derive(Deserialize, Debug, Default)]
pub struct RuntimeConfig {
    pub engine: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct BuildConfig {
    pub repo: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessStrategy {
    #[default]
    Delay,
    Poll,
}

#[derive(Deserialize, Debug, Default)]
pub struct ReadinessConfig {
    #[serde(default)]
    pub strategy: ReadinessStrategy,
    pub delay: Option<String>,
    pub interval: Option<String>,
    pub retries: Option<u32>,
}

/// Contents of `datainit.toml`; every key is optional
#[derive(Deserialize, Debug, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

/// How long to wait for an auxiliary service before trusting its checker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Sleep once, then run the checker once
    FixedDelay(Duration),
    /// Sleep `delay`, then rerun the checker up to `retries` more times. The wait
    /// between attempts starts at `interval` and doubles, capped at 30s.
    Poll {
        delay: Duration,
        interval: Duration,
        retries: u32,
    },
}

impl Default for Readiness {
    fn default() -> Self {
        Self::FixedDelay(DEFAULT_READINESS_DELAY)
    }
}

/// Resolved settings the services run with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub engine: String,
    pub image_repo: String,
    pub readiness: Readiness,
}

impl Settings {
    /// Built-in constants, no config file involved
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            engine: DEFAULT_ENGINE.to_string(),
            image_repo: DEFAULT_IMAGE_REPO.to_string(),
            readiness: Readiness::default(),
        }
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn apply(mut self, config: AppConfig) -> Result<Self> {
        if let Some(engine) = config.runtime.engine {
            if engine.trim().is_empty() {
                bail!("[runtime] engine não pode ser vazio");
            }
            self.engine = engine;
        }

        if let Some(repo) = config.build.repo {
            if repo.trim().is_empty() {
                bail!("[build] repo não pode ser vazio");
            }
            self.image_repo = repo.trim_end_matches('/').to_string();
        }

        self.readiness = config.readiness.resolve()?;

        Ok(self)
    }
}

impl ReadinessConfig {
    fn resolve(&self) -> Result<Readiness> {
        let delay = match &self.delay {
            Some(s) => parse_duration(s)?,
            None => DEFAULT_READINESS_DELAY,
        };

        Ok(match self.strategy {
            ReadinessStrategy::Delay => Readiness::FixedDelay(delay),
            ReadinessStrategy::Poll => Readiness::Poll {
                delay,
                interval: match &self.interval {
                    Some(s) => parse_duration(s)?,
                    None => Duration::from_secs(2),
                },
                retries: self.retries.unwrap_or(5),
            },
        })
    }
}

/// Loads `datainit.toml` from `explicit` if given, otherwise from the root (optional there)
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> Result<Settings> {
    let settings = Settings::with_root(root);

    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config {:?} não encontrado", path);
            }
            path.to_path_buf()
        }
        None => root.join(DEFAULT_CONFIG_NAME),
    };

    if !path.exists() {
        debug!("Sem {:?}, usando valores padrão", path);
        return Ok(settings);
    }

    info!("  Carregando configuração de {:?}", path);
    let content = fs::read_to_string(&path).with_context(|| format!("lendo {:?}", path))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("parse de {:?}", path))?;

    settings.apply(config)
}

/// Parses `500ms`, `10s` or `2m`
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if let Some(stripped) = s.strip_suffix("ms") {
        let millis: u64 = stripped.parse()?;
        Ok(Duration::from_millis(millis))
    } else if let Some(stripped) = s.strip_suffix('s') {
        let secs: u64 = stripped.parse()?;
        Ok(Duration::from_secs(secs))
    } else if let Some(stripped) = s.strip_suffix('m') {
        let mins: u64 = stripped.parse()?;
        Ok(Duration::from_secs(mins * 60))
    } else {
        Err(anyhow!("Formato de duração inválido: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(temp.path(), None).unwrap();

        assert_eq!(settings.engine, "docker");
        assert_eq!(settings.image_repo, "beeldbank-dev");
        assert_eq!(
            settings.readiness,
            Readiness::FixedDelay(Duration::from_secs(10))
        );
        assert_eq!(settings.root, temp.path());
    }

    #[test]
    fn test_config_file_overrides() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_NAME),
            r#"
[runtime]
engine = "podman"

[build]
repo = "acme-dev/"

[readiness]
strategy = "poll"
delay = "3s"
interval = "500ms"
retries = 8
"#,
        )
        .unwrap();

        let settings = load_settings(temp.path(), None).unwrap();
        assert_eq!(settings.engine, "podman");
        assert_eq!(settings.image_repo, "acme-dev");
        assert_eq!(
            settings.readiness,
            Readiness::Poll {
                delay: Duration::from_secs(3),
                interval: Duration::from_millis(500),
                retries: 8,
            }
        );
    }

    #[test]
    fn test_partial_readiness_keeps_fixed_delay() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_NAME),
            "[readiness]\ndelay = \"1m\"\n",
        )
        .unwrap();

        let settings = load_settings(temp.path(), None).unwrap();
        assert_eq!(
            settings.readiness,
            Readiness::FixedDelay(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(load_settings(temp.path(), Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_NAME),
            "[readiness]\ndelay = \"ten\"\n",
        )
        .unwrap();

        assert!(load_settings(temp.path(), None).is_err());
    }

    #[test]
    fn test_empty_engine_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_NAME),
            "[runtime]\nengine = \"  \"\n",
        )
        .unwrap();

        assert!(load_settings(temp.path(), None).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration(" 2m ").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("10").is_err());
    }
}
