use crate::domain::{
    BUILD_FILE, ContainerRuntime, DataInitDefinition, DisposableRun, ELASTIC, Link, REDIS,
    STORAGE_PROVIDER,
};
use crate::infra::Settings;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds and runs the seeding image of one data-init definition
pub struct DataInitRunner {
    runtime: Arc<dyn ContainerRuntime>,
    root: PathBuf,
    image_repo: String,
    links: Vec<Link>,
}

impl DataInitRunner {
    /// `database_container` is linked into every data-init as `postgres`
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        settings: &Settings,
        database_container: &str,
    ) -> Self {
        Self {
            runtime,
            root: settings.root.clone(),
            image_repo: settings.image_repo.clone(),
            links: vec![
                ELASTIC.link(),
                Link::new(database_container, "postgres"),
                STORAGE_PROVIDER.link(),
                REDIS.link(),
            ],
        }
    }

    /// Stages the definition's build file into its build context, builds the
    /// image, runs it once, and removes the staged file whatever happened.
    pub fn build_and_run(&self, definition: &DataInitDefinition) -> Result<()> {
        let context = definition.build_context(&self.root);
        if !context.is_dir() {
            bail!(
                "Contexto de build {:?} para {} não existe",
                context,
                definition
            );
        }

        let staged = StagedBuildFile::stage(&definition.build_file_source(&self.root), &context)?;

        let tag = definition.image_tag(&self.image_repo);
        info!("Construindo imagem {}", tag);
        self.runtime.build_image(&tag, staged.path(), &context)?;

        info!("Rodando data-init {}", definition);
        self.runtime.run_disposable(&DisposableRun {
            image: tag,
            links: self.links.clone(),
        })?;

        Ok(())
    }
}

/// Copy of a build file inside a build context, deleted on drop
#[derive(Debug)]
pub struct StagedBuildFile {
    path: PathBuf,
}

impl StagedBuildFile {
    pub fn stage(source: &Path, context: &Path) -> Result<Self> {
        let path = context.join(BUILD_FILE);

        debug!("Copiando {:?} para {:?}", source, path);
        fs::copy(source, &path).with_context(|| format!("copiando {:?} para {:?}", source, path))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedBuildFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Não foi possível remover {:?}: {}", self.path, e);
        }
    }
}
