use crate::domain::{DATA_INITS_DIR, DataInitDefinition};
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Walks the `data-inits/` folder of a project root
pub struct DefinitionDiscovery {
    base_dir: PathBuf,
}

impl DefinitionDiscovery {
    /// Points at `<root>/data-inits`; fails when that folder is missing
    pub fn new(root: &Path) -> Result<Self> {
        let base_dir = root.join(DATA_INITS_DIR);

        if !base_dir.is_dir() {
            bail!("Esperava uma pasta {:?} com as definições de data-init", base_dir);
        }

        Ok(Self { base_dir })
    }

    /// Lists every leaf definition.
    ///
    /// A top-level folder without visible subfolders is a leaf itself;
    /// otherwise each of its visible subfolders is one (one level deep only).
    /// Order follows the directory listing; nothing is sorted.
    pub fn discover_all(&self) -> Result<Vec<DataInitDefinition>> {
        let mut definitions = Vec::new();

        for group in list_visible_dirs(&self.base_dir)? {
            let children = list_visible_dirs(&self.base_dir.join(&group))?;

            if children.is_empty() {
                debug!("Definição encontrada: {:?}", group);
                definitions.push(DataInitDefinition::new(group));
                continue;
            }

            for child in children {
                let relative = Path::new(&group).join(child);
                debug!("Definição encontrada: {:?}", relative);
                definitions.push(DataInitDefinition::new(relative));
            }
        }

        Ok(definitions)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Names of non-hidden subdirectories, in listing order, kept as raw OS names
fn list_visible_dirs(dir: &Path) -> Result<Vec<OsString>> {
    let mut names = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("Lendo diretório {:?}", dir))?;

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();

        if name.as_encoded_bytes().starts_with(b".") {
            continue;
        }

        if !entry.path().is_dir() {
            continue;
        }

        names.push(name);
    }

    Ok(names)
}
