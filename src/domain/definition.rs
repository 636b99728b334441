use std::fmt;
use std::path::{Path, PathBuf};

/// Folder under the project root holding one directory per data-init
pub const DATA_INITS_DIR: &str = "data-inits";

/// Build file every data-init definition ships
pub const BUILD_FILE: &str = "Dockerfile-data-init";

/// Repository namespace used for data-init image tags when none is configured
pub const DEFAULT_IMAGE_REPO: &str = "beeldbank-dev";

/// A leaf of the `data-inits/` tree, identified by its path relative to that folder.
///
/// Either one segment (`assets`) or two (`assets/thumbnails`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataInitDefinition {
    relative: PathBuf,
}

impl DataInitDefinition {
    pub fn new(relative: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
        }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// `<root>/data-inits/<definition>/Dockerfile-data-init`
    pub fn build_file_source(&self, root: &Path) -> PathBuf {
        root.join(DATA_INITS_DIR).join(&self.relative).join(BUILD_FILE)
    }

    /// `<root>/<definition>`, the directory the image is built from
    pub fn build_context(&self, root: &Path) -> PathBuf {
        root.join(&self.relative)
    }

    /// `<repo>/<definition>-migration:latest`, definition path used as-is
    pub fn image_tag(&self, repo: &str) -> String {
        format!("{repo}/{}-migration:latest", self.slash_path())
    }

    fn slash_path(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for DataInitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slash_path())
    }
}
