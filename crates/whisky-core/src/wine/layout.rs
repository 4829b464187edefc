//! On-disk layout of the runtime distribution.

use crate::config::PathsConfig;
use crate::platform;
use crate::Result;
use std::path::{Path, PathBuf};

/// Paths of an installed WhiskyWine.
///
/// ```text
/// <application folder>/
///   Libraries/
///     Wine/bin/...
///     WhiskyWineVersion.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WineLayout {
    application_folder: PathBuf,
}

impl WineLayout {
    pub fn new(application_folder: impl Into<PathBuf>) -> Self {
        Self {
            application_folder: application_folder.into(),
        }
    }

    /// Layout rooted at the platform's per-user application folder.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(platform::application_folder()?))
    }

    /// Folder recreated from scratch on every install.
    pub fn application_folder(&self) -> &Path {
        &self.application_folder
    }

    /// Folder removed by uninstall.
    pub fn library_folder(&self) -> PathBuf {
        self.application_folder.join(PathsConfig::LIBRARIES_DIR_NAME)
    }

    pub fn wine_folder(&self) -> PathBuf {
        self.library_folder().join(PathsConfig::WINE_DIR_NAME)
    }

    pub fn bin_folder(&self) -> PathBuf {
        self.wine_folder().join(PathsConfig::BIN_DIR_NAME)
    }

    pub fn version_file(&self) -> PathBuf {
        self.library_folder().join(PathsConfig::WINE_VERSION_FILENAME)
    }
}
