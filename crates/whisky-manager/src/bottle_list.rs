//! The persisted list of bottle directories.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use whisky_kit::metadata::{read_json, write_json_atomic};
use whisky_kit::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct BottleListDocument {
    #[serde(default)]
    paths: Vec<PathBuf>,
}

/// Ordered bottle paths, backed by a JSON file (`{"paths": [...]}`).
///
/// Every mutation is written through immediately. Write failures are logged
/// and the in-memory list keeps the change.
#[derive(Debug, Clone)]
pub struct BottleList {
    file: PathBuf,
    paths: Vec<PathBuf>,
}

impl BottleList {
    /// Read the list stored at `file`.
    ///
    /// A missing or unreadable file yields an empty list.
    pub fn load(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let paths = match read_json::<BottleListDocument>(&file) {
            Ok(document) => document.paths,
            Err(e) if file.exists() => {
                error!("Failed to decode bottle list `{}`: {}", file.display(), e);
                Vec::new()
            }
            Err(_) => {
                debug!("No bottle list at {}, starting empty", file.display());
                Vec::new()
            }
        };
        Self { file, paths }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn contains(&self, location: &Path) -> bool {
        self.paths.iter().any(|p| p == location)
    }

    /// Append a path. Returns `false` if it was already listed.
    pub fn push(&mut self, location: impl Into<PathBuf>) -> bool {
        let location = location.into();
        if self.contains(&location) {
            warn!("Bottle {} is already registered", location.display());
            return false;
        }
        self.paths.push(location);
        self.persist();
        true
    }

    /// Remove a path. Returns `false` if it was not listed.
    pub fn remove(&mut self, location: &Path) -> bool {
        let before = self.paths.len();
        self.paths.retain(|p| p != location);
        if self.paths.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Write the list to its file.
    pub fn save(&self) -> Result<()> {
        let document = BottleListDocument {
            paths: self.paths.clone(),
        };
        write_json_atomic(&self.file, &document)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("Failed to save bottle list `{}`: {}", self.file.display(), e);
        }
    }
}
