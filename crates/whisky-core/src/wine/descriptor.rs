//! The `WhiskyWineVersion.json` document, shared by the local install and
//! the remote update feed.

use crate::metadata::read_json;
use crate::version::SemanticVersion;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version descriptor shipped inside the runtime archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineVersionDescriptor {
    #[serde(default = "default_version")]
    pub version: SemanticVersion,
}

fn default_version() -> SemanticVersion {
    SemanticVersion::new(1, 0, 0)
}

impl Default for WineVersionDescriptor {
    fn default() -> Self {
        Self {
            version: default_version(),
        }
    }
}

impl WineVersionDescriptor {
    pub fn read(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
