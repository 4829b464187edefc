//! Persisted bottle settings (`Metadata.json`).

use crate::metadata::{read_json, write_json_atomic};
use crate::version::SemanticVersion;
use crate::{Result, WhiskyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Windows version a bottle's prefix reports to programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinVersion {
    WinXP,
    Win7,
    Win8,
    Win81,
    #[default]
    Win10,
    Win11,
}

impl WinVersion {
    pub const ALL: [WinVersion; 6] = [
        WinVersion::WinXP,
        WinVersion::Win7,
        WinVersion::Win8,
        WinVersion::Win81,
        WinVersion::Win10,
        WinVersion::Win11,
    ];

    /// Value understood by `winecfg -v`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WinVersion::WinXP => "winxp64",
            WinVersion::Win7 => "win7",
            WinVersion::Win8 => "win8",
            WinVersion::Win81 => "win81",
            WinVersion::Win10 => "win10",
            WinVersion::Win11 => "win11",
        }
    }

    pub fn pretty(&self) -> &'static str {
        match self {
            WinVersion::WinXP => "Windows XP",
            WinVersion::Win7 => "Windows 7",
            WinVersion::Win8 => "Windows 8",
            WinVersion::Win81 => "Windows 8.1",
            WinVersion::Win10 => "Windows 10",
            WinVersion::Win11 => "Windows 11",
        }
    }
}

impl fmt::Display for WinVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WinVersion {
    type Err = WhiskyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "winxp" | "winxp64" | "xp" => Ok(WinVersion::WinXP),
            "win7" | "7" => Ok(WinVersion::Win7),
            "win8" | "8" => Ok(WinVersion::Win8),
            "win81" | "8.1" => Ok(WinVersion::Win81),
            "win10" | "10" => Ok(WinVersion::Win10),
            "win11" | "11" => Ok(WinVersion::Win11),
            other => Err(WhiskyError::Config {
                message: format!("Unknown Windows version: {}", other),
            }),
        }
    }
}

/// A named shortcut to an executable inside (or outside) a bottle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedProgram {
    pub name: String,
    #[serde(default)]
    pub url: Option<PathBuf>,
    /// Target lives on external media that may be unplugged.
    #[serde(default)]
    pub removable: bool,
}

impl PinnedProgram {
    pub fn new(name: impl Into<String>, url: impl Into<PathBuf>, removable: bool) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            removable,
        }
    }
}

/// Everything about a bottle that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleSettings {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub windows_version: WinVersion,
    #[serde(default)]
    pub wine_version: SemanticVersion,
    #[serde(default)]
    pub pins: Vec<PinnedProgram>,
    /// Program paths hidden from the program list.
    #[serde(default)]
    pub blocklist: Vec<PathBuf>,
}

fn default_name() -> String {
    "Bottle".to_string()
}

impl Default for BottleSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            windows_version: WinVersion::default(),
            wine_version: SemanticVersion::ZERO,
            pins: Vec::new(),
            blocklist: Vec::new(),
        }
    }
}

impl BottleSettings {
    /// Load settings from a metadata file.
    pub fn decode(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Write settings to a metadata file, replacing it atomically.
    pub fn encode(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }
}
