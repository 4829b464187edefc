//! Wine commands needed while creating a bottle.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;
use whisky_kit::bottle::WinVersion;
use whisky_kit::wine::WineLayout;
use whisky_kit::{Result, WhiskyError};

/// The Wine operations the registry depends on.
#[async_trait]
pub trait WineRuntime: Send + Sync {
    /// Set the Windows version reported inside the bottle's prefix.
    async fn change_win_version(&self, bottle: &Path, version: WinVersion) -> Result<()>;

    /// Version string of the installed Wine, e.g. `9.0`.
    async fn wine_version(&self) -> Result<String>;
}

/// Runs the `wine64` binary from a WhiskyWine install.
#[derive(Debug, Clone)]
pub struct WineCommand {
    binary: PathBuf,
}

impl WineCommand {
    pub const BINARY_NAME: &'static str = "wine64";

    pub fn new(layout: &WineLayout) -> Self {
        Self {
            binary: layout.bin_folder().join(Self::BINARY_NAME),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run<I, S>(&self, prefix: Option<&Path>, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.binary);
        command.args(args).kill_on_drop(true);
        if let Some(prefix) = prefix {
            command.env("WINEPREFIX", prefix);
        }
        debug!("Running {:?}", command.as_std());

        let output = command.output().await.map_err(|e| WhiskyError::Runtime {
            message: format!("Failed to run {}: {}", self.binary.display(), e),
        })?;

        if !output.status.success() {
            return Err(WhiskyError::Runtime {
                message: format!(
                    "{} exited with {}: {}",
                    self.binary.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl WineRuntime for WineCommand {
    async fn change_win_version(&self, bottle: &Path, version: WinVersion) -> Result<()> {
        self.run(Some(bottle), ["winecfg", "-v", version.as_str()])
            .await
            .map(|_| ())
    }

    async fn wine_version(&self) -> Result<String> {
        let output = self.run(None, ["--version"]).await?;
        Ok(parse_version_output(&output))
    }
}

/// Reduce `wine --version` output to the bare version.
///
/// Handles `wine-9.0`, `wine-7.7 (Staging)` and CrossOver-style suffixes.
fn parse_version_output(output: &str) -> String {
    let trimmed = output.trim();
    let version = trimmed.strip_prefix("wine-").unwrap_or(trimmed);
    version
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}
