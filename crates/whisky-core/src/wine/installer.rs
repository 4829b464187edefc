//! Installing, removing and update-checking WhiskyWine.

use super::descriptor::WineVersionDescriptor;
use super::extract::{ArchiveExtractor, ArchiveUnpacker};
use super::layout::WineLayout;
use crate::config::NetworkConfig;
use crate::version::SemanticVersion;
use crate::{Result, WhiskyError};
use chrono::{DateTime, Utc};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Result of comparing the installed WhiskyWine with the remote feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheck {
    /// Whether a newer version is published.
    pub available: bool,
    /// The newer version, or `0.0.0` when no update is reported.
    pub remote_version: SemanticVersion,
    pub checked_at: DateTime<Utc>,
}

/// Decide whether `remote` is an update over `local`.
///
/// Only a strictly newer remote counts. A missing local version means the
/// answer cannot be determined, which is reported as "no update".
pub fn update_available(
    local: Option<SemanticVersion>,
    remote: Option<SemanticVersion>,
) -> UpdateCheck {
    let newer = match (local, remote) {
        (Some(local), Some(remote)) if local < remote => Some(remote),
        _ => None,
    };
    UpdateCheck {
        available: newer.is_some(),
        remote_version: newer.unwrap_or(SemanticVersion::ZERO),
        checked_at: Utc::now(),
    }
}

/// Manages the WhiskyWine distribution under a [`WineLayout`].
pub struct WhiskyWineInstaller {
    layout: WineLayout,
    extractor: Arc<dyn ArchiveExtractor>,
    version_url: Url,
}

impl WhiskyWineInstaller {
    /// Create an installer using the default extractor and update feed.
    pub fn new(layout: WineLayout) -> Result<Self> {
        let version_url = parse_version_url(NetworkConfig::WHISKY_WINE_VERSION_URL)?;
        Ok(Self {
            layout,
            extractor: Arc::new(ArchiveUnpacker),
            version_url,
        })
    }

    /// Use a different archive extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Check for updates against a different descriptor URL.
    pub fn with_version_url(mut self, url: &str) -> Result<Self> {
        self.version_url = parse_version_url(url)?;
        Ok(self)
    }

    pub fn layout(&self) -> &WineLayout {
        &self.layout
    }

    pub fn version_url(&self) -> &Url {
        &self.version_url
    }

    /// Whether a readable version descriptor is present.
    pub fn is_installed(&self) -> bool {
        self.local_version().is_some()
    }

    /// Version recorded by the installed distribution.
    pub fn local_version(&self) -> Option<SemanticVersion> {
        let path = self.layout.version_file();
        match WineVersionDescriptor::read(&path) {
            Ok(descriptor) => Some(descriptor.version),
            Err(e) => {
                warn!("Failed to read WhiskyWine version: {}", e);
                None
            }
        }
    }

    /// Install from an archive, replacing whatever is installed.
    ///
    /// The application folder is deleted and recreated before extraction, and
    /// the archive is deleted afterwards. A failure at any step leaves the
    /// install in an unknown state; retry with a fresh archive.
    pub async fn install(&self, archive: &Path) -> Result<()> {
        let layout = self.layout.clone();
        let extractor = Arc::clone(&self.extractor);
        let archive = archive.to_path_buf();

        let result = tokio::task::spawn_blocking(move || {
            install_blocking(&layout, extractor.as_ref(), &archive)
        })
        .await
        .map_err(|e| WhiskyError::installation("join install task", e.into()))
        .and_then(|inner| inner);

        match &result {
            Ok(()) => info!("WhiskyWine installation completed successfully"),
            Err(e) => error!("Failed to install WhiskyWine: {}", e),
        }
        result
    }

    /// Remove the library folder, keeping the rest of the application folder.
    pub fn uninstall(&self) -> Result<()> {
        let library = self.layout.library_folder();
        info!("Uninstalling WhiskyWine");

        fs::remove_dir_all(&library).map_err(|e| {
            error!("Failed to uninstall WhiskyWine: {}", e);
            WhiskyError::UninstallFailed {
                message: format!("Failed to remove {}", library.display()),
                source: Some(e),
            }
        })?;

        info!("WhiskyWine uninstalled successfully");
        Ok(())
    }

    /// Fetch the version published on the update feed.
    ///
    /// Each call uses its own client with no pooled connections and asks
    /// intermediaries not to serve a cached copy. No retry and no timeout
    /// beyond the transport's own.
    pub async fn remote_version(&self) -> Result<SemanticVersion> {
        let client = reqwest::Client::builder()
            .user_agent(NetworkConfig::USER_AGENT)
            .pool_max_idle_per_host(0)
            .build()?;

        let response = client
            .get(self.version_url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;

        let descriptor = WineVersionDescriptor::from_slice(&body)?;
        debug!("Remote WhiskyWine version: {}", descriptor.version);
        Ok(descriptor.version)
    }

    /// Compare the installed version with the update feed.
    ///
    /// Network and decode failures are logged and reported as "no update".
    pub async fn check_for_update(&self) -> UpdateCheck {
        let remote = match self.remote_version().await {
            Ok(version) => Some(version),
            Err(e) => {
                error!("Failed to check WhiskyWine version: {}", e);
                None
            }
        };
        update_available(self.local_version(), remote)
    }
}

fn parse_version_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| WhiskyError::Config {
        message: format!("Invalid version URL '{}': {}", raw, e),
    })?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(WhiskyError::Config {
            message: format!("Unsupported version URL scheme: {}", other),
        }),
    }
}

fn install_blocking(
    layout: &WineLayout,
    extractor: &dyn ArchiveExtractor,
    archive: &Path,
) -> Result<()> {
    let app_folder = layout.application_folder();

    if app_folder.exists() {
        info!("Recreating WhiskyWine application folder");
        fs::remove_dir_all(app_folder).map_err(|e| {
            WhiskyError::installation(
                "remove application folder",
                WhiskyError::io_with_path(e, app_folder),
            )
        })?;
    }
    fs::create_dir_all(app_folder).map_err(|e| {
        WhiskyError::installation(
            "create application folder",
            WhiskyError::io_with_path(e, app_folder),
        )
    })?;
    debug!("Created WhiskyWine application folder");

    info!("Extracting WhiskyWine archive");
    extractor
        .extract(archive, app_folder)
        .map_err(|e| WhiskyError::installation("extract archive", e))?;

    fs::remove_file(archive).map_err(|e| {
        WhiskyError::installation(
            "delete archive",
            WhiskyError::io_with_path(e, PathBuf::from(archive)),
        )
    })?;
    Ok(())
}
