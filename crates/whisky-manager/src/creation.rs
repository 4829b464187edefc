//! Creating bottles in the background.
//!
//! A new bottle shows up as an in-flight record as soon as its directory
//! exists. It only joins the bottle list once Wine has configured it; a
//! failure removes the in-flight record and leaves the list alone.

use crate::events::RegistryEvent;
use crate::registry::{read_bottle, write_bottle, BottleRegistry, SharedBottle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;
use whisky_kit::bottle::WinVersion;
use whisky_kit::{Bottle, Result, SemanticVersion, WhiskyError};

/// A bottle whose creation is running in the background.
#[derive(Debug)]
pub struct PendingBottle {
    location: PathBuf,
    handle: JoinHandle<Result<SharedBottle>>,
}

impl PendingBottle {
    /// Where the bottle is being created.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for creation to finish and return the registered record.
    pub async fn wait(self) -> Result<SharedBottle> {
        self.handle.await?
    }
}

impl BottleRegistry {
    /// Start creating a bottle named `name` in a fresh directory under
    /// `parent`.
    ///
    /// Returns immediately; the directory name is a random UUID. Progress is
    /// reported through [`RegistryEvent`]s and the returned handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn create_bottle(
        &self,
        name: impl Into<String>,
        win_version: WinVersion,
        parent: &Path,
    ) -> PendingBottle {
        let location = parent.join(Uuid::new_v4().to_string());
        let name = name.into();
        info!("Creating bottle `{}` at {}", name, location.display());

        let registry = self.clone();
        let task_location = location.clone();
        let handle = tokio::spawn(async move {
            registry
                .run_creation(task_location, name, win_version)
                .await
        });

        PendingBottle { location, handle }
    }

    async fn run_creation(
        &self,
        location: PathBuf,
        name: String,
        win_version: WinVersion,
    ) -> Result<SharedBottle> {
        let result = match self.publish_in_flight(&location).await {
            Ok(record) => {
                let configured = self.configure(&record, name, win_version).await;
                if configured.is_err() {
                    self.discard_in_flight(&location).await;
                }
                configured.map(|()| record)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(provisional) => {
                self.inner.state.write().await.list.push(&location);
                self.load(true).await?;
                info!("Created bottle {}", location.display());
                self.emit(RegistryEvent::Created(location.clone()));
                Ok(self.bottle(&location).await.unwrap_or(provisional))
            }
            Err(e) => {
                error!("Failed to create bottle {}: {}", location.display(), e);
                self.emit(RegistryEvent::CreationFailed {
                    location,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Create the directory and publish an in-flight record for it.
    async fn publish_in_flight(&self, location: &Path) -> Result<SharedBottle> {
        let dir = location.to_path_buf();
        let bottle = tokio::task::spawn_blocking(move || -> Result<Bottle> {
            std::fs::create_dir_all(&dir).map_err(|e| WhiskyError::io_with_path(e, &dir))?;
            Bottle::open(&dir, true, true)
        })
        .await??;

        let record: SharedBottle = Arc::new(std::sync::RwLock::new(bottle));
        {
            let mut state = self.inner.state.write().await;
            let taken = state
                .records
                .iter()
                .any(|existing| read_bottle(existing).location() == location);
            if taken {
                return Err(WhiskyError::DuplicateBottle(location.to_path_buf()));
            }
            state.records.push(Arc::clone(&record));
        }

        debug!("Bottle {} is in flight", location.display());
        self.emit(RegistryEvent::InFlight(location.to_path_buf()));
        Ok(record)
    }

    /// Persist the requested settings and let Wine set up the prefix.
    async fn configure(
        &self,
        record: &SharedBottle,
        name: String,
        win_version: WinVersion,
    ) -> Result<()> {
        let settings_record = Arc::clone(record);
        tokio::task::spawn_blocking(move || {
            let mut bottle = write_bottle(&settings_record);
            bottle.set_windows_version(win_version);
            bottle.set_name(name);
        })
        .await?;

        let location = read_bottle(record).location().to_path_buf();
        self.inner
            .runtime
            .change_win_version(&location, win_version)
            .await?;
        let raw = self.inner.runtime.wine_version().await?;
        let wine_version = SemanticVersion::parse_lenient(&raw);
        debug!("Bottle {} uses Wine {}", location.display(), wine_version);

        let version_record = Arc::clone(record);
        tokio::task::spawn_blocking(move || {
            write_bottle(&version_record).set_wine_version(wine_version);
        })
        .await?;
        Ok(())
    }

    async fn discard_in_flight(&self, location: &Path) {
        let mut state = self.inner.state.write().await;
        state
            .records
            .retain(|record| read_bottle(record).location() != location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryConfig;
    use crate::runtime::WineRuntime;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedWine(&'static str);

    #[async_trait]
    impl WineRuntime for FixedWine {
        async fn change_win_version(&self, _bottle: &Path, _version: WinVersion) -> Result<()> {
            Ok(())
        }

        async fn wine_version(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_location_is_uuid_under_parent() {
        let temp_dir = TempDir::new().unwrap();
        let registry = BottleRegistry::new(
            RegistryConfig::new(temp_dir.path()),
            Arc::new(FixedWine("9.0")),
        );
        let parent = temp_dir.path().join("Bottles");

        let pending = registry.create_bottle("Games", WinVersion::Win10, &parent);
        assert_eq!(pending.location().parent(), Some(parent.as_path()));
        let dir_name = pending.location().file_name().unwrap().to_string_lossy();
        assert!(Uuid::parse_str(&dir_name).is_ok());

        pending.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_lenient_wine_version_is_stored() {
        let temp_dir = TempDir::new().unwrap();
        let registry = BottleRegistry::new(
            RegistryConfig::new(temp_dir.path()),
            Arc::new(FixedWine("7.7 (Staging)")),
        );

        let record = registry
            .create_bottle("Staging", WinVersion::Win7, temp_dir.path())
            .wait()
            .await
            .unwrap();

        let bottle = read_bottle(&record);
        assert_eq!(bottle.settings().wine_version, SemanticVersion::new(7, 7, 0));
        assert_eq!(bottle.settings().windows_version, WinVersion::Win7);
        assert!(!bottle.in_flight());
    }
}
