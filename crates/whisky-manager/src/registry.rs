//! The bottle registry.
//!
//! Holds the persisted [`BottleList`] and the records built from it. Records
//! are shared as [`SharedBottle`] handles so callers can mutate a bottle's
//! settings without going through the registry.
//!
//! # Locking
//!
//! Registry state sits behind a `tokio::sync::RwLock`. Each record has its own
//! `std::sync::RwLock`, which is only ever held inside short synchronous
//! sections and never across an `.await`.

use crate::bottle_list::BottleList;
use crate::events::RegistryEvent;
use crate::runtime::WineRuntime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};
use whisky_kit::config::{CacheConfig, PathsConfig};
use whisky_kit::platform::container_folder;
use whisky_kit::{Bottle, Result, TimedCache, WhiskyError};

/// A bottle record shared between the registry and its callers.
pub type SharedBottle = Arc<std::sync::RwLock<Bottle>>;

/// Lock a record for reading, ignoring poisoning.
pub fn read_bottle(record: &SharedBottle) -> RwLockReadGuard<'_, Bottle> {
    record.read().unwrap_or_else(PoisonError::into_inner)
}

/// Lock a record for writing, ignoring poisoning.
pub fn write_bottle(record: &SharedBottle) -> RwLockWriteGuard<'_, Bottle> {
    record.write().unwrap_or_else(PoisonError::into_inner)
}

/// Where the registry keeps its files and how long a load stays fresh.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Folder holding the bottle list.
    pub container_folder: PathBuf,
    /// Default parent directory for new bottles.
    pub bottles_folder: PathBuf,
    /// How long `load(false)` is a no-op after a load.
    pub load_window: Duration,
    /// Capacity of the event channel.
    pub event_capacity: usize,
}

impl RegistryConfig {
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    pub fn new(container_folder: impl Into<PathBuf>) -> Self {
        let container_folder = container_folder.into();
        Self {
            bottles_folder: container_folder.join(PathsConfig::BOTTLES_DIR_NAME),
            container_folder,
            load_window: CacheConfig::BOTTLE_LOAD_TTL,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Configuration rooted at the platform container folder.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(container_folder()?))
    }

    pub fn with_bottles_folder(mut self, bottles_folder: impl Into<PathBuf>) -> Self {
        self.bottles_folder = bottles_folder.into();
        self
    }

    pub fn with_load_window(mut self, load_window: Duration) -> Self {
        self.load_window = load_window;
        self
    }

    pub fn bottle_list_file(&self) -> PathBuf {
        self.container_folder.join(PathsConfig::BOTTLE_LIST_FILENAME)
    }
}

pub(crate) struct RegistryState {
    pub(crate) list: BottleList,
    pub(crate) records: Vec<SharedBottle>,
}

pub(crate) struct RegistryInner {
    pub(crate) config: RegistryConfig,
    pub(crate) state: RwLock<RegistryState>,
    last_load: TimedCache<Instant>,
    active_count: TimedCache<usize>,
    pub(crate) runtime: Arc<dyn WineRuntime>,
    events: broadcast::Sender<RegistryEvent>,
}

/// Handle to the bottle registry.
///
/// Cloning is cheap; all clones share the same state.
#[derive(Clone)]
pub struct BottleRegistry {
    pub(crate) inner: Arc<RegistryInner>,
}

impl BottleRegistry {
    /// Create a registry, reading the bottle list from the container folder.
    ///
    /// No records exist until [`BottleRegistry::load`] runs.
    pub fn new(config: RegistryConfig, runtime: Arc<dyn WineRuntime>) -> Self {
        let list = BottleList::load(config.bottle_list_file());
        info!(
            "Bottle registry at {} with {} registered bottles",
            config.container_folder.display(),
            list.paths().len()
        );
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            inner: Arc::new(RegistryInner {
                last_load: TimedCache::new(config.load_window),
                active_count: TimedCache::unbounded(),
                config,
                state: RwLock::new(RegistryState {
                    list,
                    records: Vec::new(),
                }),
                runtime,
                events,
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Receive change notifications from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.inner.events.subscribe()
    }

    /// Rebuild records from the bottle list.
    ///
    /// Without `force_reload` this does nothing while the previous load is
    /// still inside the freshness window. Paths that cannot be opened are
    /// skipped. In-flight records whose path is not registered yet are kept.
    pub async fn load(&self, force_reload: bool) -> Result<()> {
        if !force_reload && self.inner.last_load.get().is_some() {
            debug!("Bottle records are fresh, skipping load");
            return Ok(());
        }

        let paths = self.inner.state.read().await.list.paths().to_vec();
        let registered: HashSet<PathBuf> = paths.iter().cloned().collect();
        let opened = tokio::task::spawn_blocking(move || open_bottles(paths)).await?;

        let count = {
            let mut state = self.inner.state.write().await;
            let mut records: Vec<SharedBottle> = opened
                .into_iter()
                .map(|bottle| Arc::new(std::sync::RwLock::new(bottle)))
                .collect();
            // Keep records this load did not open: in-flight ones, and ones
            // registered by a concurrent creation after the snapshot.
            let RegistryState { list, records: previous } = &mut *state;
            records.extend(previous.drain(..).filter(|record| {
                let bottle = read_bottle(record);
                !registered.contains(bottle.location())
                    && (bottle.in_flight() || list.contains(bottle.location()))
            }));
            records.sort_by_cached_key(|record| read_bottle(record).sort_key());
            state.records = records;

            // Reset under the write lock so a concurrent count cannot cache
            // the old records afterwards.
            self.inner.last_load.insert(Instant::now());
            self.inner.active_count.invalidate();
            state.records.len()
        };

        debug!("Loaded {} bottles", count);
        self.emit(RegistryEvent::Loaded { count });
        Ok(())
    }

    /// Number of available bottles.
    ///
    /// Cached until the next load; never loads by itself.
    pub async fn count_active(&self) -> usize {
        if let Some(count) = self.inner.active_count.get() {
            return count;
        }
        let state = self.inner.state.read().await;
        let count = state
            .records
            .iter()
            .filter(|record| read_bottle(record).is_available())
            .count();
        self.inner.active_count.insert(count);
        count
    }

    /// Current records, in name order.
    pub async fn records(&self) -> Vec<SharedBottle> {
        self.inner.state.read().await.records.clone()
    }

    /// The record at `location`, if any.
    pub async fn bottle(&self, location: &Path) -> Option<SharedBottle> {
        let state = self.inner.state.read().await;
        state
            .records
            .iter()
            .find(|record| read_bottle(record).location() == location)
            .cloned()
    }

    /// Registered bottle paths, in registration order.
    pub async fn paths(&self) -> Vec<PathBuf> {
        self.inner.state.read().await.list.paths().to_vec()
    }

    /// Unregister a bottle. Its directory is left on disk.
    pub async fn remove_bottle(&self, location: &Path) -> Result<()> {
        {
            let mut state = self.inner.state.write().await;
            let unlisted = state.list.remove(location);
            let before = state.records.len();
            state
                .records
                .retain(|record| read_bottle(record).location() != location);

            if !unlisted && state.records.len() == before {
                return Err(WhiskyError::BottleNotFound(location.to_path_buf()));
            }
            self.inner.active_count.invalidate();
        }

        info!("Removed bottle {}", location.display());
        self.emit(RegistryEvent::Removed(location.to_path_buf()));
        Ok(())
    }

    pub(crate) fn emit(&self, event: RegistryEvent) {
        // No subscribers is fine.
        if self.inner.events.send(event).is_err() {
            debug!("No registry subscribers");
        }
    }
}

fn open_bottles(paths: Vec<PathBuf>) -> Vec<Bottle> {
    paths
        .into_iter()
        .filter_map(|path| {
            let available = path.is_dir();
            if !available {
                warn!("Bottle {} is not available", path.display());
            }
            match Bottle::open(&path, false, available) {
                Ok(bottle) => Some(bottle),
                Err(e) => {
                    error!("Failed to open bottle {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}
