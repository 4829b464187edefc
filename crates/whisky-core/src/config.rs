//! Centralized configuration for Whisky Kit.
//!
//! Constants for the application identity, cache windows, network endpoints
//! and on-disk names. Runtime-adjustable values take these as defaults.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Whisky";
    pub const BUNDLE_IDENTIFIER: &'static str = "com.isaacmarovitz.Whisky";
}

/// Freshness windows for the in-memory caches.
pub struct CacheConfig;

impl CacheConfig {
    /// How long a bottle's pinned-program view stays valid.
    pub const PINNED_PROGRAMS_TTL: Duration = Duration::from_secs(2);
    /// How long a registry load is served without touching the disk.
    pub const BOTTLE_LOAD_TTL: Duration = Duration::from_secs(5);
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const WHISKY_WINE_VERSION_URL: &'static str =
        "https://data.getwhisky.app/Wine/WhiskyWineVersion.json";
    pub const USER_AGENT: &'static str = "Whisky-Kit/0.1";
}

/// Directory and file names.
pub struct PathsConfig;

impl PathsConfig {
    pub const LIBRARIES_DIR_NAME: &'static str = "Libraries";
    pub const WINE_DIR_NAME: &'static str = "Wine";
    pub const BIN_DIR_NAME: &'static str = "bin";
    pub const WINE_VERSION_FILENAME: &'static str = "WhiskyWineVersion.json";
    pub const BOTTLE_METADATA_FILENAME: &'static str = "Metadata.json";
    pub const BOTTLE_LIST_FILENAME: &'static str = "BottleVM.json";
    pub const BOTTLES_DIR_NAME: &'static str = "Bottles";
}
