//! The bottle record: identity, persisted settings and derived views.

use super::pins::sanitize_pins;
use super::program::Program;
use super::settings::{BottleSettings, PinnedProgram, WinVersion};
use crate::cache::TimedCache;
use crate::config::{CacheConfig, PathsConfig};
use crate::version::SemanticVersion;
use crate::{Result, WhiskyError};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A pin resolved against the bottle's current program list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedProgramEntry {
    pub pin: PinnedProgram,
    pub program: Program,
    /// Stable identity for list views: `<pin name>//<program path>`.
    pub id: String,
}

/// One bottle on disk.
///
/// Equality and hashing only look at the location.
#[derive(Debug)]
pub struct Bottle {
    location: PathBuf,
    metadata_path: PathBuf,
    settings: BottleSettings,
    programs: Vec<Program>,
    in_flight: bool,
    is_available: bool,
    pinned_cache: TimedCache<Vec<PinnedProgramEntry>>,
}

impl Bottle {
    /// Open the bottle at `location`.
    ///
    /// Unreadable or missing metadata falls back to default settings. Pins
    /// are sanitized once here. Only fails when `location` exists but is not
    /// a directory.
    pub fn open(location: impl Into<PathBuf>, in_flight: bool, is_available: bool) -> Result<Self> {
        let location = location.into();
        if location.exists() && !location.is_dir() {
            return Err(WhiskyError::NotADirectory(location));
        }

        let metadata_path = location.join(PathsConfig::BOTTLE_METADATA_FILENAME);
        let mut settings = match BottleSettings::decode(&metadata_path) {
            Ok(settings) => settings,
            Err(e) => {
                error!(
                    "Failed to load settings for bottle `{}`: {}",
                    metadata_path.display(),
                    e
                );
                BottleSettings::default()
            }
        };
        settings.pins = sanitize_pins(std::mem::take(&mut settings.pins));

        Ok(Self {
            location,
            metadata_path,
            settings,
            programs: Vec::new(),
            in_flight,
            is_available,
            pinned_cache: TimedCache::new(CacheConfig::PINNED_PROGRAMS_TTL),
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn settings(&self) -> &BottleSettings {
        &self.settings
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Mutate the settings and save them immediately.
    ///
    /// A failed save is logged; the in-memory change stays. The pinned-program
    /// view is recomputed on its next read.
    pub fn update_settings<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut BottleSettings),
    {
        mutate(&mut self.settings);
        self.pinned_cache.invalidate();
        self.save_settings();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.update_settings(|s| s.name = name);
    }

    pub fn set_windows_version(&mut self, version: WinVersion) {
        self.update_settings(|s| s.windows_version = version);
    }

    pub fn set_wine_version(&mut self, version: SemanticVersion) {
        self.update_settings(|s| s.wine_version = version);
    }

    fn save_settings(&self) {
        match self.settings.encode(&self.metadata_path) {
            Ok(()) => debug!("Saved settings for bottle `{}`", self.location.display()),
            Err(e) => error!(
                "Failed to encode settings for bottle `{}`: {}",
                self.metadata_path.display(),
                e
            ),
        }
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Replace the program list.
    ///
    /// Pinned flags are derived from the current pins, and the pinned-program
    /// view is recomputed on its next read.
    pub fn set_programs(&mut self, mut programs: Vec<Program>) {
        for program in &mut programs {
            program.pinned = self.is_pinned(&program.path);
        }
        self.programs = programs;
        self.pinned_cache.invalidate();
    }

    /// Programs not hidden by the blocklist.
    pub fn visible_programs(&self) -> Vec<&Program> {
        self.programs
            .iter()
            .filter(|p| !self.settings.blocklist.contains(&p.path))
            .collect()
    }

    fn is_pinned(&self, path: &Path) -> bool {
        self.settings
            .pins
            .iter()
            .any(|pin| pin.url.as_deref() == Some(path))
    }

    /// Pin a program from the program list.
    ///
    /// Returns `false` if no program lives at `path` or it is already pinned.
    pub fn pin_program(&mut self, path: &Path, removable: bool) -> bool {
        if self.is_pinned(path) {
            return false;
        }
        let Some(program) = self.programs.iter_mut().find(|p| p.is_at(path)) else {
            return false;
        };
        program.pinned = true;
        let pin = PinnedProgram::new(program.name.clone(), path, removable);
        self.update_settings(|s| s.pins.push(pin));
        true
    }

    /// Remove every pin targeting `path`. Returns whether anything changed.
    pub fn unpin_program(&mut self, path: &Path) -> bool {
        if !self.is_pinned(path) {
            return false;
        }
        self.update_settings(|s| s.pins.retain(|pin| pin.url.as_deref() != Some(path)));
        for program in self.programs.iter_mut().filter(|p| p.is_at(path)) {
            program.pinned = false;
        }
        true
    }

    /// Pins whose target still exists, paired with their program.
    ///
    /// Touches the filesystem once per pin, so the result is cached for a
    /// short window.
    pub fn pinned_programs(&self) -> Vec<PinnedProgramEntry> {
        self.pinned_cache.get_or_compute(|| {
            self.settings
                .pins
                .iter()
                .filter_map(|pin| {
                    let url = pin.url.as_ref()?;
                    if !url.exists() {
                        return None;
                    }
                    let program = self.programs.iter().find(|p| p.is_at(url))?;
                    Some(PinnedProgramEntry {
                        pin: pin.clone(),
                        program: program.clone(),
                        id: format!("{}//{}", pin.name, program.path.display()),
                    })
                })
                .collect()
        })
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
    }

    /// Key for case-insensitive ordering by name.
    pub fn sort_key(&self) -> String {
        self.settings.name.to_lowercase()
    }
}

impl PartialEq for Bottle {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Bottle {}

impl Hash for Bottle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
    }
}
