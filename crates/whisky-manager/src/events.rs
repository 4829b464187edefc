//! Registry change notifications.

use std::path::PathBuf;

/// Emitted by [`crate::BottleRegistry`] after a confirmed change.
///
/// Delivered over a `tokio::sync::broadcast` channel; slow subscribers may
/// miss events and should reload from the registry when they do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Records were rebuilt from the bottle list.
    Loaded { count: usize },
    /// A bottle being created is visible as an in-flight record.
    InFlight(PathBuf),
    /// Creation finished and the bottle is registered.
    Created(PathBuf),
    /// Creation failed; the in-flight record is gone.
    CreationFailed { location: PathBuf, message: String },
    /// A bottle was unregistered.
    Removed(PathBuf),
}

impl RegistryEvent {
    /// The bottle this event is about, if it concerns a single bottle.
    pub fn location(&self) -> Option<&PathBuf> {
        match self {
            RegistryEvent::Loaded { .. } => None,
            RegistryEvent::InFlight(location)
            | RegistryEvent::Created(location)
            | RegistryEvent::Removed(location)
            | RegistryEvent::CreationFailed { location, .. } => Some(location),
        }
    }
}
