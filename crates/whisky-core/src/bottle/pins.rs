//! Load-time cleanup of a bottle's pin list.

use super::settings::PinnedProgram;
use crate::platform::MountedVolumes;
use std::collections::HashSet;
use tracing::debug;

/// Drop pins that can no longer be launched.
///
/// In order:
/// - pins without a target are dropped;
/// - a pin whose target was already seen is dropped (first one wins);
/// - a pin whose target is missing is dropped, unless it is removable and its
///   volume is not mounted right now.
pub fn sanitize_pins(pins: Vec<PinnedProgram>) -> Vec<PinnedProgram> {
    sanitize_pins_with(pins, MountedVolumes::current)
}

/// [`sanitize_pins`] against a given set of mounted volumes.
///
/// `volumes` is only called if some removable pin has a missing target.
pub fn sanitize_pins_with<F>(pins: Vec<PinnedProgram>, volumes: F) -> Vec<PinnedProgram>
where
    F: FnOnce() -> MountedVolumes,
{
    let mut seen = HashSet::new();
    let mut volumes = Some(volumes);
    let mut mounted: Option<MountedVolumes> = None;

    pins.into_iter()
        .filter(|pin| {
            let Some(url) = pin.url.as_ref() else {
                debug!("Dropping pin '{}' without a target", pin.name);
                return false;
            };
            if !seen.insert(url.clone()) {
                debug!("Dropping duplicate pin '{}' -> {}", pin.name, url.display());
                return false;
            }
            if url.exists() {
                return true;
            }
            let legally_removed = pin.removable && {
                let mounted = mounted.get_or_insert_with(|| {
                    volumes.take().map(|query| query()).unwrap_or_default()
                });
                !mounted.is_mounted(url)
            };
            if !legally_removed {
                debug!("Dropping pin '{}': {} is gone", pin.name, url.display());
            }
            legally_removed
        })
        .collect()
}
