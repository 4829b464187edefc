//! Mounted volume lookup for pinned program targets.
//!
//! A pin marked removable may point at a disk that is simply not plugged in.
//! Such a pin is kept even though its target is missing, as long as no
//! mounted volume other than the system root holds the target.

use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::debug;

/// One mounted disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedVolume {
    pub mount_point: PathBuf,
    pub removable: bool,
}

impl MountedVolume {
    pub fn new(mount_point: impl Into<PathBuf>, removable: bool) -> Self {
        Self {
            mount_point: mount_point.into(),
            removable,
        }
    }

    /// Whether this is the root of the filesystem (`/`, `C:\`).
    pub fn is_system_root(&self) -> bool {
        self.mount_point.parent().is_none()
    }
}

/// Snapshot of the disks mounted right now.
#[derive(Debug, Clone, Default)]
pub struct MountedVolumes {
    volumes: Vec<MountedVolume>,
}

impl MountedVolumes {
    /// Query the operating system for mounted disks.
    pub fn current() -> Self {
        let disks = Disks::new_with_refreshed_list();
        let volumes: Vec<MountedVolume> = disks
            .list()
            .iter()
            .map(|disk| MountedVolume::new(disk.mount_point(), disk.is_removable()))
            .collect();
        debug!("Found {} mounted volumes", volumes.len());
        Self { volumes }
    }

    pub fn from_volumes(volumes: impl IntoIterator<Item = MountedVolume>) -> Self {
        Self {
            volumes: volumes.into_iter().collect(),
        }
    }

    pub fn volumes(&self) -> &[MountedVolume] {
        &self.volumes
    }

    /// The volume holding `path`: the one whose mount point is the longest
    /// prefix of it.
    pub fn volume_of(&self, path: &Path) -> Option<&MountedVolume> {
        self.volumes
            .iter()
            .filter(|volume| path.starts_with(&volume.mount_point))
            .max_by_key(|volume| volume.mount_point.components().count())
    }

    /// Whether `path` lives on a mounted volume other than the system root.
    ///
    /// A target under a directory nobody mounted resolves to the system root
    /// and so counts as unmounted.
    pub fn is_mounted(&self, path: &Path) -> bool {
        match self.volume_of(path) {
            Some(volume) if !volume.is_system_root() => {
                debug!(
                    "{} is on {} (removable: {})",
                    path.display(),
                    volume.mount_point.display(),
                    volume.removable
                );
                true
            }
            _ => false,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sample() -> MountedVolumes {
        MountedVolumes::from_volumes([
            MountedVolume::new("/", false),
            MountedVolume::new("/home", false),
            MountedVolume::new("/media/alex/USB", true),
        ])
    }

    #[test]
    fn test_longest_mount_point_wins() {
        let volumes = sample();
        assert_eq!(
            volumes.volume_of(Path::new("/media/alex/USB/Games/game.exe")),
            Some(&MountedVolume::new("/media/alex/USB", true))
        );
        assert_eq!(
            volumes.volume_of(Path::new("/home/alex/app.exe")),
            Some(&MountedVolume::new("/home", false))
        );
        assert_eq!(
            volumes.volume_of(Path::new("/opt/app.exe")),
            Some(&MountedVolume::new("/", false))
        );
    }

    #[test]
    fn test_prefix_is_matched_per_component() {
        let volumes = sample();
        // `/media/alex/USB2` is not under `/media/alex/USB`.
        assert!(!volumes.is_mounted(Path::new("/media/alex/USB2/game.exe")));
    }

    #[test]
    fn test_unlisted_directory_is_not_mounted() {
        let volumes = sample();
        assert!(volumes.is_mounted(Path::new("/media/alex/USB/game.exe")));
        assert!(volumes.is_mounted(Path::new("/home/alex/game.exe")));
        assert!(!volumes.is_mounted(Path::new("/mnt/usb/Games/game.exe")));
        assert!(!volumes.is_mounted(Path::new("/data/usb-drive/game.exe")));
    }

    #[test]
    fn test_system_root() {
        assert!(MountedVolume::new("/", false).is_system_root());
        assert!(!MountedVolume::new("/Volumes/USB", true).is_system_root());
    }

    #[test]
    fn test_current_does_not_panic() {
        let volumes = MountedVolumes::current();
        let _ = volumes.is_mounted(Path::new("/"));
    }
}
