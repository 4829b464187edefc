//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here:
//! - `paths` - per-user application and container directories
//! - `volumes` - mapping a path to the mounted disk it lives on

pub mod paths;
pub mod volumes;

pub use paths::{application_folder, container_folder};
pub use volumes::{MountedVolume, MountedVolumes};
