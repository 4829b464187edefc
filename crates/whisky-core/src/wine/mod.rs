//! WhiskyWine provisioning.
//!
//! This module handles:
//! - Locating the runtime distribution on disk ([`WineLayout`])
//! - Installing it from an archive and uninstalling it ([`WhiskyWineInstaller`])
//! - Reading the local version descriptor and checking the remote one for
//!   updates
//!
//! Install and uninstall are not safe against each other; callers serialize
//! them.

mod descriptor;
mod extract;
mod installer;
mod layout;

pub use descriptor::WineVersionDescriptor;
pub use extract::{ArchiveExtractor, ArchiveUnpacker};
pub use installer::{update_available, UpdateCheck, WhiskyWineInstaller};
pub use layout::WineLayout;
