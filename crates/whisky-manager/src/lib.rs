//! Whisky Manager - the bottle registry.
//!
//! This crate owns the collection of bottles: the persisted list of bottle
//! directories, the in-memory records built from it, and the pipeline that
//! creates new bottles. Wine itself is reached through the [`WineRuntime`]
//! trait so the registry can be driven without a Wine install.
//!
//! # Modules
//!
//! - `registry` - Load, query and remove bottles
//! - `creation` - Create bottles in the background
//! - `bottle_list` - The persisted list of bottle paths
//! - `runtime` - Wine commands used during creation
//! - `events` - Change notifications for observers

pub mod bottle_list;
pub mod creation;
pub mod events;
pub mod registry;
pub mod runtime;

// Re-export commonly used types
pub use bottle_list::BottleList;
pub use creation::PendingBottle;
pub use events::RegistryEvent;
pub use registry::{BottleRegistry, RegistryConfig, SharedBottle};
pub use runtime::{WineCommand, WineRuntime};

// Re-export whisky-kit types that are commonly needed with the registry
pub use whisky_kit::bottle::WinVersion;
pub use whisky_kit::error::{Result, WhiskyError};
