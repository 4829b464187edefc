//! Whisky Kit - headless library for Whisky bottles and the WhiskyWine runtime.
//!
//! This crate provides the pieces that do not depend on a running registry:
//! bottle records and their settings, the WhiskyWine installer and update
//! check, and the small caching and persistence helpers they share.
//!
//! For the bottle registry and bottle creation, see the `whisky-manager`
//! crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use whisky_kit::wine::{WhiskyWineInstaller, WineLayout};
//!
//! #[tokio::main]
//! async fn main() -> whisky_kit::Result<()> {
//!     let installer = WhiskyWineInstaller::new(WineLayout::default_location()?)?;
//!
//!     if !installer.is_installed() {
//!         installer.install("/tmp/WhiskyWine.tar.gz".as_ref()).await?;
//!     }
//!
//!     let update = installer.check_for_update().await;
//!     if update.available {
//!         println!("WhiskyWine {} is available", update.remote_version);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bottle;
pub mod cache;
pub mod config;
pub mod error;
pub mod metadata;
pub mod platform;
pub mod version;
pub mod wine;

// Re-export commonly used types
pub use bottle::{Bottle, BottleSettings, PinnedProgram, PinnedProgramEntry, Program, WinVersion};
pub use cache::TimedCache;
pub use error::{Result, WhiskyError};
pub use version::SemanticVersion;
pub use wine::{UpdateCheck, WhiskyWineInstaller, WineLayout};
