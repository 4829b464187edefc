//! Bottles: isolated Wine prefixes with their settings, programs and pins.
//!
//! A [`Bottle`] is identified by its directory. Settings live next to it in
//! `Metadata.json` and are saved on every change; programs are supplied by
//! whoever scans the prefix.

mod pins;
mod program;
mod record;
mod settings;

pub use pins::{sanitize_pins, sanitize_pins_with};
pub use program::{Program, ProgramsExt};
pub use record::{Bottle, PinnedProgramEntry};
pub use settings::{BottleSettings, PinnedProgram, WinVersion};
