//! JSON document persistence.
//!
//! Bottle metadata, the bottle list and the WhiskyWine version descriptor are
//! all small JSON documents written with [`write_json_atomic`].

mod atomic;

pub use atomic::{read_json, write_json_atomic};
