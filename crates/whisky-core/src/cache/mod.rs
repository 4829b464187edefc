//! In-memory caches shared by bottles and the registry.
//!
//! Every short-lived cached view in the crate (pinned programs, registry load
//! freshness, active bottle count) goes through [`TimedCache`], so expiry and
//! invalidation behave the same everywhere.

mod timed;

pub use timed::TimedCache;
