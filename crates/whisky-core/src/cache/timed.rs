//! Single-value cache with an optional validity window.

use mini_moka::sync::Cache;
use std::fmt;
use std::time::Duration;

/// Holds at most one value, valid for `window` after it was stored.
///
/// A cache built with [`TimedCache::unbounded`] keeps its value until
/// [`TimedCache::invalidate`] is called.
pub struct TimedCache<T> {
    slot: Cache<(), T>,
    window: Option<Duration>,
}

impl<T> TimedCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a cache whose value expires `window` after insertion.
    pub fn new(window: Duration) -> Self {
        Self {
            slot: Cache::builder().time_to_live(window).build(),
            window: Some(window),
        }
    }

    /// Create a cache whose value only goes away on invalidation.
    pub fn unbounded() -> Self {
        Self {
            slot: Cache::builder().build(),
            window: None,
        }
    }

    /// The configured validity window, if any.
    pub fn window(&self) -> Option<Duration> {
        self.window
    }

    /// Current value, if one was stored and has not expired.
    pub fn get(&self) -> Option<T> {
        self.slot.get(&())
    }

    /// Store a value, restarting the validity window.
    pub fn insert(&self, value: T) {
        self.slot.insert((), value);
    }

    /// Drop the current value so the next read recomputes.
    pub fn invalidate(&self) {
        self.slot.invalidate(&());
    }

    /// Return the cached value or compute, store and return a fresh one.
    pub fn get_or_compute<F>(&self, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get() {
            return value;
        }
        let value = compute();
        self.insert(value.clone());
        value
    }
}

impl<T> fmt::Debug for TimedCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedCache")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_or_compute_reuses_value() {
        let cache = TimedCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);

        let first = cache.get_or_compute(|| {
            calls.set(calls.get() + 1);
            7
        });
        let second = cache.get_or_compute(|| {
            calls.set(calls.get() + 1);
            8
        });

        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let cache = TimedCache::new(Duration::from_secs(60));
        cache.insert("old".to_string());
        cache.invalidate();

        assert_eq!(cache.get(), None);
        assert_eq!(cache.get_or_compute(|| "new".to_string()), "new");
    }

    #[test]
    fn test_value_expires_after_window() {
        let cache = TimedCache::new(Duration::from_millis(50));
        cache.insert(1u32);
        assert_eq!(cache.get(), Some(1));

        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn test_unbounded_keeps_value() {
        let cache = TimedCache::unbounded();
        assert_eq!(cache.window(), None);

        cache.insert(3usize);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(), Some(3));
    }
}
