//! Freshness-checked response cache with an injected clock.
//!
//! Stats queries scan the whole grid table, so the handler keeps the
//! last result for a short TTL. The clock is a trait so freshness is
//! testable without wall-clock sleeps.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Time source for freshness checks.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A single-value cache holding `(value, timestamp)`, valid for a fixed
/// TTL against the injected clock.
pub struct TimedCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<(T, DateTime<Utc>)>>,
}

impl<T: Clone> TimedCache<T> {
    /// Creates an empty cache with the given TTL and clock.
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value if it is still fresh.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().expect("cache mutex poisoned");
        let (value, stored_at) = slot.as_ref()?;
        if self.clock.now() - *stored_at < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    /// Stores a fresh value, stamping it with the clock.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    pub fn put(&self, value: T) {
        let mut slot = self.slot.lock().expect("cache mutex poisoned");
        *slot = Some((value, self.clock.now()));
    }

    /// Drops any cached value so the next read recomputes.
    ///
    /// # Panics
    ///
    /// Panics if the cache mutex is poisoned.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("cache mutex poisoned");
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A clock tests can move forward by hand.
    struct FakeClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FakeClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Utc::now()),
            })
        }

        fn advance(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += duration;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    #[test]
    fn fresh_value_is_served() {
        let clock = FakeClock::new();
        let clock_dyn: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
        let cache = TimedCache::new(Duration::seconds(60), clock_dyn);

        assert!(cache.get().is_none());
        cache.put(42);
        assert_eq!(cache.get(), Some(42));
    }

    #[test]
    fn stale_value_expires_without_sleeping() {
        let clock = FakeClock::new();
        let clock_dyn: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
        let cache = TimedCache::new(Duration::seconds(60), clock_dyn);

        cache.put(42);
        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get(), Some(42));

        clock.advance(Duration::seconds(2));
        assert!(cache.get().is_none());
    }

    #[test]
    fn invalidate_clears_immediately() {
        let clock = FakeClock::new();
        let clock_dyn: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
        let cache = TimedCache::new(Duration::seconds(60), clock_dyn);

        cache.put(7);
        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
