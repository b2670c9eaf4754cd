#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Process-wide TTL cache for resolved temperatures.
//!
//! Maps a [`CoordinateKey`] to the temperature last fetched for it. Entries
//! expire a fixed duration after insertion and are checked lazily on
//! lookup; there is no capacity bound, no eviction sweep, and no
//! persistence across restarts. The cache is constructed once at startup
//! and shared by `Arc` across requests — tests construct their own isolated
//! instances.
//!
//! Concurrent first-time lookups for the same key are **not** collapsed:
//! the cache only dedupes completed fetches, so two rows racing on a cold
//! key can both go to the network. Callers own that trade-off.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use weather_report_models::CoordinateKey;

/// Default entry lifetime: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: f64,
    expires_at: Instant,
}

/// TTL map from coordinate key to temperature (degrees Celsius).
#[derive(Debug)]
pub struct TemperatureCache {
    ttl: Duration,
    entries: Mutex<HashMap<CoordinateKey, Entry>>,
}

impl Default for TemperatureCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TemperatureCache {
    /// Creates an empty cache whose entries live for `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached temperature for `key`, or `None` if the key is
    /// absent or its entry has expired.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn get(&self, key: &CoordinateKey) -> Option<f64> {
        let entries = self.entries.lock().expect("temperature cache mutex poisoned");
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value)
    }

    /// Whether `key` has a still-valid entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn has(&self, key: &CoordinateKey) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` for `key` with a fresh expiry, overwriting any prior
    /// entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    pub fn set(&self, key: CoordinateKey, value: f64) {
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.lock().expect("temperature cache mutex poisoned");
        if entries.insert(key.clone(), Entry { value, expires_at }).is_some() {
            log::debug!("Refreshed cache entry for '{key}'");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_report_models::CoordinatePair;

    fn key(lat: &str, lon: &str) -> CoordinateKey {
        CoordinatePair {
            latitude: lat.to_owned(),
            longitude: lon.to_owned(),
        }
        .cache_key()
    }

    #[test]
    fn hit_within_ttl() {
        let cache = TemperatureCache::default();
        let k = key("40.7", "-74.0");
        assert!(!cache.has(&k));

        cache.set(k.clone(), 15.0);
        assert!(cache.has(&k));
        assert_eq!(cache.get(&k), Some(15.0));
    }

    #[test]
    fn miss_after_expiry() {
        let cache = TemperatureCache::new(Duration::from_millis(10));
        let k = key("40.7", "-74.0");
        cache.set(k.clone(), 15.0);
        assert_eq!(cache.get(&k), Some(15.0));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&k), None);
        assert!(!cache.has(&k));
    }

    #[test]
    fn set_overwrites_and_refreshes() {
        let cache = TemperatureCache::new(Duration::from_millis(50));
        let k = key("34.0", "-118.2");
        cache.set(k.clone(), 22.0);

        std::thread::sleep(Duration::from_millis(30));
        cache.set(k.clone(), 23.5);

        // The first entry's expiry has passed, but the overwrite reset it.
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&k), Some(23.5));
    }

    #[test]
    fn textually_distinct_keys_are_independent() {
        let cache = TemperatureCache::default();
        cache.set(key("40.7", "-74.0"), 15.0);
        assert_eq!(cache.get(&key("40.70", "-74.0")), None);
    }
}
