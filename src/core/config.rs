//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the plugin runtime.
//!
//! Config is used in two ways:
//! 1. **Plugin creation**: `Plugin::builder(config)`
//! 2. **Request defaults**: [`Config::default_request`] seeds requests that omit `numberOfAds`
//!
//! ## Sentinel values
//! - `load_timeout = 0s` → no timeout (loader futures may run forever)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::loader::AdRequest;

/// Global configuration for the plugin runtime.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `load_timeout`: Upper bound for one loader call (`0s` = no timeout)
/// - `default_ad_count`: Ads requested per load when the host does not say (min 1)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Maximum time a single load may take before it fails with `AdLoadError::Timeout`.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = applied per load
    pub load_timeout: Duration,

    /// Number of ads requested when a `setAdUnit` call does not carry `numberOfAds`.
    pub default_ad_count: u32,
}

impl Config {
    /// Returns the load timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → timeout applied per load
    #[inline]
    pub fn load_timeout(&self) -> Option<Duration> {
        if self.load_timeout == Duration::ZERO {
            None
        } else {
            Some(self.load_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Request used when the host sends none.
    #[inline]
    pub fn default_request(&self) -> AdRequest {
        AdRequest::default().with_ad_count(self.default_ad_count)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `load_timeout = 0s` (no timeout)
    /// - `default_ad_count = 1`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            load_timeout: Duration::ZERO,
            default_ad_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinels() {
        let cfg = Config {
            bus_capacity: 0,
            load_timeout: Duration::ZERO,
            default_ad_count: 0,
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.load_timeout(), None);
        assert_eq!(cfg.default_request().ad_count, 1);
    }

    #[test]
    fn test_timeout_passthrough() {
        let cfg = Config {
            load_timeout: Duration::from_secs(3),
            ..Config::default()
        };
        assert_eq!(cfg.load_timeout(), Some(Duration::from_secs(3)));
    }
}
