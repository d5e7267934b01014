//! Tunables of the key derivation engine.
//!
//! None of these affect the derived keys; they only trade memory for speed.

use crate::{
    constant::{DEFAULT_POINT_CACHE_CAPACITY, PRECOMP_WINDOW_SIZE},
    KeyError,
};
use banderwagon::committer::{MAX_WINDOW_SIZE, MIN_WINDOW_SIZE};
use serde::{Deserialize, Serialize};

/// Configuration of a [`TreeKeyDeriver`](crate::TreeKeyDeriver) and its
/// [`PointCache`](crate::PointCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    /// Window size of the precomputed commitment tables. Each table holds
    /// about `256 / w * 2^(w-1)` points per generator.
    pub precomp_window_size: usize,
    /// Maximum number of evaluated address points kept in memory.
    pub point_cache_capacity: u32,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            precomp_window_size: PRECOMP_WINDOW_SIZE,
            point_cache_capacity: DEFAULT_POINT_CACHE_CAPACITY,
        }
    }
}

impl DeriverConfig {
    pub fn validate(&self) -> Result<(), KeyError> {
        if !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&self.precomp_window_size) {
            return Err(KeyError::InvalidConfig {
                message: "precomp_window_size must be between 2 and 16",
            });
        }
        if self.point_cache_capacity == 0 {
            return Err(KeyError::InvalidConfig {
                message: "point_cache_capacity must be non-zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(DeriverConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: DeriverConfig =
            serde_json::from_str(r#"{ "precomp_window_size": 8 }"#).unwrap();
        assert_eq!(config.precomp_window_size, 8);
        assert_eq!(config.point_cache_capacity, DEFAULT_POINT_CACHE_CAPACITY);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let too_small = DeriverConfig {
            precomp_window_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            too_small.validate(),
            Err(KeyError::InvalidConfig { .. })
        ));

        let no_cache = DeriverConfig {
            point_cache_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_cache.validate(),
            Err(KeyError::InvalidConfig { .. })
        ));
    }
}
