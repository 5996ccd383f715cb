//! Run configuration
//!
//! Settings can be deserialized with serde (every field has a default) or
//! parsed from the string map of a certbot credentials file, where keys carry
//! the `dns_ionos_` prefix.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use acme_dns_ionos_provider::{DEFAULT_CHALLENGE_TTL, RetryPolicy};

use crate::error::{CoreError, CoreResult};
use crate::services::{DEFAULT_PROPAGATION_SECONDS, MAX_PROPAGATION_SECONDS};

/// Lowest TTL IONOS accepts (seconds)
pub const MIN_RECORD_TTL: u32 = 60;
/// Highest TTL accepted (seconds)
pub const MAX_RECORD_TTL: u32 = 86_400;

const KEY_PREFIX: &str = "dns_ionos_";

/// Challenge run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Seconds to wait after placing records
    pub propagation_seconds: u64,
    /// TTL of created TXT records
    pub record_ttl: u32,
    /// Retry policy for remote calls
    pub retry: RetryPolicy,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            propagation_seconds: DEFAULT_PROPAGATION_SECONDS,
            record_ttl: DEFAULT_CHALLENGE_TTL,
            retry: RetryPolicy::default(),
        }
    }
}

impl ChallengeConfig {
    /// Parse `propagation_seconds` and `ttl` from a string map; absent keys keep
    /// their defaults. Keys may carry the `dns_ionos_` prefix.
    pub fn from_map(map: &HashMap<String, String>) -> CoreResult<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(map, "propagation_seconds") {
            config.propagation_seconds = parse_number("propagation_seconds", raw)?;
        }
        if let Some(raw) = lookup(map, "ttl") {
            config.record_ttl = parse_number("ttl", raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.propagation_seconds > MAX_PROPAGATION_SECONDS {
            return Err(CoreError::InvalidConfig(format!(
                "propagation_seconds must be at most {MAX_PROPAGATION_SECONDS}, got {}",
                self.propagation_seconds
            )));
        }
        if !(MIN_RECORD_TTL..=MAX_RECORD_TTL).contains(&self.record_ttl) {
            return Err(CoreError::InvalidConfig(format!(
                "ttl must be between {MIN_RECORD_TTL} and {MAX_RECORD_TTL}, got {}",
                self.record_ttl
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(CoreError::InvalidConfig(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter) {
            return Err(CoreError::InvalidConfig(format!(
                "retry.jitter must be between 0 and 1, got {}",
                self.retry.jitter
            )));
        }
        Ok(())
    }

    pub fn propagation_delay(&self) -> Duration {
        Duration::from_secs(self.propagation_seconds)
    }
}

fn lookup<'a>(map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    map.get(key)
        .or_else(|| map.get(&format!("{KEY_PREFIX}{key}")))
        .map(|v| v.trim())
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> CoreResult<T> {
    raw.parse().map_err(|_| {
        CoreError::InvalidConfig(format!(
            "{field} must be a non-negative integer, got '{raw}'"
        ))
    })
}
