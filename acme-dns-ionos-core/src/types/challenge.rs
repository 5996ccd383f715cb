//! Challenge bookkeeping types

use serde::{Deserialize, Serialize};

use acme_dns_ionos_provider::normalize_domain_name;

use crate::error::{CoreError, CoreResult};

/// Identifies one DNS-01 challenge within a run.
///
/// The domain is lower-cased with the trailing dot removed; a wildcard label is
/// kept, so `example.com` and `*.example.com` are distinct keys even though
/// their records share a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChallengeKey {
    pub domain: String,
    pub token: String,
}

impl ChallengeKey {
    pub fn new(domain: &str, token: impl Into<String>) -> Self {
        Self {
            domain: normalize_domain_name(domain),
            token: token.into(),
        }
    }
}

impl std::fmt::Display for ChallengeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.domain)
    }
}

/// How a tracked record came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordOrigin {
    /// Created by this run
    Created,
    /// Found with matching content, left over from an earlier run
    Adopted,
}

/// A challenge record this run is responsible for removing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRecord {
    pub zone_id: String,
    pub zone_name: String,
    pub record_id: String,
    pub record_name: String,
    pub origin: RecordOrigin,
}

/// A challenge record whose removal failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupFailure {
    pub domain: String,
    pub zone_id: String,
    pub record_id: String,
    /// Number of cleanup calls that failed for this challenge
    pub attempts: u32,
    pub last_error: String,
}

/// Outcome of cleaning up a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Records whose deletion failed, ordered by domain
    pub failures: Vec<CleanupFailure>,
    /// Challenges still tracked, ordered by domain
    pub outstanding: Vec<ChallengeKey>,
}

impl CleanupReport {
    /// Nothing is left behind
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.outstanding.is_empty()
    }

    /// Turn outstanding failures into [`CoreError::CleanupIncomplete`].
    pub fn into_result(self) -> CoreResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(CoreError::CleanupIncomplete {
                failures: self.failures,
            })
        }
    }
}
