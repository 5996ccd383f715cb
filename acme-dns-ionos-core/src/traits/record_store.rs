//! Tracked challenge record storage

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{ChallengeKey, TrackedRecord};

/// Per-run mapping from challenge to the record placed for it.
///
/// Provides a default memory implementation, `InMemoryChallengeRecordStore`.
#[async_trait]
pub trait ChallengeRecordStore: Send + Sync {
    /// Track a record, returning the one previously tracked under `key`
    async fn insert(&self, key: ChallengeKey, record: TrackedRecord) -> Option<TrackedRecord>;

    /// Record tracked under `key`
    async fn get(&self, key: &ChallengeKey) -> Option<TrackedRecord>;

    /// Stop tracking `key`
    async fn remove(&self, key: &ChallengeKey) -> Option<TrackedRecord>;

    /// Every tracked entry, ordered by key
    async fn entries(&self) -> Vec<(ChallengeKey, TrackedRecord)>;

    /// Every tracked key, ordered
    async fn keys(&self) -> Vec<ChallengeKey> {
        self.entries().await.into_iter().map(|(k, _)| k).collect()
    }

    /// Whether any key tracks `record_id`
    async fn tracks_record(&self, record_id: &str) -> bool {
        self.entries()
            .await
            .iter()
            .any(|(_, r)| r.record_id == record_id)
    }
}

/// In-memory record store
#[derive(Clone, Default)]
pub struct InMemoryChallengeRecordStore {
    records: Arc<RwLock<HashMap<ChallengeKey, TrackedRecord>>>,
}

impl InMemoryChallengeRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeRecordStore for InMemoryChallengeRecordStore {
    async fn insert(&self, key: ChallengeKey, record: TrackedRecord) -> Option<TrackedRecord> {
        self.records.write().await.insert(key, record)
    }

    async fn get(&self, key: &ChallengeKey) -> Option<TrackedRecord> {
        self.records.read().await.get(key).cloned()
    }

    async fn remove(&self, key: &ChallengeKey) -> Option<TrackedRecord> {
        self.records.write().await.remove(key)
    }

    async fn entries(&self) -> Vec<(ChallengeKey, TrackedRecord)> {
        let mut entries: Vec<_> = self
            .records
            .read()
            .await
            .iter()
            .map(|(k, r)| (k.clone(), r.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
