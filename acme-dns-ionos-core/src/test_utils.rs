//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use acme_dns_ionos_provider::{
    CreateTxtRecordRequest, DnsProvider, ProviderError, Result, RetryPolicy, TxtRecord, Zone,
};

use crate::config::ChallengeConfig;
use crate::services::ChallengeRecordManager;
use crate::traits::PropagationWaiter;

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "mock".to_string(),
        detail: "connection reset".to_string(),
    }
}

pub fn auth_error() -> ProviderError {
    ProviderError::InvalidCredentials {
        provider: "mock".to_string(),
        raw_message: Some("bad key".to_string()),
    }
}

// ===== MockDnsProvider =====

#[derive(Debug, Clone)]
pub enum Call {
    ListZones,
    Find { zone_id: String, name: String },
    Create(CreateTxtRecordRequest),
    Delete { zone_id: String, record_id: String },
}

/// In-memory DNS provider recording every call.
///
/// Record ids are handed out as `r1`, `r2`, ... Queued failures are returned
/// by the next call of the matching operation.
pub struct MockDnsProvider {
    zones: Vec<Zone>,
    records: RwLock<HashMap<String, TxtRecord>>,
    next_id: AtomicU32,
    calls: Mutex<Vec<Call>>,
    list_failures: Mutex<VecDeque<ProviderError>>,
    find_failures: Mutex<VecDeque<ProviderError>>,
    create_failures: Mutex<VecDeque<ProviderError>>,
    delete_failures: Mutex<VecDeque<ProviderError>>,
    latency: Duration,
}

impl MockDnsProvider {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self {
            zones,
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            calls: Mutex::new(Vec::new()),
            list_failures: Mutex::new(VecDeque::new()),
            find_failures: Mutex::new(VecDeque::new()),
            create_failures: Mutex::new(VecDeque::new()),
            delete_failures: Mutex::new(VecDeque::new()),
            latency: Duration::ZERO,
        }
    }

    /// Delay lookups and creates, letting concurrent callers interleave
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn next_record_id(&self) -> String {
        format!("r{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Put a record on the "server" without recording a call
    pub async fn seed_record(&self, zone_id: &str, name: &str, content: &str) -> String {
        let id = self.next_record_id();
        self.records.write().await.insert(
            id.clone(),
            TxtRecord {
                id: id.clone(),
                zone_id: zone_id.to_string(),
                name: name.to_string(),
                content: content.to_string(),
                ttl: 60,
                disabled: false,
                changed_at: None,
            },
        );
        id
    }

    pub async fn fail_next_list(&self, err: ProviderError) {
        self.list_failures.lock().await.push_back(err);
    }

    pub async fn fail_next_find(&self, err: ProviderError) {
        self.find_failures.lock().await.push_back(err);
    }

    pub async fn fail_next_create(&self, err: ProviderError) {
        self.create_failures.lock().await.push_back(err);
    }

    pub async fn fail_next_delete(&self, err: ProviderError) {
        self.delete_failures.lock().await.push_back(err);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().await.iter().filter(|c| pred(c)).count()
    }

    /// Every create request, in order
    pub async fn creates(&self) -> Vec<CreateTxtRecordRequest> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                Call::Create(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every delete attempt as (zone id, record id), in order
    pub async fn deletes(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                Call::Delete { zone_id, record_id } => Some((zone_id.clone(), record_id.clone())),
                _ => None,
            })
            .collect()
    }

    /// Records currently on the "server"
    pub async fn remote_records(&self) -> Vec<TxtRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.calls.lock().await.push(Call::ListZones);
        if let Some(err) = self.list_failures.lock().await.pop_front() {
            return Err(err);
        }
        Ok(self.zones.clone())
    }

    async fn create_txt_record(&self, req: &CreateTxtRecordRequest) -> Result<TxtRecord> {
        self.calls.lock().await.push(Call::Create(req.clone()));
        self.round_trip().await;
        if let Some(err) = self.create_failures.lock().await.pop_front() {
            return Err(err);
        }
        let record = TxtRecord {
            id: self.next_record_id(),
            zone_id: req.zone_id.clone(),
            name: req.name.clone(),
            content: req.content.clone(),
            ttl: req.ttl,
            disabled: false,
            changed_at: None,
        };
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.calls.lock().await.push(Call::Delete {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
        });
        if let Some(err) = self.delete_failures.lock().await.pop_front() {
            return Err(err);
        }
        self.records.write().await.remove(record_id);
        Ok(())
    }

    async fn find_txt_records(&self, zone_id: &str, name: &str) -> Result<Vec<TxtRecord>> {
        self.round_trip().await;
        self.calls.lock().await.push(Call::Find {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
        });
        if let Some(err) = self.find_failures.lock().await.pop_front() {
            return Err(err);
        }
        let mut found: Vec<_> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.zone_id == zone_id && r.name == name)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}

// ===== RecordingWaiter =====

/// Propagation waiter that returns immediately and remembers each delay
#[derive(Default)]
pub struct RecordingWaiter {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingWaiter {
    pub async fn waits(&self) -> Vec<Duration> {
        self.waits.lock().await.clone()
    }
}

#[async_trait]
impl PropagationWaiter for RecordingWaiter {
    async fn wait(&self, delay: Duration) {
        self.waits.lock().await.push(delay);
    }
}

// ===== Factories =====

/// Manager over `provider` with immediate retries (3 attempts) and a recording waiter
pub fn test_manager(
    provider: &Arc<MockDnsProvider>,
) -> (ChallengeRecordManager, Arc<RecordingWaiter>) {
    let waiter = Arc::new(RecordingWaiter::default());
    let config = ChallengeConfig {
        retry: RetryPolicy::immediate(3),
        ..ChallengeConfig::default()
    };
    let manager = ChallengeRecordManager::new(provider.clone(), config)
        .expect("valid test config")
        .with_waiter(waiter.clone());
    (manager, waiter)
}
