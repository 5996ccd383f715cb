//! DNS-01 challenge record management
//!
//! Places one TXT record per challenge, remembers which record belongs to which
//! (domain, token) pair and removes exactly that record afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use acme_dns_ionos_provider::{DnsProvider, IonosCredentials, ProviderError, create_provider};

use crate::config::ChallengeConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::propagation::SleepPropagationWaiter;
use crate::services::zone_resolver::{challenge_record_name, resolve_zone};
use crate::traits::{ChallengeRecordStore, InMemoryChallengeRecordStore, PropagationWaiter};
use crate::types::{
    ChallengeKey, CleanupFailure, CleanupReport, CreateTxtRecordRequest, RecordOrigin,
    TrackedRecord, Zone,
};

/// Challenge record manager for one ACME run
pub struct ChallengeRecordManager {
    provider: Arc<dyn DnsProvider>,
    store: Arc<dyn ChallengeRecordStore>,
    waiter: Arc<dyn PropagationWaiter>,
    config: ChallengeConfig,
    /// Zone list, fetched once per run
    zones: RwLock<Option<Vec<Zone>>>,
    /// First authentication failure seen; later setups fail fast
    auth_failure: RwLock<Option<ProviderError>>,
    failures: RwLock<HashMap<ChallengeKey, CleanupFailure>>,
    /// Replaced records whose deletion failed
    displaced: RwLock<Vec<CleanupFailure>>,
    /// Held from the tracked-check until the record is tracked
    placement: Mutex<()>,
}

impl ChallengeRecordManager {
    /// Create a manager with an in-memory store and a sleeping waiter.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `config` fails validation.
    pub fn new(provider: Arc<dyn DnsProvider>, config: ChallengeConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            store: Arc::new(InMemoryChallengeRecordStore::new()),
            waiter: Arc::new(SleepPropagationWaiter),
            config,
            zones: RwLock::new(None),
            auth_failure: RwLock::new(None),
            failures: RwLock::new(HashMap::new()),
            displaced: RwLock::new(Vec::new()),
            placement: Mutex::new(()),
        })
    }

    /// Create a manager talking to IONOS with `credentials`.
    pub fn from_credentials(
        credentials: IonosCredentials,
        config: ChallengeConfig,
    ) -> CoreResult<Self> {
        credentials.validate()?;
        let provider = create_provider(credentials)?;
        Self::new(provider, config)
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ChallengeRecordStore>) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn with_waiter(mut self, waiter: Arc<dyn PropagationWaiter>) -> Self {
        self.waiter = waiter;
        self
    }

    /// Seed the zone list so the first setup skips `list_zones`.
    #[must_use]
    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = RwLock::new(Some(zones));
        self
    }

    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }

    /// Record tracked for (domain, token), if any
    pub async fn tracked(&self, domain: &str, token: &str) -> Option<TrackedRecord> {
        self.store.get(&ChallengeKey::new(domain, token)).await
    }

    // ===== setup =====

    /// Place the challenge record for `domain` and wait for propagation.
    ///
    /// A (domain, token) pair that is already tracked is left alone.
    pub async fn setup(&self, domain: &str, token: &str) -> CoreResult<()> {
        let key = ChallengeKey::new(domain, token);
        if self.place_record(&key).await? {
            self.waiter.wait(self.config.propagation_delay()).await;
        }
        Ok(())
    }

    /// Place every challenge record, then wait once.
    ///
    /// Records are tracked as soon as they exist, so a failure part-way leaves
    /// the earlier ones cleanable.
    pub async fn setup_all<D, T>(&self, challenges: &[(D, T)]) -> CoreResult<()>
    where
        D: AsRef<str>,
        T: AsRef<str>,
    {
        let mut placed = 0_usize;
        for (domain, token) in challenges {
            let key = ChallengeKey::new(domain.as_ref(), token.as_ref());
            if self.place_record(&key).await? {
                placed += 1;
            }
        }
        log::info!("Placed {placed} challenge record(s)");
        if placed > 0 {
            self.waiter.wait(self.config.propagation_delay()).await;
        }
        Ok(())
    }

    /// Create or adopt the record for `key`. Returns whether a record was placed.
    ///
    /// Placements are serialized so that concurrent calls neither duplicate a
    /// record for one key nor adopt the same record for two keys.
    async fn place_record(&self, key: &ChallengeKey) -> CoreResult<bool> {
        let _placing = self.placement.lock().await;

        if let Some(err) = self.auth_failure.read().await.clone() {
            log::warn!("Skipping challenge for '{key}': credentials were rejected earlier");
            return Err(CoreError::Challenge {
                domain: key.domain.clone(),
                zone: None,
                source: err,
            });
        }

        if let Some(existing) = self.store.get(key).await {
            log::debug!(
                "Challenge for '{key}' already tracked as record {}",
                existing.record_id
            );
            return Ok(false);
        }

        let zones = match self.zones().await {
            Ok(zones) => zones,
            Err(e) => return Err(self.challenge_error(key, None, e).await),
        };
        let zone = resolve_zone(&key.domain, &zones).inspect_err(|e| log::warn!("{e}"))?;
        let record_name = challenge_record_name(&key.domain);

        let tracked = match self.find_adoptable(key, &zone, &record_name).await? {
            Some(record_id) => {
                log::info!(
                    "Adopting existing TXT record {record_id} ({record_name}) for '{key}'"
                );
                TrackedRecord {
                    zone_id: zone.id.clone(),
                    zone_name: zone.name.clone(),
                    record_id,
                    record_name,
                    origin: RecordOrigin::Adopted,
                }
            }
            None => {
                let req = CreateTxtRecordRequest::new(&zone.id, &record_name, &key.token)
                    .with_ttl(self.config.record_ttl);
                let provider = &self.provider;
                let req = &req;
                let record = match self
                    .config
                    .retry
                    .run("create TXT record", move || provider.create_txt_record(req))
                    .await
                {
                    Ok(record) => record,
                    Err(e) => return Err(self.challenge_error(key, Some(&zone), e).await),
                };
                log::info!(
                    "Created TXT record {} ({record_name}) in zone '{}' for '{key}'",
                    record.id,
                    zone.name
                );
                TrackedRecord {
                    zone_id: zone.id.clone(),
                    zone_name: zone.name.clone(),
                    record_id: record.id,
                    record_name,
                    origin: RecordOrigin::Created,
                }
            }
        };

        let record_id = tracked.record_id.clone();
        if let Some(previous) = self.store.insert(key.clone(), tracked).await {
            if previous.record_id != record_id {
                self.retire_displaced(key, previous).await;
            }
        }
        Ok(true)
    }

    /// Delete a record that lost its key to a newer one, so it is not orphaned.
    async fn retire_displaced(&self, key: &ChallengeKey, previous: TrackedRecord) {
        log::warn!(
            "Challenge for '{key}' was already tracked as record {}, removing it",
            previous.record_id
        );
        let provider = &self.provider;
        let zone_id = previous.zone_id.as_str();
        let record_id = previous.record_id.as_str();
        let result = self
            .config
            .retry
            .run("delete displaced TXT record", move || {
                provider.delete_record(zone_id, record_id)
            })
            .await;

        if let Err(e) = result {
            log::error!(
                "Failed to remove displaced TXT record {} for '{key}': {e}",
                previous.record_id
            );
            self.displaced.write().await.push(CleanupFailure {
                domain: key.domain.clone(),
                zone_id: previous.zone_id,
                record_id: previous.record_id,
                attempts: 1,
                last_error: e.to_string(),
            });
        }
    }

    /// ID of an existing record with the challenge name and content that no
    /// other challenge of this run tracks. Lookup failures other than
    /// authentication errors are logged and ignored.
    async fn find_adoptable(
        &self,
        key: &ChallengeKey,
        zone: &Zone,
        record_name: &str,
    ) -> CoreResult<Option<String>> {
        let provider = &self.provider;
        let zone_id = zone.id.as_str();
        let found = self
            .config
            .retry
            .run("find TXT records", move || {
                provider.find_txt_records(zone_id, record_name)
            })
            .await;

        let records = match found {
            Ok(records) => records,
            Err(e) if e.is_auth_failure() => {
                return Err(self.challenge_error(key, Some(zone), e).await);
            }
            Err(e) => {
                log::warn!("Could not look up existing records for '{key}', creating a new one: {e}");
                return Ok(None);
            }
        };

        for record in records {
            if record.content == key.token && !self.store.tracks_record(&record.id).await {
                return Ok(Some(record.id));
            }
        }
        Ok(None)
    }

    async fn zones(&self) -> Result<Vec<Zone>, ProviderError> {
        if let Some(zones) = self.zones.read().await.as_ref() {
            return Ok(zones.clone());
        }

        let provider = &self.provider;
        let zones = self
            .config
            .retry
            .run("list zones", move || provider.list_zones())
            .await?;
        log::debug!("Fetched {} zone(s)", zones.len());
        *self.zones.write().await = Some(zones.clone());
        Ok(zones)
    }

    /// Wrap a setup failure, latching authentication errors.
    async fn challenge_error(
        &self,
        key: &ChallengeKey,
        zone: Option<&Zone>,
        err: ProviderError,
    ) -> CoreError {
        if err.is_auth_failure() {
            self.latch_auth_failure(&err).await;
        }
        if err.is_expected() {
            log::warn!("Challenge for '{key}' failed: {err}");
        } else {
            log::error!("Challenge for '{key}' failed: {err}");
        }
        CoreError::Challenge {
            domain: key.domain.clone(),
            zone: zone.map(|z| z.name.clone()),
            source: err,
        }
    }

    async fn latch_auth_failure(&self, err: &ProviderError) {
        let mut latch = self.auth_failure.write().await;
        if latch.is_none() {
            log::error!("Credentials rejected, further challenges in this run will fail: {err}");
            *latch = Some(err.clone());
        }
    }

    // ===== cleanup =====

    /// Remove the record placed for (domain, token).
    ///
    /// Never fails: an unknown pair is a no-op, and a failed deletion is logged
    /// and kept for [`cleanup_report`](Self::cleanup_report) while the pair
    /// stays tracked so a later call can retry.
    pub async fn cleanup(&self, domain: &str, token: &str) {
        self.cleanup_key(&ChallengeKey::new(domain, token)).await;
    }

    /// Clean up every tracked challenge.
    pub async fn cleanup_all(&self) -> CleanupReport {
        let keys = self.store.keys().await;
        futures::future::join_all(keys.iter().map(|key| self.cleanup_key(key))).await;
        self.cleanup_report().await
    }

    /// Failed cleanups and challenges still tracked.
    pub async fn cleanup_report(&self) -> CleanupReport {
        let mut failures: Vec<_> = self.failures.read().await.values().cloned().collect();
        failures.extend(self.displaced.read().await.iter().cloned());
        failures.sort_by(|a, b| a.domain.cmp(&b.domain).then(a.record_id.cmp(&b.record_id)));
        CleanupReport {
            failures,
            outstanding: self.store.keys().await,
        }
    }

    async fn cleanup_key(&self, key: &ChallengeKey) {
        let Some(record) = self.store.get(key).await else {
            log::debug!("No challenge record tracked for '{key}', nothing to clean up");
            return;
        };

        let provider = &self.provider;
        let zone_id = record.zone_id.as_str();
        let record_id = record.record_id.as_str();
        let result = self
            .config
            .retry
            .run("delete TXT record", move || {
                provider.delete_record(zone_id, record_id)
            })
            .await;

        match result {
            Ok(()) => {
                self.store.remove(key).await;
                self.failures.write().await.remove(key);
                log::info!(
                    "Removed TXT record {} ({}) for '{key}'",
                    record.record_id,
                    record.record_name
                );
            }
            Err(e) => {
                if e.is_auth_failure() {
                    self.latch_auth_failure(&e).await;
                }
                let mut failures = self.failures.write().await;
                let failure = failures
                    .entry(key.clone())
                    .or_insert_with(|| CleanupFailure {
                        domain: key.domain.clone(),
                        zone_id: record.zone_id.clone(),
                        record_id: record.record_id.clone(),
                        attempts: 0,
                        last_error: String::new(),
                    });
                failure.attempts += 1;
                failure.last_error = e.to_string();
                if failure.attempts >= 2 {
                    log::error!(
                        "Failed to remove TXT record {} for '{key}' ({} attempts): {e}",
                        record.record_id,
                        failure.attempts
                    );
                } else {
                    log::warn!(
                        "Failed to remove TXT record {} for '{key}': {e}",
                        record.record_id
                    );
                }
            }
        }
    }
}
