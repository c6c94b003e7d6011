//! Cache coordinator
//!
//! Owns every cache entry. Reads are deduplicated per key, results are
//! committed only by the most recently issued request for that key, and
//! successful mutations invalidate the views listed in [`Mutation`].
//!
//! All bookkeeping happens under a `parking_lot` mutex that is never held
//! across an `.await`; the only suspension points are port calls, which run
//! on spawned tasks so a dropped reader never strands an entry in
//! `Loading`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adsync_domain::{
    AdSyncError, FullSyncResult, Result, SyncAccountStructureRequest, SyncJob, SyncResult,
    SyncSearchTermsRequest,
};
use chrono::Utc;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::entry::{CacheEntry, EntrySnapshot, EntryStatus, FetchFuture, InFlight};
use super::invalidation::Mutation;
use super::key::{KeyParam, KeyPattern, ResourceKey, ResourceKind};
use crate::resources::ports::AdsResourcePort;
use crate::resources::{ResourceData, ResourceRequest};

/// Coordinator tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a successful entry is served without refetching.
    /// `None` keeps it fresh until invalidated.
    pub stale_after: Option<Duration>,
}

/// Backlog kept for slow sync-jobs listeners before they start lagging.
const SYNC_JOBS_BACKLOG: usize = 16;

/// A successful sync-jobs read that was committed to its entry
#[derive(Debug, Clone)]
pub struct SyncJobsUpdate {
    /// Customer the jobs belong to.
    pub customer_id: String,
    /// Generation of the read that produced `jobs`.
    pub generation: u64,
    /// The committed `SyncJobs` data.
    pub jobs: Arc<ResourceData>,
}

impl SyncJobsUpdate {
    /// Whether any job is still pending or running.
    pub fn has_active_jobs(&self) -> bool {
        self.jobs
            .as_sync_jobs()
            .is_some_and(|jobs| jobs.iter().any(SyncJob::is_active))
    }
}

struct Inner {
    port: Arc<dyn AdsResourcePort>,
    entries: Mutex<HashMap<ResourceKey, CacheEntry>>,
    /// Shared by all keys so a generation is never reused, even after an
    /// entry was removed and recreated.
    generations: AtomicU64,
    sync_jobs: broadcast::Sender<SyncJobsUpdate>,
    config: CacheConfig,
}

/// Cheaply cloneable handle to one cache
#[derive(Clone)]
pub struct CacheCoordinator {
    inner: Arc<Inner>,
}

impl CacheCoordinator {
    /// Empty cache over `port` with the default config.
    pub fn new(port: Arc<dyn AdsResourcePort>) -> Self {
        Self::with_config(port, CacheConfig::default())
    }

    /// Empty cache over `port` tuned by `config`.
    pub fn with_config(port: Arc<dyn AdsResourcePort>, config: CacheConfig) -> Self {
        let (sync_jobs, _) = broadcast::channel(SYNC_JOBS_BACKLOG);
        Self {
            inner: Arc::new(Inner {
                port,
                entries: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                sync_jobs,
                config,
            }),
        }
    }

    /// The port every read goes through.
    pub fn port(&self) -> &Arc<dyn AdsResourcePort> {
        &self.inner.port
    }

    pub fn config(&self) -> CacheConfig {
        self.inner.config
    }

    /// Every successful sync-jobs read committed after this call, whoever
    /// issued it.
    pub fn sync_jobs_updates(&self) -> broadcast::Receiver<SyncJobsUpdate> {
        self.inner.sync_jobs.subscribe()
    }

    /// Generation of the most recently issued read; later reads get a
    /// higher one.
    pub fn current_generation(&self) -> u64 {
        self.inner.generations.load(Ordering::SeqCst)
    }

    /// Read through the cache.
    ///
    /// - Disabled requests (a required parameter is missing) return an
    ///   `Idle` snapshot without creating an entry or calling the port.
    /// - A request already in flight for the same key is joined.
    /// - Fresh success, and an error nobody invalidated, are served as is.
    /// - Anything else starts a fetch.
    #[instrument(level = "debug", skip_all, fields(key = %request.key()))]
    pub async fn query(&self, request: ResourceRequest) -> EntrySnapshot {
        let key = request.key();
        if !request.is_enabled() {
            debug!(missing = ?request.missing_params(), "read disabled");
            return self.snapshot(&key);
        }

        let started = {
            let mut entries = self.inner.entries.lock();
            let entry =
                entries.entry(key.clone()).or_insert_with(|| CacheEntry::new(request.clone()));

            if let Some(in_flight) = &entry.in_flight {
                debug!(generation = in_flight.generation, "joining in-flight read");
                Ok(in_flight.future.clone())
            } else if self.is_fresh(entry) {
                debug!("serving cached data");
                return entry.snapshot();
            } else if entry.status == EntryStatus::Error && !entry.invalidated {
                return entry.snapshot();
            } else {
                self.start_fetch(entry)
            }
        };

        match started {
            Ok(future) => self.settle(&key, future).await,
            Err(error) => self.record_failure(&key, error),
        }
    }

    /// Issue a new read for `request`, superseding any in-flight one, and
    /// wait until the entry settles.
    #[instrument(level = "debug", skip_all, fields(key = %request.key()))]
    pub async fn refetch(&self, request: ResourceRequest) -> EntrySnapshot {
        let key = request.key();
        if !request.is_enabled() {
            debug!(missing = ?request.missing_params(), "refetch disabled");
            return self.snapshot(&key);
        }

        match self.supersede(&request) {
            Ok(future) => self.settle(&key, future).await,
            Err(error) => self.record_failure(&key, error),
        }
    }

    /// Issue a new read and return its own outcome.
    ///
    /// The result is still committed to the entry if no later read was
    /// issued for the same key. Disabled requests fail with `Validation`
    /// naming the first missing parameter.
    pub async fn fetch(&self, request: ResourceRequest) -> Result<Arc<ResourceData>> {
        if let Some(param) = request.missing_params().first() {
            return Err(AdSyncError::missing_param(param.wire_name()));
        }
        self.supersede(&request)?.await
    }

    /// Read straight from the port without touching any entry.
    pub async fn fetch_uncached(&self, request: &ResourceRequest) -> Result<ResourceData> {
        self.inner.port.fetch(request).await?.expect_kind(request.kind())
    }

    /// Current state of `key`; `Idle` if there is no entry.
    pub fn snapshot(&self, key: &ResourceKey) -> EntrySnapshot {
        self.inner
            .entries
            .lock()
            .get(key)
            .map_or_else(|| EntrySnapshot::idle(key.clone()), CacheEntry::snapshot)
    }

    /// Watch an entry. Holding the receiver marks the entry as observed, so
    /// invalidation refetches it instead of dropping it.
    ///
    /// Subscribing does not start a read.
    pub fn subscribe(&self, request: ResourceRequest) -> watch::Receiver<EntrySnapshot> {
        let key = request.key();
        let mut entries = self.inner.entries.lock();
        entries.entry(key).or_insert_with(|| CacheEntry::new(request)).subscribe()
    }

    /// Invalidate every entry matching `pattern`.
    ///
    /// Observed entries go back to `Loading` (keeping their data) and are
    /// refetched; unobserved ones are dropped so the next read refetches.
    /// Nothing is created for keys without an entry. Returns the number of
    /// entries touched.
    #[instrument(level = "debug", skip_all, fields(pattern = %pattern))]
    pub fn invalidate(&self, pattern: &KeyPattern) -> usize {
        let runtime = Handle::try_current().ok();
        let mut entries = self.inner.entries.lock();
        let keys: Vec<ResourceKey> =
            entries.keys().filter(|key| pattern.matches(key)).cloned().collect();

        for key in &keys {
            let observed = entries.get(key).is_some_and(CacheEntry::is_observed);
            if !observed {
                entries.remove(key);
                debug!(%key, "dropped unobserved entry");
                continue;
            }

            let Some(entry) = entries.get_mut(key) else { continue };
            entry.invalidated = true;
            match (&runtime, entry.request.is_enabled()) {
                (Some(runtime), true) => {
                    let _ = self.spawn_fetch(runtime, entry);
                    debug!(%key, generation = entry.generation, "refetching invalidated entry");
                }
                _ => {
                    entry.in_flight = None;
                    entry.status = EntryStatus::Idle;
                    entry.publish();
                    debug!(%key, "invalidated entry waits for next read");
                }
            }
        }

        keys.len()
    }

    /// Apply the invalidation table for a successful mutation.
    pub fn apply_mutation(&self, mutation: &Mutation) -> usize {
        let touched: usize = mutation.invalidates().iter().map(|p| self.invalidate(p)).sum();
        debug!(
            mutation = mutation.name(),
            customer_id = mutation.customer_id(),
            touched,
            "mutation applied"
        );
        touched
    }

    /// Drop one entry. A read still in flight for it is discarded on
    /// arrival.
    pub fn remove(&self, key: &ResourceKey) -> bool {
        self.inner.entries.lock().remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.inner.entries.lock();
        let count = entries.len();
        entries.clear();
        debug!(count, "cache cleared");
    }

    /// Number of entries, observed or not.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.inner.entries.lock().contains_key(key)
    }

    /// Sync search terms, then invalidate customers, the customer's sync
    /// jobs and the stored terms of the synced range.
    #[instrument(skip_all, fields(customer_id = %request.customer_id))]
    pub async fn sync_search_terms(&self, request: &SyncSearchTermsRequest) -> Result<SyncResult> {
        match self.inner.port.sync_search_terms(request).await {
            Ok(result) => {
                info!(
                    job_id = %result.job_id,
                    status = %result.status,
                    records_stored = result.records_stored,
                    "search terms sync finished"
                );
                self.apply_mutation(&Mutation::from(request));
                Ok(result)
            }
            Err(error) => {
                warn!(error = %error, kind = error.label(), "search terms sync failed");
                Err(error)
            }
        }
    }

    /// Sync the account structure, then invalidate customers, every
    /// campaigns view and the customer's sync jobs.
    #[instrument(skip_all, fields(customer_id = %request.customer_id))]
    pub async fn sync_account_structure(
        &self,
        request: &SyncAccountStructureRequest,
    ) -> Result<FullSyncResult> {
        match self.inner.port.sync_account_structure(request).await {
            Ok(result) => {
                info!(
                    campaigns = result.total_campaigns,
                    ad_groups = result.total_ad_groups,
                    keywords = result.total_keywords,
                    "account structure sync finished"
                );
                self.apply_mutation(&Mutation::from(request));
                Ok(result)
            }
            Err(error) => {
                warn!(error = %error, kind = error.label(), "account structure sync failed");
                Err(error)
            }
        }
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        if entry.status != EntryStatus::Success || entry.invalidated {
            return false;
        }
        match (self.inner.config.stale_after, entry.fetched_at) {
            (None, _) => true,
            (Some(window), Some(fetched_at)) => fetched_at.elapsed() < window,
            (Some(_), None) => false,
        }
    }

    fn supersede(&self, request: &ResourceRequest) -> Result<FetchFuture> {
        let mut entries = self.inner.entries.lock();
        let entry =
            entries.entry(request.key()).or_insert_with(|| CacheEntry::new(request.clone()));
        self.start_fetch(entry)
    }

    fn start_fetch(&self, entry: &mut CacheEntry) -> Result<FetchFuture> {
        let runtime = Handle::try_current()
            .map_err(|e| AdSyncError::Internal(format!("no async runtime: {e}")))?;
        Ok(self.spawn_fetch(&runtime, entry))
    }

    /// Tag a new read with a fresh generation and make it the only one
    /// allowed to commit to `entry`.
    fn spawn_fetch(&self, runtime: &Handle, entry: &mut CacheEntry) -> FetchFuture {
        let generation = self.inner.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let request = entry.request.clone();
        let key = request.key();
        let coordinator = self.clone();

        let task = runtime.spawn(async move {
            let result = coordinator
                .inner
                .port
                .fetch(&request)
                .await
                .and_then(|data| data.expect_kind(request.kind()))
                .map(Arc::new);
            coordinator.commit(&key, generation, result.clone());
            result
        });

        let future = async move {
            task.await.unwrap_or_else(|e| {
                Err(AdSyncError::Internal(format!("fetch task did not complete: {e}")))
            })
        }
        .boxed()
        .shared();

        entry.generation = generation;
        entry.status = EntryStatus::Loading;
        entry.in_flight = Some(InFlight { generation, future: future.clone() });
        entry.publish();
        future
    }

    /// Store a finished read if it is still the latest one for its key.
    ///
    /// Committed sync-jobs results are also broadcast to
    /// [`CacheCoordinator::sync_jobs_updates`] listeners.
    fn commit(&self, key: &ResourceKey, generation: u64, result: Result<Arc<ResourceData>>) {
        let mut entries = self.inner.entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            debug!(%key, generation, "entry gone, dropping response");
            return;
        };
        if entry.generation != generation {
            warn!(%key, generation, latest = entry.generation, "discarding superseded response");
            return;
        }

        entry.in_flight = None;
        let mut update = None;
        match result {
            Ok(data) => {
                debug!(%key, generation, records = data.len(), "read committed");
                if key.kind() == ResourceKind::SyncJobs {
                    update = key.get(KeyParam::CustomerId).map(|customer_id| SyncJobsUpdate {
                        customer_id: customer_id.to_string(),
                        generation,
                        jobs: Arc::clone(&data),
                    });
                }
                entry.status = EntryStatus::Success;
                entry.data = Some(data);
                entry.error = None;
                entry.invalidated = false;
                entry.last_fetched_at = Some(Utc::now());
                entry.fetched_at = Some(Instant::now());
            }
            Err(error) => {
                warn!(%key, generation, error = %error, kind = error.label(), "read failed");
                entry.status = EntryStatus::Error;
                entry.error = Some(error);
            }
        }
        entry.publish();
        drop(entries);

        if let Some(update) = update {
            // no listener is fine
            let _ = self.inner.sync_jobs.send(update);
        }
    }

    fn record_failure(&self, key: &ResourceKey, error: AdSyncError) -> EntrySnapshot {
        let mut entries = self.inner.entries.lock();
        match entries.get_mut(key) {
            Some(entry) => {
                entry.status = EntryStatus::Error;
                entry.error = Some(error);
                entry.publish()
            }
            None => {
                let mut snapshot = EntrySnapshot::idle(key.clone());
                snapshot.status = EntryStatus::Error;
                snapshot.error = Some(error);
                snapshot
            }
        }
    }

    /// Wait for `future`, then for whatever read superseded it, until the
    /// entry has no read in flight.
    async fn settle(&self, key: &ResourceKey, mut future: FetchFuture) -> EntrySnapshot {
        loop {
            let outcome = future.await;
            let next = {
                let entries = self.inner.entries.lock();
                match entries.get(key) {
                    Some(entry) => match &entry.in_flight {
                        Some(in_flight) => in_flight.future.clone(),
                        None => return entry.snapshot(),
                    },
                    None => return detached_snapshot(key, outcome),
                }
            };
            future = next;
        }
    }
}

/// Snapshot for a read whose entry was dropped while it was in flight.
fn detached_snapshot(key: &ResourceKey, outcome: Result<Arc<ResourceData>>) -> EntrySnapshot {
    let mut snapshot = EntrySnapshot::idle(key.clone());
    match outcome {
        Ok(data) => {
            snapshot.status = EntryStatus::Success;
            snapshot.data = Some(data);
            snapshot.last_fetched_at = Some(Utc::now());
        }
        Err(error) => {
            snapshot.status = EntryStatus::Error;
            snapshot.error = Some(error);
        }
    }
    snapshot
}
