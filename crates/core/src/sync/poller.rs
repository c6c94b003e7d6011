//! Sync job poller
//!
//! Drives [`PollingController`]s on tokio tasks. Every round issues a fresh
//! sync-jobs read through the cache coordinator, so subscribers of the
//! sync-jobs entry see each result.
//!
//! Polling is armed two ways: explicitly through [`SyncJobsPoller::start`],
//! and by any committed sync-jobs read (a plain query, a refetch, an
//! invalidation refetch) that still shows an active job. Each chain owns
//! its controller.

use std::sync::Arc;
use std::time::Duration;

use adsync_domain::{AdSyncError, Result, SyncJobsQuery};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::polling::{PollDecision, PollingController};
use crate::cache::{CacheCoordinator, SyncJobsUpdate};
use crate::resources::ResourceRequest;

struct ActivePoll {
    customer_id: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ActivePoll {
    fn is_alive(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

#[derive(Default)]
struct PollTarget {
    /// Customer polling is pinned to; `None` follows whichever customer's
    /// jobs show up.
    customer_id: Option<String>,
    /// Reads issued at or before this generation never arm a chain.
    issued_before: u64,
    active: Option<ActivePoll>,
}

struct Shared {
    coordinator: CacheCoordinator,
    interval: Duration,
    target: Mutex<PollTarget>,
}

/// Polls one customer's sync jobs until none is active
///
/// Cancelling stops further rounds but never aborts a read already in
/// flight; its result still lands in the cache.
pub struct SyncJobsPoller {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    /// Receiver taken by the update listener once a runtime is available.
    updates: Mutex<Option<broadcast::Receiver<SyncJobsUpdate>>>,
}

impl SyncJobsPoller {
    /// Idle poller over `coordinator`, fetching every `interval` while jobs
    /// are active.
    pub fn new(coordinator: CacheCoordinator, interval: Duration) -> Self {
        let updates = coordinator.sync_jobs_updates();
        let poller = Self {
            shared: Arc::new(Shared {
                coordinator,
                interval,
                target: Mutex::new(PollTarget::default()),
            }),
            shutdown: CancellationToken::new(),
            updates: Mutex::new(Some(updates)),
        };
        if let Ok(runtime) = Handle::try_current() {
            poller.listen(&runtime);
        }
        poller
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Start a new polling chain for `customer_id`, fetching immediately.
    ///
    /// Any previous chain is cancelled first, whichever customer it was for.
    #[instrument(skip(self))]
    pub fn start(&self, customer_id: &str) -> Result<()> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(AdSyncError::missing_param("customerId"));
        }
        let runtime = Handle::try_current()
            .map_err(|e| AdSyncError::Internal(format!("no async runtime: {e}")))?;
        self.listen(&runtime);

        let mut target = self.shared.target.lock();
        if let Some(previous) = target.active.take() {
            previous.cancel.cancel();
            debug!(previous = %previous.customer_id, "replaced polling chain");
        }

        target.customer_id = Some(customer_id.to_string());
        target.issued_before = self.shared.coordinator.current_generation();
        target.active = Some(self.shared.spawn_chain(&runtime, customer_id, None));
        info!("sync job polling started");
        Ok(())
    }

    /// Stop polling. Idempotent.
    ///
    /// Reads issued before the stop no longer arm polling when they land.
    pub fn stop(&self) {
        let mut target = self.shared.target.lock();
        if let Some(previous) = target.active.take() {
            previous.cancel.cancel();
            info!(customer_id = %previous.customer_id, "sync job polling stopped");
        }
        target.customer_id = None;
        target.issued_before = self.shared.coordinator.current_generation();
    }

    /// Whether a polling chain is still alive.
    pub fn is_running(&self) -> bool {
        self.shared.target.lock().active.as_ref().is_some_and(ActivePoll::is_alive)
    }

    /// Customer of the live chain, if any.
    pub fn active_customer(&self) -> Option<String> {
        self.shared
            .target
            .lock()
            .active
            .as_ref()
            .filter(|poll| poll.is_alive())
            .map(|poll| poll.customer_id.clone())
    }

    /// Spawn the listener for committed sync-jobs reads, once.
    fn listen(&self, runtime: &Handle) {
        let Some(updates) = self.updates.lock().take() else { return };
        runtime.spawn(listen_for_updates(
            Arc::clone(&self.shared),
            updates,
            self.shutdown.clone(),
        ));
    }
}

impl Drop for SyncJobsPoller {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(previous) = self.shared.target.lock().active.take() {
            previous.cancel.cancel();
        }
    }
}

impl Shared {
    fn spawn_chain(
        &self,
        runtime: &Handle,
        customer_id: &str,
        first_delay: Option<Duration>,
    ) -> ActivePoll {
        let mut controller = PollingController::new(self.interval);
        controller.start(customer_id);
        let cancel = CancellationToken::new();
        let handle = runtime.spawn(poll_chain(
            self.coordinator.clone(),
            controller,
            customer_id.to_string(),
            cancel.clone(),
            first_delay,
        ));
        ActivePoll { customer_id: customer_id.to_string(), cancel, handle }
    }

    /// Arm a chain for a committed read that still shows active jobs,
    /// unless one is already polling that customer.
    fn on_update(&self, runtime: &Handle, update: &SyncJobsUpdate) {
        let mut target = self.target.lock();
        if update.generation <= target.issued_before {
            return;
        }
        if target.customer_id.as_deref().is_some_and(|pinned| pinned != update.customer_id) {
            debug!(customer_id = %update.customer_id, "ignoring sync jobs of another customer");
            return;
        }
        if target.active.as_ref().is_some_and(ActivePoll::is_alive) {
            return;
        }

        let mut controller = PollingController::new(self.interval);
        controller.start(update.customer_id.as_str());
        let jobs = update.jobs.as_sync_jobs().unwrap_or_default();
        let PollDecision::Schedule(delay) = controller.on_jobs(&update.customer_id, jobs) else {
            return;
        };

        info!(customer_id = %update.customer_id, "active sync jobs observed, polling armed");
        target.customer_id = Some(update.customer_id.clone());
        target.active = Some(self.spawn_chain(runtime, &update.customer_id, Some(delay)));
    }
}

async fn listen_for_updates(
    shared: Arc<Shared>,
    mut updates: broadcast::Receiver<SyncJobsUpdate>,
    shutdown: CancellationToken,
) {
    let runtime = Handle::current();
    loop {
        let received = tokio::select! {
            () = shutdown.cancelled() => break,
            received = updates.recv() => received,
        };
        match received {
            Ok(update) => shared.on_update(&runtime, &update),
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "sync jobs listener lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn poll_chain(
    coordinator: CacheCoordinator,
    mut controller: PollingController,
    customer_id: String,
    cancel: CancellationToken,
    first_delay: Option<Duration>,
) {
    let request =
        ResourceRequest::SyncJobs(SyncJobsQuery { customer_id: Some(customer_id.clone()) });
    let mut delay = first_delay;
    let mut rounds = 0_u32;

    loop {
        if let Some(delay) = delay {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(%customer_id, rounds, "polling cancelled");
                    break;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }

        rounds += 1;
        let result = coordinator.fetch(request.clone()).await;
        if cancel.is_cancelled() {
            debug!(%customer_id, rounds, "polling cancelled during fetch");
            break;
        }

        let decision = match &result {
            Ok(data) => controller.on_jobs(&customer_id, data.as_sync_jobs().unwrap_or_default()),
            Err(error) => {
                warn!(%customer_id, error = %error, "sync jobs fetch failed, polling stopped");
                controller.on_error()
            }
        };

        let PollDecision::Schedule(next) = decision else {
            debug!(%customer_id, rounds, "no active sync jobs, polling finished");
            break;
        };
        debug!(%customer_id, delay_ms = next.as_millis(), "sync jobs still running");
        delay = Some(next);
    }
}
