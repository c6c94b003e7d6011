//! Cache entry state and read-only snapshots

use std::sync::Arc;

use adsync_domain::{AdSyncError, Result};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, Shared};
use tokio::sync::watch;
use tokio::time::Instant;

use super::key::ResourceKey;
use crate::resources::{ResourceData, ResourceRequest};

/// Lifecycle of one entry: `Idle -> Loading -> (Success | Error)`, and back
/// to `Loading` on refetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Nothing fetched yet, or invalidated while no read could be issued.
    Idle,
    /// A read is in flight; earlier data and error are kept.
    Loading,
    /// The latest read succeeded.
    Success,
    /// The latest read failed.
    Error,
}

/// What readers see of an entry
///
/// `data` and `error` survive a transition back to `Loading` so a view can
/// keep showing the previous result while a refetch is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot {
    pub key: ResourceKey,
    pub status: EntryStatus,
    /// Data of the last successful read.
    pub data: Option<Arc<ResourceData>>,
    /// Error of the last failed read, cleared by the next success.
    pub error: Option<AdSyncError>,
    /// Wall-clock time of the last successful read.
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// Set once the entry was invalidated and until the next success lands.
    pub is_stale: bool,
}

impl EntrySnapshot {
    /// Snapshot of a key nothing has been fetched for.
    pub const fn idle(key: ResourceKey) -> Self {
        Self {
            key,
            status: EntryStatus::Idle,
            data: None,
            error: None,
            last_fetched_at: None,
            is_stale: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == EntryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == EntryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == EntryStatus::Error
    }

    /// Settled outcome of this snapshot, for callers awaiting a read.
    ///
    /// `Idle` and `Loading` have no outcome yet and map to `Internal`.
    pub fn into_result(self) -> Result<Arc<ResourceData>> {
        match (self.status, self.data, self.error) {
            (EntryStatus::Error, _, Some(error)) => Err(error),
            (EntryStatus::Success, Some(data), _) => Ok(data),
            (status, _, _) => Err(AdSyncError::Internal(format!(
                "entry {} has no settled result ({status:?})",
                self.key
            ))),
        }
    }
}

pub(crate) type FetchFuture = Shared<BoxFuture<'static, Result<Arc<ResourceData>>>>;

/// The one request currently allowed to commit to an entry.
pub(crate) struct InFlight {
    pub generation: u64,
    pub future: FetchFuture,
}

/// Coordinator-owned state behind one key.
pub(crate) struct CacheEntry {
    pub request: ResourceRequest,
    pub status: EntryStatus,
    pub data: Option<Arc<ResourceData>>,
    pub error: Option<AdSyncError>,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub fetched_at: Option<Instant>,
    pub invalidated: bool,
    pub generation: u64,
    pub in_flight: Option<InFlight>,
    tx: watch::Sender<EntrySnapshot>,
}

impl CacheEntry {
    pub fn new(request: ResourceRequest) -> Self {
        let (tx, _rx) = watch::channel(EntrySnapshot::idle(request.key()));
        Self {
            request,
            status: EntryStatus::Idle,
            data: None,
            error: None,
            last_fetched_at: None,
            fetched_at: None,
            invalidated: false,
            generation: 0,
            in_flight: None,
            tx,
        }
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            key: self.request.key(),
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            last_fetched_at: self.last_fetched_at,
            is_stale: self.invalidated,
        }
    }

    /// Push the current state to subscribers and return it.
    pub fn publish(&self) -> EntrySnapshot {
        let snapshot = self.snapshot();
        self.tx.send_replace(snapshot.clone());
        snapshot
    }

    pub fn subscribe(&self) -> watch::Receiver<EntrySnapshot> {
        self.tx.subscribe()
    }

    /// An entry is observed while at least one subscriber holds a receiver.
    pub fn is_observed(&self) -> bool {
        self.tx.receiver_count() > 0
    }
}
