//! Mutation slots
//!
//! A slot tracks one kind of user-triggered call (a preview, a sync). At
//! most one call per slot is pending at a time; starting another fails with
//! `Busy`. `reset` forgets the current outcome and orphans a pending call so
//! its result is dropped when it lands.

use std::future::Future;

use adsync_domain::{AdSyncError, Result};
use parking_lot::Mutex;

/// Lifecycle of a mutation slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    /// Never run, or reset since.
    Idle,
    /// A call is in flight; further calls are rejected with `Busy`.
    Pending,
    Success,
    Error,
}

/// Snapshot of a slot
#[derive(Debug, Clone, PartialEq)]
pub struct MutationState<T> {
    pub status: MutationStatus,
    pub data: Option<T>,
    pub error: Option<AdSyncError>,
}

impl<T> Default for MutationState<T> {
    fn default() -> Self {
        Self { status: MutationStatus::Idle, data: None, error: None }
    }
}

struct SlotState<T> {
    state: MutationState<T>,
    epoch: u64,
}

/// Proof that a call was admitted; carries the epoch it was admitted in.
#[derive(Debug)]
#[must_use]
pub struct MutationTicket {
    epoch: u64,
}

/// Single-flight holder for one kind of mutation and its last outcome
pub struct MutationSlot<T> {
    name: &'static str,
    inner: Mutex<SlotState<T>>,
}

impl<T: Clone> MutationSlot<T> {
    /// Idle slot; `name` appears in `Busy` errors.
    pub fn new(name: &'static str) -> Self {
        Self { name, inner: Mutex::new(SlotState { state: MutationState::default(), epoch: 0 }) }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Admit a call, or fail with `Busy` while another one is pending.
    pub fn begin(&self) -> Result<MutationTicket> {
        let mut inner = self.inner.lock();
        if inner.state.status == MutationStatus::Pending {
            return Err(AdSyncError::Busy(self.name.to_string()));
        }
        inner.state.status = MutationStatus::Pending;
        inner.state.error = None;
        Ok(MutationTicket { epoch: inner.epoch })
    }

    /// Record the outcome of an admitted call. Returns `false` if the slot
    /// was reset in the meantime and the outcome was dropped.
    pub fn finish(&self, ticket: MutationTicket, result: &Result<T>) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != ticket.epoch {
            return false;
        }
        match result {
            Ok(data) => {
                inner.state.status = MutationStatus::Success;
                inner.state.data = Some(data.clone());
                inner.state.error = None;
            }
            Err(error) => {
                inner.state.status = MutationStatus::Error;
                inner.state.error = Some(error.clone());
            }
        }
        true
    }

    /// Run `call` inside the slot.
    pub async fn run<F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let ticket = self.begin()?;
        let mut guard = AbandonGuard { slot: self, epoch: ticket.epoch, armed: true };
        let result = call.await;
        guard.armed = false;
        self.finish(ticket, &result);
        result
    }

    /// Back to `Idle`, dropping data, error and any pending call's outcome.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.state = MutationState::default();
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().state.status == MutationStatus::Pending
    }

    pub fn state(&self) -> MutationState<T> {
        self.inner.lock().state.clone()
    }
}

/// Returns the slot to `Idle` if a `run` future is dropped mid-call.
struct AbandonGuard<'a, T> {
    slot: &'a MutationSlot<T>,
    epoch: u64,
    armed: bool,
}

impl<T> Drop for AbandonGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.slot.inner.lock();
        if inner.epoch == self.epoch && inner.state.status == MutationStatus::Pending {
            inner.state.status = MutationStatus::Idle;
        }
    }
}
