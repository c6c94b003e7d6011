//! Sync job polling state machine
//!
//! Two states, `Idle` and `Polling`. The machine only moves on:
//! - `start(customer)`: begin polling a customer's sync jobs
//! - `on_jobs(customer, jobs)`: keep polling while a job is non-terminal
//! - `on_error()` / `cancel()`: stop
//!
//! It never touches a timer; the driver in [`super::poller`] turns
//! [`PollDecision::Schedule`] into a sleep.

use std::time::Duration;

use adsync_domain::SyncJob;

/// Where the machine is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Idle,
    /// Fetching `customer_id`'s jobs until none is active.
    Polling { customer_id: String },
}

/// What the driver should do after feeding an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Fetch again after this delay.
    Schedule(Duration),
    Stop,
}

/// Fixed-interval polling controller for one customer at a time
#[derive(Debug, Clone)]
pub struct PollingController {
    interval: Duration,
    state: PollState,
}

impl PollingController {
    /// Idle controller scheduling every `interval`.
    pub const fn new(interval: Duration) -> Self {
        Self { interval, state: PollState::Idle }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub const fn state(&self) -> &PollState {
        &self.state
    }

    pub const fn is_polling(&self) -> bool {
        matches!(self.state, PollState::Polling { .. })
    }

    /// Customer currently being polled.
    pub fn customer_id(&self) -> Option<&str> {
        match &self.state {
            PollState::Polling { customer_id } => Some(customer_id),
            PollState::Idle => None,
        }
    }

    /// Begin polling `customer_id`, replacing any previous customer.
    pub fn start(&mut self, customer_id: impl Into<String>) {
        self.state = PollState::Polling { customer_id: customer_id.into() };
    }

    /// Feed the jobs returned by a successful fetch for `customer_id`.
    ///
    /// Jobs for a customer other than the one being polled are stale and
    /// stop nothing but their own chain.
    pub fn on_jobs(&mut self, customer_id: &str, jobs: &[SyncJob]) -> PollDecision {
        if self.customer_id() != Some(customer_id) {
            return PollDecision::Stop;
        }

        if jobs.iter().any(SyncJob::is_active) {
            PollDecision::Schedule(self.interval)
        } else {
            self.state = PollState::Idle;
            PollDecision::Stop
        }
    }

    /// A fetch failed; polling ends until the next trigger.
    pub fn on_error(&mut self) -> PollDecision {
        self.state = PollState::Idle;
        PollDecision::Stop
    }

    /// Selection changed or the consumer went away.
    pub fn cancel(&mut self) {
        self.state = PollState::Idle;
    }
}
