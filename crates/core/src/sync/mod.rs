//! Sync job tracking: polling state machine, its driver and mutation slots

pub mod mutation;
pub mod poller;
pub mod polling;

pub use mutation::{MutationSlot, MutationState, MutationStatus};
pub use poller::SyncJobsPoller;
pub use polling::{PollDecision, PollState, PollingController};
