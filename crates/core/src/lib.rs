//! # AdSync Core
//!
//! Pure client-side coordination logic - no HTTP code.
//!
//! This crate contains:
//! - The resource port (trait) the HTTP client implements
//! - The declarative resource key table and the cache coordinator
//! - Sync job polling (state machine and driver) and mutation slots
//! - Selection state and the dashboard session that ties them together
//!
//! ## Architecture Principles
//! - Only depends on `adsync-domain`
//! - All network access goes through [`AdsResourcePort`]
//! - Cache bookkeeping is synchronous; the only suspension points are the
//!   port calls themselves

pub mod cache;
pub mod resources;
pub mod selection;
pub mod session;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use cache::{
    CacheConfig, CacheCoordinator, EntrySnapshot, EntryStatus, KeyParam, KeyPattern, Mutation,
    ResourceKey, ResourceKind, SyncJobsUpdate,
};
pub use resources::ports::AdsResourcePort;
pub use resources::{ResourceData, ResourceRequest};
pub use selection::{Selection, SelectionState};
pub use session::DashboardSession;
pub use sync::mutation::{MutationSlot, MutationState, MutationStatus};
pub use sync::poller::SyncJobsPoller;
pub use sync::polling::{PollDecision, PollState, PollingController};
