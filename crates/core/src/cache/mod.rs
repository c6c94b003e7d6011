//! Resource cache: key table, entries, coordinator and invalidation rules

pub mod coordinator;
pub mod entry;
pub mod invalidation;
pub mod key;

pub use coordinator::{CacheConfig, CacheCoordinator, SyncJobsUpdate};
pub use entry::{EntrySnapshot, EntryStatus};
pub use invalidation::Mutation;
pub use key::{KeyParam, KeyPattern, ResourceKey, ResourceKind};
