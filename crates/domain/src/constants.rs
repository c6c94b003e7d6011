//! Application constants
//!
//! Centralized location for domain-level constants shared by the client,
//! the cache coordinator and the poller.

/// Upstream API used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";
/// Per-request deadline.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
/// Connection attempts per request; one means no reconnect.
pub const DEFAULT_API_MAX_ATTEMPTS: usize = 1;

/// Delay between sync-jobs fetches while a job is active.
pub const SYNC_JOBS_POLL_INTERVAL_MS: u64 = 4000;

/// Length of the initial date range, ending yesterday.
pub const DEFAULT_DATE_RANGE_DAYS: u32 = 30;

/// Calendar date format used on every interface (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Upstream resource paths
pub const PATH_ACCOUNTS: &str = "/google-ads/accounts";
pub const PATH_CUSTOMERS: &str = "/google-ads/customers";
pub const PATH_CAMPAIGNS: &str = "/google-ads/campaigns";
pub const PATH_AD_GROUPS: &str = "/google-ads/ad-groups";
pub const PATH_KEYWORDS: &str = "/google-ads/keywords";
pub const PATH_SEARCH_TERMS: &str = "/google-ads/search-terms";
pub const PATH_STORED_SEARCH_TERMS: &str = "/google-ads/search-terms/stored";
pub const PATH_SYNC_JOBS: &str = "/google-ads/sync-jobs";
pub const PATH_SYNC_SEARCH_TERMS: &str = "/google-ads/sync-search-terms";
pub const PATH_SYNC_ACCOUNT_STRUCTURE: &str = "/google-ads/sync-account-structure";

/// Label suffix shown next to manager (MCC) accounts.
pub const MANAGER_ACCOUNT_SUFFIX: &str = " [MCC]";
