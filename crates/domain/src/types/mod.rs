//! Domain types and models
//!
//! Wire types mirror the upstream JSON contracts (camelCase field names).

pub mod accounts;
pub mod campaigns;
pub mod params;
pub mod search_terms;
pub mod selection;
pub mod sync;

pub use accounts::{Account, Customer};
pub use campaigns::{AdGroup, Campaign, CampaignMetrics, Keyword};
pub use params::{
    AdGroupsQuery, CampaignsQuery, KeywordsQuery, SearchTermsQuery, StoredTermsQuery,
    SyncAccountStructureRequest, SyncJobsQuery, SyncSearchTermsRequest,
};
pub use search_terms::{SearchTerm, SearchTermMetrics};
pub use selection::{selectable_accounts, SelectableAccount, SelectableAccounts};
pub use sync::{FullSyncResult, SyncJob, SyncJobStatus, SyncResult, SyncResultStatus};
