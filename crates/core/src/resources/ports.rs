//! Port interface for the upstream Google Ads resources

use adsync_domain::{
    FullSyncResult, Result, SyncAccountStructureRequest, SyncResult, SyncSearchTermsRequest,
};
use async_trait::async_trait;

use super::{ResourceData, ResourceRequest};

/// Everything the coordinator needs from the network.
///
/// Implementations attach the session token, validate parameters and map
/// failures onto `AdSyncError`; the coordinator never sees HTTP types.
#[async_trait]
pub trait AdsResourcePort: Send + Sync {
    /// Read one resource.
    async fn fetch(&self, request: &ResourceRequest) -> Result<ResourceData>;

    /// Sync search terms for a date range into the upstream database.
    async fn sync_search_terms(&self, request: &SyncSearchTermsRequest) -> Result<SyncResult>;

    /// Sync campaigns, ad groups and keywords of one account.
    async fn sync_account_structure(
        &self,
        request: &SyncAccountStructureRequest,
    ) -> Result<FullSyncResult>;
}
