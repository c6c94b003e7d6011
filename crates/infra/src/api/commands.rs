//! Google Ads resource operations
//!
//! One method per upstream resource. Parameters are validated before the
//! session token is read, so a call with missing parameters never touches
//! the Auth Provider or the network.

use std::sync::Arc;

use adsync_core::{AdsResourcePort, ResourceData, ResourceRequest};
use adsync_domain::constants::{
    PATH_ACCOUNTS, PATH_AD_GROUPS, PATH_CAMPAIGNS, PATH_CUSTOMERS, PATH_KEYWORDS,
    PATH_SEARCH_TERMS, PATH_STORED_SEARCH_TERMS, PATH_SYNC_ACCOUNT_STRUCTURE, PATH_SYNC_JOBS,
    PATH_SYNC_SEARCH_TERMS,
};
use adsync_domain::types::params::QueryPairs;
use adsync_domain::{
    Account, AdGroup, AdGroupsQuery, Campaign, CampaignsQuery, Customer, FullSyncResult, Keyword,
    KeywordsQuery, Result, SearchTerm, SearchTermsQuery, StoredTermsQuery,
    SyncAccountStructureRequest, SyncJob, SyncJobsQuery, SyncResult, SyncSearchTermsRequest,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::client::ApiClient;

/// Resource client for the upstream Google Ads API
#[derive(Debug, Clone)]
pub struct GoogleAdsCommands {
    client: Arc<ApiClient>,
}

impl GoogleAdsCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // === Accounts ===

    /// Accounts reachable with the signed-in user's Google credentials.
    #[instrument(skip(self))]
    pub async fn accounts(&self) -> Result<Vec<Account>> {
        let accounts: Vec<Account> = self.client.get(PATH_ACCOUNTS, &QueryPairs::new()).await?;
        debug!(count = accounts.len(), "accounts fetched");
        Ok(accounts)
    }

    /// Customers already stored by the upstream service.
    #[instrument(skip(self))]
    pub async fn customers(&self) -> Result<Vec<Customer>> {
        let customers: Vec<Customer> =
            self.client.get(PATH_CUSTOMERS, &QueryPairs::new()).await?;
        debug!(count = customers.len(), "customers fetched");
        Ok(customers)
    }

    // === Account structure ===

    /// Campaigns of one customer, with ad groups when requested.
    #[instrument(skip(self), fields(customer_id = ?query.customer_id))]
    pub async fn campaigns(&self, query: &CampaignsQuery) -> Result<Vec<Campaign>> {
        query.validate()?;
        let campaigns: Vec<Campaign> =
            self.client.get(PATH_CAMPAIGNS, &query.query_pairs()).await?;
        debug!(count = campaigns.len(), "campaigns fetched");
        Ok(campaigns)
    }

    #[instrument(skip(self), fields(customer_id = ?query.customer_id))]
    pub async fn ad_groups(&self, query: &AdGroupsQuery) -> Result<Vec<AdGroup>> {
        query.validate()?;
        self.client.get(PATH_AD_GROUPS, &query.query_pairs()).await
    }

    #[instrument(skip(self), fields(ad_group_id = ?query.ad_group_id))]
    pub async fn keywords(&self, query: &KeywordsQuery) -> Result<Vec<Keyword>> {
        query.validate()?;
        self.client.get(PATH_KEYWORDS, &query.query_pairs()).await
    }

    // === Search terms ===

    /// Live search terms straight from Google Ads. Nothing is stored.
    #[instrument(skip(self), fields(customer_id = ?query.customer_id))]
    pub async fn search_terms(&self, query: &SearchTermsQuery) -> Result<Vec<SearchTerm>> {
        query.validate()?;
        let terms: Vec<SearchTerm> =
            self.client.get(PATH_SEARCH_TERMS, &query.query_pairs()).await?;
        debug!(count = terms.len(), "live search terms fetched");
        Ok(terms)
    }

    /// Search terms previously synced into the database.
    #[instrument(skip(self), fields(customer_id = ?query.customer_id))]
    pub async fn stored_search_terms(&self, query: &StoredTermsQuery) -> Result<Vec<SearchTerm>> {
        query.validate()?;
        self.client.get(PATH_STORED_SEARCH_TERMS, &query.query_pairs()).await
    }

    // === Sync ===

    /// Sync jobs of one customer.
    #[instrument(skip(self), fields(customer_id = ?query.customer_id))]
    pub async fn sync_jobs(&self, query: &SyncJobsQuery) -> Result<Vec<SyncJob>> {
        query.validate()?;
        self.client.get(PATH_SYNC_JOBS, &query.query_pairs()).await
    }

    /// Start a search-terms sync. Not cached and never re-sent.
    #[instrument(skip(self), fields(customer_id = %request.customer_id))]
    pub async fn sync_search_terms(&self, request: &SyncSearchTermsRequest) -> Result<SyncResult> {
        request.validate()?;
        let result: SyncResult = self.client.post(PATH_SYNC_SEARCH_TERMS, request).await?;
        info!(
            job_id = %result.job_id,
            records_stored = result.records_stored,
            "search terms sync accepted"
        );
        Ok(result)
    }

    #[instrument(skip(self), fields(customer_id = %request.customer_id))]
    pub async fn sync_account_structure(
        &self,
        request: &SyncAccountStructureRequest,
    ) -> Result<FullSyncResult> {
        request.validate()?;
        let result: FullSyncResult =
            self.client.post(PATH_SYNC_ACCOUNT_STRUCTURE, request).await?;
        info!(
            campaigns = result.total_campaigns,
            ad_groups = result.total_ad_groups,
            keywords = result.total_keywords,
            "account structure synced"
        );
        Ok(result)
    }
}

#[async_trait]
impl AdsResourcePort for GoogleAdsCommands {
    async fn fetch(&self, request: &ResourceRequest) -> Result<ResourceData> {
        Ok(match request {
            ResourceRequest::Accounts => ResourceData::Accounts(self.accounts().await?),
            ResourceRequest::Customers => ResourceData::Customers(self.customers().await?),
            ResourceRequest::Campaigns(query) => {
                ResourceData::Campaigns(self.campaigns(query).await?)
            }
            ResourceRequest::AdGroups(query) => {
                ResourceData::AdGroups(self.ad_groups(query).await?)
            }
            ResourceRequest::Keywords(query) => {
                ResourceData::Keywords(self.keywords(query).await?)
            }
            ResourceRequest::SearchTerms(query) => {
                ResourceData::SearchTerms(self.search_terms(query).await?)
            }
            ResourceRequest::StoredTerms(query) => {
                ResourceData::StoredTerms(self.stored_search_terms(query).await?)
            }
            ResourceRequest::SyncJobs(query) => {
                ResourceData::SyncJobs(self.sync_jobs(query).await?)
            }
        })
    }

    async fn sync_search_terms(&self, request: &SyncSearchTermsRequest) -> Result<SyncResult> {
        Self::sync_search_terms(self, request).await
    }

    async fn sync_account_structure(
        &self,
        request: &SyncAccountStructureRequest,
    ) -> Result<FullSyncResult> {
        Self::sync_account_structure(self, request).await
    }
}
