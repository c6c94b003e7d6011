//! Dashboard session
//!
//! Glue between the selection, the cache coordinator, the mutation slots and
//! the sync job poller. One instance backs one dashboard view.

use std::time::Duration;

use adsync_domain::{
    selectable_accounts, AdSyncError, Account, Customer, FullSyncResult, Result, SearchTerm,
    SelectableAccount, SelectableAccounts, SyncResult,
};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheCoordinator, EntrySnapshot, KeyPattern, ResourceKind};
use crate::resources::{ResourceData, ResourceRequest};
use crate::selection::SelectionState;
use crate::sync::mutation::{MutationSlot, MutationState};
use crate::sync::poller::SyncJobsPoller;

/// State behind one dashboard view
pub struct DashboardSession {
    coordinator: CacheCoordinator,
    selection: RwLock<SelectionState>,
    preview: MutationSlot<Vec<SearchTerm>>,
    search_terms_sync: MutationSlot<SyncResult>,
    structure_sync: MutationSlot<FullSyncResult>,
    poller: SyncJobsPoller,
}

impl DashboardSession {
    /// Session over `coordinator`, polling sync jobs every `poll_interval`.
    pub fn new(
        coordinator: CacheCoordinator,
        selection: SelectionState,
        poll_interval: Duration,
    ) -> Self {
        Self {
            poller: SyncJobsPoller::new(coordinator.clone(), poll_interval),
            coordinator,
            selection: RwLock::new(selection),
            preview: MutationSlot::new("previewTerms"),
            search_terms_sync: MutationSlot::new("syncSearchTerms"),
            structure_sync: MutationSlot::new("syncAccountStructure"),
        }
    }

    /// The cache every read goes through.
    pub const fn coordinator(&self) -> &CacheCoordinator {
        &self.coordinator
    }

    /// The sync job poller of this session.
    pub const fn poller(&self) -> &SyncJobsPoller {
        &self.poller
    }

    /// Copy of the current selection state.
    pub fn selection(&self) -> SelectionState {
        self.selection.read().clone()
    }

    // ---- reads -------------------------------------------------------------

    /// Accounts reachable with the current session token.
    pub async fn accounts(&self) -> EntrySnapshot {
        self.coordinator.query(ResourceRequest::Accounts).await
    }

    /// Customers already stored upstream.
    pub async fn customers(&self) -> EntrySnapshot {
        self.coordinator.query(ResourceRequest::Customers).await
    }

    /// Stored customers followed by accessible accounts not stored yet.
    ///
    /// Whatever failed to load contributes nothing.
    pub async fn selectable_accounts(&self) -> SelectableAccounts {
        let (customers, accounts) = futures::join!(self.customers(), self.accounts());
        let customers: &[Customer] =
            customers.data.as_deref().and_then(ResourceData::as_customers).unwrap_or_default();
        let accounts: &[Account] =
            accounts.data.as_deref().and_then(ResourceData::as_accounts).unwrap_or_default();
        selectable_accounts(customers, accounts)
    }

    /// Campaigns of the selected account; `Idle` without a selection.
    pub async fn campaigns(&self) -> EntrySnapshot {
        let query = self.selection.read().campaigns_query();
        self.coordinator.query(ResourceRequest::Campaigns(query)).await
    }

    /// Ad groups of the selected account, optionally narrowed to one
    /// campaign.
    pub async fn ad_groups(&self, campaign_id: Option<&str>) -> EntrySnapshot {
        let query = self.selection.read().ad_groups_query(campaign_id);
        self.coordinator.query(ResourceRequest::AdGroups(query)).await
    }

    /// Keywords of one ad group of the selected account.
    pub async fn keywords(&self, ad_group_id: &str, campaign_id: Option<&str>) -> EntrySnapshot {
        let query = self.selection.read().keywords_query(ad_group_id, campaign_id);
        self.coordinator.query(ResourceRequest::Keywords(query)).await
    }

    /// Stored search terms for the selected account and date range.
    pub async fn stored_terms(&self) -> EntrySnapshot {
        let query = self.selection.read().stored_terms_query();
        self.coordinator.query(ResourceRequest::StoredTerms(query)).await
    }

    /// Sync jobs of the selected account.
    pub async fn sync_jobs(&self) -> EntrySnapshot {
        let query = self.selection.read().sync_jobs_query();
        self.coordinator.query(ResourceRequest::SyncJobs(query)).await
    }

    // ---- selection ---------------------------------------------------------

    /// Select an account.
    ///
    /// On change, outcomes tied to the previous account are reset and sync
    /// job polling moves to the new customer. If polling cannot start, the
    /// previous selection is restored and nothing else changes.
    #[instrument(skip_all, fields(customer_id = %account.customer_id))]
    pub fn select_account(&self, account: SelectableAccount) -> Result<bool> {
        let customer_id = account.customer_id.clone();
        let previous = {
            let mut selection = self.selection.write();
            let previous = selection.clone();
            if !selection.select_account(account) {
                return Ok(false);
            }
            previous
        };

        if let Err(error) = self.poller.start(&customer_id) {
            warn!(error = %error, "polling did not start, selection restored");
            *self.selection.write() = previous;
            return Err(error);
        }
        self.reset_outcomes();
        info!("account selected");
        Ok(true)
    }

    /// Drop the selected account and stop polling. Returns whether anything
    /// was selected.
    pub fn clear_selection(&self) -> bool {
        let cleared = self.selection.write().clear();
        if cleared {
            self.reset_outcomes();
            self.poller.stop();
            debug!("selection cleared");
        }
        cleared
    }

    /// # Errors
    /// `Validation` for malformed or reversed dates.
    pub fn set_date_range(&self, start: &str, end: &str) -> Result<()> {
        self.selection.write().set_dates(start, end)
    }

    /// Whether search-term reads break results down by ad group.
    pub fn set_include_ad_groups(&self, include: bool) {
        self.selection.write().set_include_ad_groups(include);
    }

    // ---- mutations ---------------------------------------------------------

    /// Fetch live search terms for the selection, bypassing the cache.
    ///
    /// The outcome is recorded in the preview slot unless the selection
    /// changed while the call was in flight.
    #[instrument(skip(self))]
    pub async fn preview_terms(&self) -> Result<Vec<SearchTerm>> {
        let request = ResourceRequest::SearchTerms(self.selection.read().search_terms_query());
        if let Some(param) = request.missing_params().first() {
            return Err(AdSyncError::missing_param(param.wire_name()));
        }

        self.preview
            .run(async {
                match self.coordinator.fetch_uncached(&request).await? {
                    ResourceData::SearchTerms(terms) => Ok(terms),
                    other => Err(AdSyncError::MalformedResponse(format!(
                        "expected searchTerms data, got {}",
                        other.kind()
                    ))),
                }
            })
            .await
    }

    /// Sync search terms for the selected account and range, then poll its
    /// sync jobs.
    ///
    /// # Errors
    /// `Busy` while a previous search-terms sync is pending, `Validation`
    /// without a selection, otherwise whatever the upstream call failed with.
    #[instrument(skip(self))]
    pub async fn sync_search_terms(&self) -> Result<SyncResult> {
        let request = self.selection.read().sync_search_terms_request()?;
        let result =
            self.search_terms_sync.run(self.coordinator.sync_search_terms(&request)).await?;
        self.resume_polling(&request.customer_id)?;
        Ok(result)
    }

    /// Sync campaigns, ad groups and keywords of the selected account, then
    /// poll its sync jobs.
    #[instrument(skip(self))]
    pub async fn sync_account_structure(&self) -> Result<FullSyncResult> {
        let request = self.selection.read().sync_account_structure_request()?;
        let result =
            self.structure_sync.run(self.coordinator.sync_account_structure(&request)).await?;
        self.resume_polling(&request.customer_id)?;
        Ok(result)
    }

    /// Outcome of the last search-term preview.
    pub fn preview_state(&self) -> MutationState<Vec<SearchTerm>> {
        self.preview.state()
    }

    /// Outcome of the last search-terms sync.
    pub fn search_terms_sync_state(&self) -> MutationState<SyncResult> {
        self.search_terms_sync.state()
    }

    /// Outcome of the last account-structure sync.
    pub fn structure_sync_state(&self) -> MutationState<FullSyncResult> {
        self.structure_sync.state()
    }

    /// Whether any sync button should be disabled.
    pub fn is_syncing(&self) -> bool {
        self.search_terms_sync.is_pending() || self.structure_sync.is_pending()
    }

    // ---- lifecycle ---------------------------------------------------------

    /// Invalidate the account lists.
    pub fn refresh(&self) -> usize {
        self.coordinator.invalidate(&KeyPattern::all(ResourceKind::Accounts))
            + self.coordinator.invalidate(&KeyPattern::all(ResourceKind::Customers))
    }

    /// Stop polling and forget mutation outcomes. The cache is left alone.
    pub fn teardown(&self) {
        self.poller.stop();
        self.reset_outcomes();
    }

    fn reset_outcomes(&self) {
        self.preview.reset();
        self.search_terms_sync.reset();
        self.structure_sync.reset();
    }

    /// Restart polling for `customer_id` if it is still selected.
    fn resume_polling(&self, customer_id: &str) -> Result<()> {
        if self.selection.read().customer_id() == Some(customer_id) {
            self.poller.start(customer_id)?;
        } else {
            debug!(customer_id, "selection moved on, not polling");
        }
        Ok(())
    }
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("selection", &*self.selection.read())
            .field("polling", &self.poller.active_customer())
            .finish_non_exhaustive()
    }
}
