//! Selection state: the selected account and the active date range
//!
//! Most cache keys are derived from here. Query builders leave parameters
//! unset when nothing is selected, which keeps the matching reads disabled.

use adsync_domain::{
    AdGroupsQuery, AdSyncError, CampaignsQuery, DateRange, KeywordsQuery, Result,
    SearchTermsQuery, SelectableAccount, StoredTermsQuery, SyncAccountStructureRequest,
    SyncJobsQuery, SyncSearchTermsRequest,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Flat view of the current selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub customer_id: String,
    pub login_customer_id: String,
    pub is_manager_account: bool,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub include_ad_groups: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Selected account, date range and grouping of one dashboard
pub struct SelectionState {
    account: Option<SelectableAccount>,
    range: DateRange,
    include_ad_groups: bool,
    /// Bumped whenever the selected account changes.
    epoch: u64,
}

impl SelectionState {
    /// Nothing selected; the range covers the `default_range_days` days
    /// ending yesterday relative to `today`.
    pub fn new(today: NaiveDate, default_range_days: u32) -> Self {
        Self {
            account: None,
            range: DateRange::last_n_days(today, default_range_days),
            include_ad_groups: false,
            epoch: 0,
        }
    }

    /// Same as [`SelectionState::new`] with today's local date.
    pub fn with_local_today(default_range_days: u32) -> Self {
        Self::new(Local::now().date_naive(), default_range_days)
    }

    /// Selected account, if any.
    pub const fn account(&self) -> Option<&SelectableAccount> {
        self.account.as_ref()
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.account.as_ref().map(|a| a.customer_id.as_str())
    }

    pub const fn range(&self) -> DateRange {
        self.range
    }

    pub const fn include_ad_groups(&self) -> bool {
        self.include_ad_groups
    }

    /// Counter of account changes; outcomes recorded under an older epoch
    /// are stale.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Select `account`. Returns `true` if the selection actually changed.
    pub fn select_account(&mut self, account: SelectableAccount) -> bool {
        let same = self.account.as_ref().is_some_and(|current| {
            current.customer_id == account.customer_id
                && current.login_customer_id == account.login_customer_id
        });
        if same {
            self.account = Some(account);
            return false;
        }
        self.account = Some(account);
        self.epoch += 1;
        true
    }

    /// Drop the selected account. Returns `true` if one was selected.
    pub fn clear(&mut self) -> bool {
        if self.account.take().is_some() {
            self.epoch += 1;
            true
        } else {
            false
        }
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// Set the range from `YYYY-MM-DD` strings.
    ///
    /// # Errors
    /// `Validation` for malformed dates or `start > end`; the range is left
    /// unchanged.
    pub fn set_dates(&mut self, start: &str, end: &str) -> Result<()> {
        self.range = DateRange::parse(start, end)?;
        Ok(())
    }

    pub fn set_include_ad_groups(&mut self, include: bool) {
        self.include_ad_groups = include;
    }

    /// Everything selected, or `None` without an account.
    pub fn selection(&self) -> Option<Selection> {
        self.account.as_ref().map(|account| Selection {
            customer_id: account.customer_id.clone(),
            login_customer_id: account.login_customer_id.clone(),
            is_manager_account: account.is_manager_account,
            label: account.label.clone(),
            start_date: self.range.start_ymd(),
            end_date: self.range.end_ymd(),
            include_ad_groups: self.include_ad_groups,
        })
    }

    fn ids(&self) -> (Option<String>, Option<String>) {
        self.account.as_ref().map_or((None, None), |a| {
            (Some(a.customer_id.clone()), Some(a.login_customer_id.clone()))
        })
    }

    pub fn campaigns_query(&self) -> CampaignsQuery {
        let (customer_id, login_customer_id) = self.ids();
        CampaignsQuery {
            customer_id,
            login_customer_id,
            start_date: Some(self.range.start_ymd()),
            end_date: Some(self.range.end_ymd()),
            include_ad_groups: Some(self.include_ad_groups),
        }
    }

    pub fn ad_groups_query(&self, campaign_id: Option<&str>) -> AdGroupsQuery {
        let (customer_id, login_customer_id) = self.ids();
        AdGroupsQuery { customer_id, login_customer_id, campaign_id: campaign_id.map(Into::into) }
    }

    pub fn keywords_query(&self, ad_group_id: &str, campaign_id: Option<&str>) -> KeywordsQuery {
        let (customer_id, login_customer_id) = self.ids();
        KeywordsQuery {
            customer_id,
            login_customer_id,
            ad_group_id: Some(ad_group_id.to_string()),
            campaign_id: campaign_id.map(Into::into),
        }
    }

    pub fn search_terms_query(&self) -> SearchTermsQuery {
        let (customer_id, login_customer_id) = self.ids();
        SearchTermsQuery {
            customer_id,
            login_customer_id,
            start_date: Some(self.range.start_ymd()),
            end_date: Some(self.range.end_ymd()),
        }
    }

    pub fn stored_terms_query(&self) -> StoredTermsQuery {
        StoredTermsQuery {
            customer_id: self.customer_id().map(Into::into),
            start_date: Some(self.range.start_ymd()),
            end_date: Some(self.range.end_ymd()),
        }
    }

    pub fn sync_jobs_query(&self) -> SyncJobsQuery {
        SyncJobsQuery { customer_id: self.customer_id().map(Into::into) }
    }

    /// # Errors
    /// `Validation` when no account is selected.
    pub fn sync_search_terms_request(&self) -> Result<SyncSearchTermsRequest> {
        let account = self.require_account()?;
        Ok(SyncSearchTermsRequest::new(
            account.customer_id.clone(),
            self.range.start_ymd(),
            self.range.end_ymd(),
        ))
    }

    /// # Errors
    /// `Validation` when no account is selected.
    pub fn sync_account_structure_request(&self) -> Result<SyncAccountStructureRequest> {
        let account = self.require_account()?;
        Ok(SyncAccountStructureRequest::new(
            account.customer_id.clone(),
            account.login_customer_id.clone(),
        )
        .with_dates(self.range.start_ymd(), self.range.end_ymd()))
    }

    fn require_account(&self) -> Result<&SelectableAccount> {
        self.account.as_ref().ok_or_else(|| AdSyncError::missing_param("customerId"))
    }
}
