//! Typed request parameter records
//!
//! Read parameters are optional because they are usually derived from a
//! selection the user may not have made yet. `validate` reports the first
//! missing required parameter by its wire name, and `query_pairs` yields the
//! query string in wire order, skipping unset optional values.

use serde::{Deserialize, Serialize};

use crate::errors::{AdSyncError, Result};
use crate::utils::dates::parse_ymd;

/// Wire name / value pairs for a query string.
pub type QueryPairs = Vec<(&'static str, String)>;

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    present(value).ok_or_else(|| AdSyncError::missing_param(name))
}

fn require_str<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    require(name, Some(value))
}

/// Dates that are present must be `YYYY-MM-DD`, and a complete range must
/// not be reversed.
fn check_dates(start: Option<&str>, end: Option<&str>) -> Result<()> {
    let start = present(start).map(|s| parse_ymd(s).map(|d| (s, d))).transpose()?;
    let end = present(end).map(|s| parse_ymd(s).map(|d| (s, d))).transpose()?;

    if let (Some((raw_start, start)), Some((raw_end, end))) = (start, end) {
        if start > end {
            return Err(AdSyncError::Validation(format!(
                "startDate {raw_start} is after endDate {raw_end}"
            )));
        }
    }
    Ok(())
}

fn push_opt(pairs: &mut QueryPairs, name: &'static str, value: Option<&str>) {
    if let Some(value) = present(value) {
        pairs.push((name, value.to_string()));
    }
}

/// Parameters of the campaigns resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignsQuery {
    pub customer_id: Option<String>,
    pub login_customer_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_ad_groups: Option<bool>,
}

impl CampaignsQuery {
    pub fn validate(&self) -> Result<()> {
        require("customerId", self.customer_id.as_deref())?;
        require("loginCustomerId", self.login_customer_id.as_deref())?;
        check_dates(self.start_date.as_deref(), self.end_date.as_deref())
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "customerId", self.customer_id.as_deref());
        push_opt(&mut pairs, "loginCustomerId", self.login_customer_id.as_deref());
        push_opt(&mut pairs, "startDate", self.start_date.as_deref());
        push_opt(&mut pairs, "endDate", self.end_date.as_deref());
        if let Some(include) = self.include_ad_groups {
            pairs.push(("includeAdGroups", include.to_string()));
        }
        pairs
    }
}

/// Parameters of the ad-groups resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdGroupsQuery {
    pub customer_id: Option<String>,
    pub login_customer_id: Option<String>,
    pub campaign_id: Option<String>,
}

impl AdGroupsQuery {
    pub fn validate(&self) -> Result<()> {
        require("customerId", self.customer_id.as_deref())?;
        require("loginCustomerId", self.login_customer_id.as_deref())?;
        Ok(())
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "customerId", self.customer_id.as_deref());
        push_opt(&mut pairs, "loginCustomerId", self.login_customer_id.as_deref());
        push_opt(&mut pairs, "campaignId", self.campaign_id.as_deref());
        pairs
    }
}

/// Parameters of the keywords resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordsQuery {
    pub customer_id: Option<String>,
    pub login_customer_id: Option<String>,
    pub ad_group_id: Option<String>,
    pub campaign_id: Option<String>,
}

impl KeywordsQuery {
    pub fn validate(&self) -> Result<()> {
        require("customerId", self.customer_id.as_deref())?;
        require("loginCustomerId", self.login_customer_id.as_deref())?;
        require("adGroupId", self.ad_group_id.as_deref())?;
        Ok(())
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "customerId", self.customer_id.as_deref());
        push_opt(&mut pairs, "loginCustomerId", self.login_customer_id.as_deref());
        push_opt(&mut pairs, "adGroupId", self.ad_group_id.as_deref());
        push_opt(&mut pairs, "campaignId", self.campaign_id.as_deref());
        pairs
    }
}

/// Parameters of the live search-terms resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTermsQuery {
    pub customer_id: Option<String>,
    pub login_customer_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SearchTermsQuery {
    pub fn validate(&self) -> Result<()> {
        require("customerId", self.customer_id.as_deref())?;
        require("loginCustomerId", self.login_customer_id.as_deref())?;
        require("startDate", self.start_date.as_deref())?;
        require("endDate", self.end_date.as_deref())?;
        check_dates(self.start_date.as_deref(), self.end_date.as_deref())
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "customerId", self.customer_id.as_deref());
        push_opt(&mut pairs, "loginCustomerId", self.login_customer_id.as_deref());
        push_opt(&mut pairs, "startDate", self.start_date.as_deref());
        push_opt(&mut pairs, "endDate", self.end_date.as_deref());
        pairs
    }
}

/// Parameters of the stored search-terms resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTermsQuery {
    pub customer_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl StoredTermsQuery {
    pub fn validate(&self) -> Result<()> {
        require("customerId", self.customer_id.as_deref())?;
        check_dates(self.start_date.as_deref(), self.end_date.as_deref())
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "customerId", self.customer_id.as_deref());
        push_opt(&mut pairs, "startDate", self.start_date.as_deref());
        push_opt(&mut pairs, "endDate", self.end_date.as_deref());
        pairs
    }
}

/// Parameters of the sync-jobs resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncJobsQuery {
    pub customer_id: Option<String>,
}

impl SyncJobsQuery {
    pub fn validate(&self) -> Result<()> {
        require("customerId", self.customer_id.as_deref())?;
        Ok(())
    }

    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "customerId", self.customer_id.as_deref());
        pairs
    }
}

/// Body of the sync-search-terms mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSearchTermsRequest {
    pub customer_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl SyncSearchTermsRequest {
    pub fn new(
        customer_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_str("customerId", &self.customer_id)?;
        require_str("startDate", &self.start_date)?;
        require_str("endDate", &self.end_date)?;
        check_dates(Some(&self.start_date), Some(&self.end_date))
    }
}

/// Body of the sync-account-structure mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAccountStructureRequest {
    pub customer_id: String,
    pub login_customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SyncAccountStructureRequest {
    pub fn new(customer_id: impl Into<String>, login_customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            login_customer_id: login_customer_id.into(),
            start_date: None,
            end_date: None,
        }
    }

    #[must_use]
    pub fn with_dates(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_str("customerId", &self.customer_id)?;
        require_str("loginCustomerId", &self.login_customer_id)?;
        check_dates(self.start_date.as_deref(), self.end_date.as_deref())
    }
}
