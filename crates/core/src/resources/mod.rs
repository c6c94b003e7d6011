//! Typed read requests and their results

pub mod ports;

use adsync_domain::{
    Account, AdGroup, AdGroupsQuery, AdSyncError, Campaign, CampaignsQuery, Customer, Keyword,
    KeywordsQuery, Result, SearchTerm, SearchTermsQuery, StoredTermsQuery, SyncJob, SyncJobsQuery,
};

use crate::cache::key::{KeyParam, ResourceKey, ResourceKind};

/// A read against one upstream resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    Accounts,
    Customers,
    Campaigns(CampaignsQuery),
    AdGroups(AdGroupsQuery),
    Keywords(KeywordsQuery),
    SearchTerms(SearchTermsQuery),
    StoredTerms(StoredTermsQuery),
    SyncJobs(SyncJobsQuery),
}

fn present(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

impl ResourceRequest {
    /// Resource this request reads.
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Accounts => ResourceKind::Accounts,
            Self::Customers => ResourceKind::Customers,
            Self::Campaigns(_) => ResourceKind::Campaigns,
            Self::AdGroups(_) => ResourceKind::AdGroups,
            Self::Keywords(_) => ResourceKind::Keywords,
            Self::SearchTerms(_) => ResourceKind::SearchTerms,
            Self::StoredTerms(_) => ResourceKind::StoredTerms,
            Self::SyncJobs(_) => ResourceKind::SyncJobs,
        }
    }

    /// Trimmed, non-empty value of `param`, if this request carries it.
    pub fn param(&self, param: KeyParam) -> Option<String> {
        use KeyParam::{
            AdGroupId, CampaignId, CustomerId, EndDate, IncludeAdGroups, LoginCustomerId, StartDate,
        };

        match (self, param) {
            (Self::Campaigns(q), CustomerId) => present(q.customer_id.as_ref()),
            (Self::Campaigns(q), LoginCustomerId) => present(q.login_customer_id.as_ref()),
            (Self::Campaigns(q), StartDate) => present(q.start_date.as_ref()),
            (Self::Campaigns(q), EndDate) => present(q.end_date.as_ref()),
            (Self::Campaigns(q), IncludeAdGroups) => q.include_ad_groups.map(|b| b.to_string()),

            (Self::AdGroups(q), CustomerId) => present(q.customer_id.as_ref()),
            (Self::AdGroups(q), LoginCustomerId) => present(q.login_customer_id.as_ref()),
            (Self::AdGroups(q), CampaignId) => present(q.campaign_id.as_ref()),

            (Self::Keywords(q), CustomerId) => present(q.customer_id.as_ref()),
            (Self::Keywords(q), LoginCustomerId) => present(q.login_customer_id.as_ref()),
            (Self::Keywords(q), AdGroupId) => present(q.ad_group_id.as_ref()),
            (Self::Keywords(q), CampaignId) => present(q.campaign_id.as_ref()),

            (Self::SearchTerms(q), CustomerId) => present(q.customer_id.as_ref()),
            (Self::SearchTerms(q), LoginCustomerId) => present(q.login_customer_id.as_ref()),
            (Self::SearchTerms(q), StartDate) => present(q.start_date.as_ref()),
            (Self::SearchTerms(q), EndDate) => present(q.end_date.as_ref()),

            (Self::StoredTerms(q), CustomerId) => present(q.customer_id.as_ref()),
            (Self::StoredTerms(q), StartDate) => present(q.start_date.as_ref()),
            (Self::StoredTerms(q), EndDate) => present(q.end_date.as_ref()),

            (Self::SyncJobs(q), CustomerId) => present(q.customer_id.as_ref()),

            _ => None,
        }
    }

    /// Cache key derived from the key table.
    pub fn key(&self) -> ResourceKey {
        let kind = self.kind();
        let values = kind.key_params().iter().map(|p| self.param(*p)).collect();
        ResourceKey::new(kind, values)
    }

    /// Required parameters that are absent or blank.
    pub fn missing_params(&self) -> Vec<KeyParam> {
        self.kind()
            .required_params()
            .iter()
            .copied()
            .filter(|p| self.param(*p).is_none())
            .collect()
    }

    /// Whether a read may be issued at all.
    pub fn is_enabled(&self) -> bool {
        self.missing_params().is_empty()
    }

    /// Full parameter validation, including date formats.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Accounts | Self::Customers => Ok(()),
            Self::Campaigns(q) => q.validate(),
            Self::AdGroups(q) => q.validate(),
            Self::Keywords(q) => q.validate(),
            Self::SearchTerms(q) => q.validate(),
            Self::StoredTerms(q) => q.validate(),
            Self::SyncJobs(q) => q.validate(),
        }
    }
}

/// Result of a read, one variant per resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    Accounts(Vec<Account>),
    Customers(Vec<Customer>),
    Campaigns(Vec<Campaign>),
    AdGroups(Vec<AdGroup>),
    Keywords(Vec<Keyword>),
    SearchTerms(Vec<SearchTerm>),
    StoredTerms(Vec<SearchTerm>),
    SyncJobs(Vec<SyncJob>),
}

impl ResourceData {
    /// Resource this data came from.
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Accounts(_) => ResourceKind::Accounts,
            Self::Customers(_) => ResourceKind::Customers,
            Self::Campaigns(_) => ResourceKind::Campaigns,
            Self::AdGroups(_) => ResourceKind::AdGroups,
            Self::Keywords(_) => ResourceKind::Keywords,
            Self::SearchTerms(_) => ResourceKind::SearchTerms,
            Self::StoredTerms(_) => ResourceKind::StoredTerms,
            Self::SyncJobs(_) => ResourceKind::SyncJobs,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Self::Accounts(v) => v.len(),
            Self::Customers(v) => v.len(),
            Self::Campaigns(v) => v.len(),
            Self::AdGroups(v) => v.len(),
            Self::Keywords(v) => v.len(),
            Self::SearchTerms(v) | Self::StoredTerms(v) => v.len(),
            Self::SyncJobs(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_accounts(&self) -> Option<&[Account]> {
        match self {
            Self::Accounts(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_customers(&self) -> Option<&[Customer]> {
        match self {
            Self::Customers(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_campaigns(&self) -> Option<&[Campaign]> {
        match self {
            Self::Campaigns(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ad_groups(&self) -> Option<&[AdGroup]> {
        match self {
            Self::AdGroups(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_keywords(&self) -> Option<&[Keyword]> {
        match self {
            Self::Keywords(v) => Some(v),
            _ => None,
        }
    }

    /// Live or stored search terms.
    pub fn as_search_terms(&self) -> Option<&[SearchTerm]> {
        match self {
            Self::SearchTerms(v) | Self::StoredTerms(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sync_jobs(&self) -> Option<&[SyncJob]> {
        match self {
            Self::SyncJobs(v) => Some(v),
            _ => None,
        }
    }

    /// Fail with `MalformedResponse` unless the data matches `expected`.
    ///
    /// Guards against a port answering a request with the wrong variant.
    pub fn expect_kind(self, expected: ResourceKind) -> Result<Self> {
        if self.kind() == expected {
            Ok(self)
        } else {
            Err(AdSyncError::MalformedResponse(format!(
                "expected {expected} data, got {}",
                self.kind()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaigns(customer: Option<&str>, login: Option<&str>) -> ResourceRequest {
        ResourceRequest::Campaigns(CampaignsQuery {
            customer_id: customer.map(Into::into),
            login_customer_id: login.map(Into::into),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            include_ad_groups: Some(true),
        })
    }

    #[test]
    fn test_key_follows_table_order() {
        let key = campaigns(Some("123"), Some("999")).key();
        assert_eq!(
            key.values(),
            &[
                Some("123".to_string()),
                Some("999".to_string()),
                Some("2024-01-01".to_string()),
                Some("2024-01-31".to_string()),
                Some("true".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_required_param_disables() {
        let request = campaigns(Some("123"), Some("  "));
        assert!(!request.is_enabled());
        assert_eq!(request.missing_params(), vec![KeyParam::LoginCustomerId]);
        assert!(ResourceRequest::Accounts.is_enabled());
    }

    #[test]
    fn test_identical_requests_share_a_key() {
        assert_eq!(
            campaigns(Some("123"), Some("999")).key(),
            campaigns(Some(" 123 "), Some("999")).key()
        );
        assert_ne!(
            campaigns(Some("123"), Some("999")).key(),
            campaigns(Some("124"), Some("999")).key()
        );
    }

    #[test]
    fn test_expect_kind() {
        let data = ResourceData::SyncJobs(Vec::new());
        assert!(data.clone().expect_kind(ResourceKind::SyncJobs).is_ok());
        assert!(matches!(
            data.expect_kind(ResourceKind::Customers),
            Err(AdSyncError::MalformedResponse(_))
        ));
    }
}
