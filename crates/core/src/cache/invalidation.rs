//! Which cached views a successful mutation makes stale

use adsync_domain::{SyncAccountStructureRequest, SyncSearchTermsRequest};

use super::key::{KeyParam, KeyPattern, ResourceKind};

/// A mutating upstream call, as far as invalidation is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Search terms of one customer were synced for a date range.
    SyncSearchTerms { customer_id: String, start_date: String, end_date: String },
    /// Campaigns, ad groups and keywords of one customer were synced.
    SyncAccountStructure { customer_id: String, login_customer_id: String },
}

impl Mutation {
    /// Operation name used in logs and `Busy` errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SyncSearchTerms { .. } => "syncSearchTerms",
            Self::SyncAccountStructure { .. } => "syncAccountStructure",
        }
    }

    pub fn customer_id(&self) -> &str {
        match self {
            Self::SyncSearchTerms { customer_id, .. }
            | Self::SyncAccountStructure { customer_id, .. } => customer_id,
        }
    }

    /// Patterns to invalidate once this mutation has succeeded.
    pub fn invalidates(&self) -> Vec<KeyPattern> {
        match self {
            Self::SyncSearchTerms { customer_id, start_date, end_date } => vec![
                KeyPattern::all(ResourceKind::Customers),
                KeyPattern::all(ResourceKind::SyncJobs).with(KeyParam::CustomerId, customer_id),
                KeyPattern::all(ResourceKind::StoredTerms)
                    .with(KeyParam::CustomerId, customer_id)
                    .with(KeyParam::StartDate, start_date)
                    .with(KeyParam::EndDate, end_date),
            ],
            Self::SyncAccountStructure { customer_id, .. } => vec![
                KeyPattern::all(ResourceKind::Customers),
                KeyPattern::all(ResourceKind::Campaigns),
                KeyPattern::all(ResourceKind::SyncJobs).with(KeyParam::CustomerId, customer_id),
            ],
        }
    }
}

impl From<&SyncSearchTermsRequest> for Mutation {
    fn from(request: &SyncSearchTermsRequest) -> Self {
        Self::SyncSearchTerms {
            customer_id: request.customer_id.trim().to_string(),
            start_date: request.start_date.trim().to_string(),
            end_date: request.end_date.trim().to_string(),
        }
    }
}

impl From<&SyncAccountStructureRequest> for Mutation {
    fn from(request: &SyncAccountStructureRequest) -> Self {
        Self::SyncAccountStructure {
            customer_id: request.customer_id.trim().to_string(),
            login_customer_id: request.login_customer_id.trim().to_string(),
        }
    }
}
