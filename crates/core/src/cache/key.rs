//! Declarative resource key table
//!
//! Every readable resource has exactly one row in [`KEY_TABLE`]: its cache
//! name, the ordered parameters that make up its key and the subset that
//! must be present before a read may be issued. Reads derive keys from the
//! table and mutations build invalidation patterns from it, so the two can
//! never disagree about parameter order.

use std::fmt;

/// Readable upstream resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Accounts reachable with the session token.
    Accounts,
    /// Customers already stored upstream.
    Customers,
    /// Campaigns of one customer, optionally with their ad groups.
    Campaigns,
    /// Ad groups of one customer, optionally of one campaign.
    AdGroups,
    /// Keywords of one ad group.
    Keywords,
    /// Live search terms for a date range.
    SearchTerms,
    /// Search terms stored by a previous sync.
    StoredTerms,
    /// Sync jobs of one customer.
    SyncJobs,
}

/// Semantic parameters a key can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyParam {
    CustomerId,
    LoginCustomerId,
    CampaignId,
    AdGroupId,
    StartDate,
    EndDate,
    IncludeAdGroups,
}

impl KeyParam {
    /// Wire name used in query strings and error messages.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::CustomerId => "customerId",
            Self::LoginCustomerId => "loginCustomerId",
            Self::CampaignId => "campaignId",
            Self::AdGroupId => "adGroupId",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::IncludeAdGroups => "includeAdGroups",
        }
    }
}

struct KeySpec {
    name: &'static str,
    params: &'static [KeyParam],
    required: &'static [KeyParam],
}

use KeyParam::{AdGroupId, CampaignId, CustomerId, EndDate, IncludeAdGroups, LoginCustomerId, StartDate};

/// Indexed by `ResourceKind as usize`.
static KEY_TABLE: [KeySpec; 8] = [
    KeySpec { name: "accounts", params: &[], required: &[] },
    KeySpec { name: "customers", params: &[], required: &[] },
    KeySpec {
        name: "campaigns",
        params: &[CustomerId, LoginCustomerId, StartDate, EndDate, IncludeAdGroups],
        required: &[CustomerId, LoginCustomerId],
    },
    KeySpec {
        name: "adGroups",
        params: &[CustomerId, LoginCustomerId, CampaignId],
        required: &[CustomerId, LoginCustomerId],
    },
    KeySpec {
        name: "keywords",
        params: &[CustomerId, LoginCustomerId, AdGroupId, CampaignId],
        required: &[CustomerId, LoginCustomerId, AdGroupId],
    },
    KeySpec {
        name: "searchTerms",
        params: &[CustomerId, LoginCustomerId, StartDate, EndDate],
        required: &[CustomerId, LoginCustomerId, StartDate, EndDate],
    },
    KeySpec {
        name: "storedTerms",
        params: &[CustomerId, StartDate, EndDate],
        required: &[CustomerId],
    },
    KeySpec { name: "syncJobs", params: &[CustomerId], required: &[CustomerId] },
];

impl ResourceKind {
    /// Every kind, in key table order.
    pub const ALL: [Self; 8] = [
        Self::Accounts,
        Self::Customers,
        Self::Campaigns,
        Self::AdGroups,
        Self::Keywords,
        Self::SearchTerms,
        Self::StoredTerms,
        Self::SyncJobs,
    ];

    fn spec(self) -> &'static KeySpec {
        &KEY_TABLE[self as usize]
    }

    /// Name used as the first key component.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Ordered parameters that make up the key.
    pub fn key_params(self) -> &'static [KeyParam] {
        self.spec().params
    }

    /// Parameters that must be present before a read is issued.
    pub fn required_params(self) -> &'static [KeyParam] {
        self.spec().required
    }

    /// Position of `param` in the key, if it is part of it.
    pub fn position(self, param: KeyParam) -> Option<usize> {
        self.key_params().iter().position(|p| *p == param)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable cache key: resource name plus parameter values in table order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    kind: ResourceKind,
    values: Vec<Option<String>>,
}

impl ResourceKey {
    /// Build a key from values in table order. Missing trailing values are
    /// padded with `None`; extra values are ignored.
    pub fn new(kind: ResourceKind, values: Vec<Option<String>>) -> Self {
        let mut values = values;
        values.resize(kind.key_params().len(), None);
        Self { kind, values }
    }

    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Parameter values in table order; `None` where unset.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Value of one key parameter.
    pub fn get(&self, param: KeyParam) -> Option<&str> {
        self.kind
            .position(param)
            .and_then(|i| self.values.get(i))
            .and_then(Option::as_deref)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.kind.name())?;
        for value in &self.values {
            match value {
                Some(v) => write!(f, ", {v}")?,
                None => f.write_str(", -")?,
            }
        }
        f.write_str("]")
    }
}

/// Prefix-style match over keys of one resource
///
/// A pattern with no filters matches every key of its kind. A filter on a
/// parameter the kind does not key on matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    kind: ResourceKind,
    filters: Vec<(KeyParam, String)>,
}

impl KeyPattern {
    /// Match all keys of `kind`.
    pub const fn all(kind: ResourceKind) -> Self {
        Self { kind, filters: Vec::new() }
    }

    /// Also require `param` to equal `value`.
    #[must_use]
    pub fn with(mut self, param: KeyParam, value: impl Into<String>) -> Self {
        self.filters.push((param, value.into()));
        self
    }

    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Whether `key` is of this kind and passes every filter.
    pub fn matches(&self, key: &ResourceKey) -> bool {
        key.kind() == self.kind
            && self.filters.iter().all(|(param, value)| {
                self.kind.position(*param).is_some() && key.get(*param) == Some(value.as_str())
            })
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.name())?;
        for (param, value) in &self.filters {
            write!(f, " {}={value}", param.wire_name())?;
        }
        Ok(())
    }
}
