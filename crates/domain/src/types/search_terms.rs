//! Search term types

use serde::{Deserialize, Serialize};

/// Search term row, either live from Google or stored after a sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTerm {
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub search_term: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub metrics: SearchTermMetrics,
}

/// Performance of one search term over the requested range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTermMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub cost: f64,
    pub conversions: f64,
}
