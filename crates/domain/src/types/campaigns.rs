//! Campaign, ad group and keyword types

use serde::{Deserialize, Serialize};

/// Campaign as returned by the campaigns resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    #[serde(default)]
    pub advertising_channel_type: String,
    #[serde(default)]
    pub budget_amount: f64,
    #[serde(default)]
    pub currency_code: String,
    /// Present only when a date range was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<CampaignMetrics>,
    /// Present only when ad groups were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_groups: Option<Vec<AdGroup>>,
}

impl Campaign {
    /// Ad groups included with the campaign; zero when not requested.
    pub fn ad_group_count(&self) -> usize {
        self.ad_groups.as_ref().map_or(0, Vec::len)
    }
}

/// Aggregated campaign metrics for the requested date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub cost: f64,
    pub conversions: f64,
    /// Click-through rate as a fraction (0.05 = 5%).
    #[serde(default)]
    pub ctr: f64,
}

/// Ad group of a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroup {
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    #[serde(rename = "type", default)]
    pub ad_group_type: String,
    #[serde(default)]
    pub cpc_bid_micros: i64,
    #[serde(default)]
    pub cpc_bid: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cpa_micros: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cpa: Option<f64>,
}

/// Keyword criterion of an ad group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub keyword_id: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub keyword_text: String,
    pub match_type: String,
    pub status: String,
    #[serde(default)]
    pub final_urls: Vec<String>,
    #[serde(default)]
    pub cpc_bid_micros: i64,
    #[serde(default)]
    pub cpc_bid: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_with_nested_ad_groups() {
        let campaign: Campaign = serde_json::from_str(
            r#"{
                "campaignId": "c1",
                "campaignName": "Brand",
                "status": "ENABLED",
                "advertisingChannelType": "SEARCH",
                "budgetAmount": 50.0,
                "currencyCode": "EUR",
                "metrics": {"impressions": 100, "clicks": 7, "cost": 3.5, "conversions": 1.0, "ctr": 0.07},
                "adGroups": [{
                    "adGroupId": "g1",
                    "adGroupName": "Exact",
                    "campaignId": "c1",
                    "campaignName": "Brand",
                    "status": "ENABLED",
                    "type": "SEARCH_STANDARD",
                    "cpcBidMicros": 1200000,
                    "cpcBid": 1.2
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(campaign.ad_group_count(), 1);
        assert_eq!(campaign.metrics.as_ref().unwrap().clicks, 7);
        let group = &campaign.ad_groups.as_ref().unwrap()[0];
        assert_eq!(group.ad_group_type, "SEARCH_STANDARD");
        assert_eq!(group.target_cpa, None);
    }

    #[test]
    fn test_campaign_without_metrics() {
        let campaign: Campaign = serde_json::from_str(
            r#"{"campaignId": "c2", "campaignName": "Generic", "status": "PAUSED"}"#,
        )
        .unwrap();
        assert!(campaign.metrics.is_none());
        assert_eq!(campaign.ad_group_count(), 0);
    }
}
