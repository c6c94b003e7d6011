//! Account and customer types

use serde::{Deserialize, Serialize};

/// Google Ads account reachable with the connected credentials (live from
/// Google, not yet necessarily stored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub descriptive_name: String,
    #[serde(default)]
    pub currency_code: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub is_manager_account: bool,
    #[serde(default)]
    pub can_manage_clients: bool,
    /// Manager account to authenticate through, when upstream knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_customer_id: Option<String>,
}

/// Customer persisted by the upstream system (database source of truth)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_descriptive_name: Option<String>,
    pub login_customer_id: String,
    #[serde(default)]
    pub is_manager_account: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<String>,
}
