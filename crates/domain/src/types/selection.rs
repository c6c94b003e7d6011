//! Account selection types

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::MANAGER_ACCOUNT_SUFFIX;
use crate::types::accounts::{Account, Customer};

/// Account the user can pick in the account selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectableAccount {
    pub customer_id: String,
    pub login_customer_id: String,
    pub is_manager_account: bool,
    pub label: String,
}

impl SelectableAccount {
    pub fn new(
        customer_id: impl Into<String>,
        login_customer_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            login_customer_id: login_customer_id.into(),
            is_manager_account: false,
            label: label.into(),
        }
    }

    #[must_use]
    pub const fn manager(mut self, is_manager_account: bool) -> Self {
        self.is_manager_account = is_manager_account;
        self
    }

    /// `"<label> (<customer id>)"`, suffixed with ` [MCC]` for managers.
    pub fn display_label(&self) -> String {
        let suffix = if self.is_manager_account { MANAGER_ACCOUNT_SUFFIX } else { "" };
        format!("{} ({}){}", self.label, self.customer_id, suffix)
    }
}

impl From<&Customer> for SelectableAccount {
    fn from(customer: &Customer) -> Self {
        let label = first_non_empty(&[
            customer.customer_descriptive_name.as_deref(),
            customer.customer_name.as_deref(),
        ])
        .map_or_else(|| fallback_label(&customer.customer_id), str::to_string);

        Self {
            customer_id: customer.customer_id.clone(),
            login_customer_id: customer.login_customer_id.clone(),
            is_manager_account: customer.is_manager_account,
            label,
        }
    }
}

impl From<&Account> for SelectableAccount {
    fn from(account: &Account) -> Self {
        let label = first_non_empty(&[
            Some(account.descriptive_name.as_str()),
            Some(account.customer_name.as_str()),
        ])
        .map_or_else(|| fallback_label(&account.customer_id), str::to_string);

        let login_customer_id = account
            .login_customer_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| account.customer_id.clone());

        Self {
            customer_id: account.customer_id.clone(),
            login_customer_id,
            is_manager_account: account.is_manager_account,
            label,
        }
    }
}

/// Selector contents, split the way the selector groups them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectableAccounts {
    /// Customers already stored upstream
    pub stored: Vec<SelectableAccount>,
    /// Accessible accounts that have not been stored yet
    pub unstored: Vec<SelectableAccount>,
}

impl SelectableAccounts {
    /// Stored accounts first, then unstored ones.
    pub fn iter(&self) -> impl Iterator<Item = &SelectableAccount> {
        self.stored.iter().chain(self.unstored.iter())
    }

    /// Account with `customer_id` in either group.
    pub fn find(&self, customer_id: &str) -> Option<&SelectableAccount> {
        self.iter().find(|account| account.customer_id == customer_id)
    }

    pub fn len(&self) -> usize {
        self.stored.len() + self.unstored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge stored customers with accessible accounts.
///
/// Stored customers win; an accessible account only appears if no stored
/// customer has the same customer id.
pub fn selectable_accounts(customers: &[Customer], accounts: &[Account]) -> SelectableAccounts {
    let stored_ids: HashSet<&str> = customers.iter().map(|c| c.customer_id.as_str()).collect();

    SelectableAccounts {
        stored: customers.iter().map(SelectableAccount::from).collect(),
        unstored: accounts
            .iter()
            .filter(|a| !stored_ids.contains(a.customer_id.as_str()))
            .map(SelectableAccount::from)
            .collect(),
    }
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().flatten().copied().find(|s| !s.trim().is_empty())
}

fn fallback_label(customer_id: &str) -> String {
    format!("Customer {customer_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, descriptive: Option<&str>, name: Option<&str>) -> Customer {
        Customer {
            id: format!("row-{id}"),
            customer_id: id.into(),
            customer_name: name.map(Into::into),
            customer_descriptive_name: descriptive.map(Into::into),
            login_customer_id: "mcc-1".into(),
            is_manager_account: false,
            manager_customer_id: None,
            currency_code: None,
            time_zone: None,
            last_synced_at: None,
        }
    }

    fn account(id: &str, descriptive: &str, manager: bool) -> Account {
        Account {
            customer_id: id.into(),
            customer_name: String::new(),
            descriptive_name: descriptive.into(),
            currency_code: "USD".into(),
            time_zone: "UTC".into(),
            is_manager_account: manager,
            can_manage_clients: manager,
            login_customer_id: None,
        }
    }

    #[test]
    fn test_stored_customers_shadow_accounts() {
        let customers = vec![customer("1", Some("Stored One"), None)];
        let accounts = vec![account("1", "Live One", false), account("2", "Live Two", true)];

        let merged = selectable_accounts(&customers, &accounts);

        assert_eq!(merged.stored.len(), 1);
        assert_eq!(merged.stored[0].label, "Stored One");
        assert_eq!(merged.unstored.len(), 1);
        assert_eq!(merged.unstored[0].customer_id, "2");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_label_fallbacks() {
        assert_eq!(SelectableAccount::from(&customer("7", None, Some("Name"))).label, "Name");
        assert_eq!(SelectableAccount::from(&customer("7", Some(""), None)).label, "Customer 7");
        assert_eq!(SelectableAccount::from(&account("8", "", false)).label, "Customer 8");
    }

    #[test]
    fn test_unstored_login_defaults_to_own_id() {
        let selectable = SelectableAccount::from(&account("42", "Live", true));
        assert_eq!(selectable.login_customer_id, "42");
        assert_eq!(selectable.display_label(), "Live (42) [MCC]");
    }

    #[test]
    fn test_find_searches_both_groups() {
        let merged = selectable_accounts(
            &[customer("1", Some("A"), None)],
            &[account("2", "B", false)],
        );
        assert_eq!(merged.find("2").map(|a| a.label.as_str()), Some("B"));
        assert!(merged.find("3").is_none());
    }
}
