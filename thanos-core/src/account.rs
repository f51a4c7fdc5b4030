// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use tracing::debug;

use crate::protocol::Account;

/// Index of the account a consumer is looking at. The account itself is
/// always read out of the latest list, never kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountSelector {
    index: usize,
}

impl AccountSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn select(&mut self, index: usize) {
        self.index = index;
    }

    /// Applies the bounds rule against a freshly observed list: an index that
    /// fell off the end (the list shrank) falls back to the first account.
    pub fn observe(&mut self, accounts: &[Account]) -> usize {
        if self.index >= accounts.len() && self.index != 0 {
            debug!(
                index = self.index,
                len = accounts.len(),
                "Selected account out of range, resetting to first"
            );
            self.index = 0;
        }
        self.index
    }

    pub fn account<'a>(&self, accounts: &'a [Account]) -> Option<&'a Account> {
        accounts.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(n: usize) -> Vec<Account> {
        (0..n)
            .map(|i| Account::new(format!("tz1{i:033}"), format!("Account {}", i + 1)))
            .collect()
    }

    #[test]
    fn test_starts_at_first_account() {
        let mut selector = AccountSelector::new();
        let list = accounts(3);
        assert_eq!(selector.observe(&list), 0);
        assert_eq!(selector.account(&list).unwrap().name(), "Account 1");
    }

    #[test]
    fn test_shrink_resets_on_next_observation() {
        let mut selector = AccountSelector::new();
        selector.select(2);
        let shrunk = accounts(2);

        assert!(selector.account(&shrunk).is_none());
        assert_eq!(selector.index(), 2);

        assert_eq!(selector.observe(&shrunk), 0);
        assert_eq!(selector.account(&shrunk).unwrap().name(), "Account 1");
    }

    #[test]
    fn test_in_range_index_survives() {
        let mut selector = AccountSelector::new();
        selector.select(1);
        assert_eq!(selector.observe(&accounts(2)), 1);
        assert_eq!(selector.observe(&accounts(5)), 1);
    }

    #[test]
    fn test_empty_list_degrades_to_no_account() {
        let mut selector = AccountSelector::new();
        selector.select(4);
        assert_eq!(selector.observe(&[]), 0);
        assert!(selector.account(&[]).is_none());
    }
}
