// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use proptest::prelude::*;

use thanos_core::{Account, AccountSelector, Request, SessionState, Status};

fn accounts(n: usize) -> Vec<Account> {
    (0..n)
        .map(|i| Account::new(format!("tz1{i:033}"), format!("Account {}", i + 1)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn selector_heals_after_shrink(selected in 0usize..32, before in 1usize..32, after in 0usize..32) {
        let mut selector = AccountSelector::new();
        selector.select(selected);
        selector.observe(&accounts(before));

        let held = selector.index();
        let observed = selector.observe(&accounts(after));
        if held >= after {
            prop_assert_eq!(observed, 0);
        } else {
            prop_assert_eq!(observed, held);
        }
        prop_assert_eq!(
            selector.account(&accounts(after)).is_some(),
            after > 0
        );
    }

    #[test]
    fn ready_state_without_accounts_is_rejected(n in 0usize..4) {
        let raw = serde_json::json!({
            "type": "GetStateResponse",
            "state": { "status": "Ready", "accounts": accounts(n) },
        });
        let state: SessionState = serde_json::from_value(raw["state"].clone()).unwrap();
        prop_assert_eq!(state.is_consistent(), n > 0);
        prop_assert_eq!(state.status(), Status::Ready);
    }

    #[test]
    fn edit_request_keeps_index(index in any::<u32>(), name in "[A-Za-z ]{1,20}") {
        let request = Request::EditAccount { account_index: index as usize, name: name.clone() };
        let json = serde_json::to_value(&request).unwrap();
        prop_assert_eq!(&json["type"], "EditAccountRequest");
        prop_assert_eq!(json["accountIndex"].as_u64(), Some(u64::from(index)));
        prop_assert_eq!(json["name"].as_str(), Some(name.as_str()));
    }
}
