// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Suffix tables mapping node error ids to categories.
//!
//! Lookups scan in declaration order and take the first suffix the id ends
//! with. No suffix in a table may end another suffix of the same table, so
//! the first match is also the longest one.

use crate::beacon::BeaconErrorType;
use crate::messages::MessageKey;

#[derive(Debug)]
pub struct SuffixTable<V: 'static> {
    entries: &'static [(&'static str, V)],
}

impl<V: Copy + 'static> SuffixTable<V> {
    pub const fn new(entries: &'static [(&'static str, V)]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, id: &str) -> Option<V> {
        self.entries
            .iter()
            .find(|(suffix, _)| id.ends_with(suffix))
            .map(|(_, value)| *value)
    }

    pub fn entries(&self) -> &'static [(&'static str, V)] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub static BEACON_ERRORS: SuffixTable<BeaconErrorType> = SuffixTable::new(&[
    ("gas_exhausted.operation", BeaconErrorType::TooManyOperations),
    ("gas_exhausted.block", BeaconErrorType::TooManyOperations),
    ("storage_exhausted.operation", BeaconErrorType::TooManyOperations),
    ("prevalidation.oversized_operation", BeaconErrorType::TooManyOperations),
    ("gas_limit_too_high", BeaconErrorType::ParametersInvalidError),
    ("storage_limit_too_high", BeaconErrorType::ParametersInvalidError),
    ("contract.counter_in_the_past", BeaconErrorType::BroadcastError),
    ("contract.counter_in_the_future", BeaconErrorType::BroadcastError),
    ("contract.non_existing_contract", BeaconErrorType::ParametersInvalidError),
    ("contract.manager.unregistered_delegate", BeaconErrorType::ParametersInvalidError),
    ("michelson_v1.bad_contract_parameter", BeaconErrorType::ParametersInvalidError),
    ("contract.unrevealed_key", BeaconErrorType::NoPrivateKeyFoundError),
    ("operation.invalid_signature", BeaconErrorType::SignatureTypeNotSupported),
    ("contract.balance_too_low", BeaconErrorType::TransactionInvalidError),
    ("implicit.empty_implicit_contract", BeaconErrorType::TransactionInvalidError),
    ("tez.subtraction_underflow", BeaconErrorType::TransactionInvalidError),
    ("michelson_v1.script_rejected", BeaconErrorType::TransactionInvalidError),
    ("michelson_v1.runtime_error", BeaconErrorType::TransactionInvalidError),
]);

pub static KNOWN_TEZ_ERRORS: SuffixTable<MessageKey> = SuffixTable::new(&[
    ("implicit.empty_implicit_contract", MessageKey::EmptyImplicitContract),
    ("contract.balance_too_low", MessageKey::BalanceTooLow),
]);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_suffix_free<V: Copy + 'static>(table: &SuffixTable<V>) {
        for (i, (a, _)) in table.entries().iter().enumerate() {
            for (j, (b, _)) in table.entries().iter().enumerate() {
                if i != j {
                    assert!(!a.ends_with(b), "{a:?} ends with {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_tables_are_suffix_free() {
        assert_suffix_free(&BEACON_ERRORS);
        assert_suffix_free(&KNOWN_TEZ_ERRORS);
    }

    #[test]
    fn test_lookup_matches_suffix_only() {
        assert_eq!(
            KNOWN_TEZ_ERRORS.lookup("proto.005-PsBabyM1.contract.balance_too_low"),
            Some(MessageKey::BalanceTooLow)
        );
        assert_eq!(
            KNOWN_TEZ_ERRORS.lookup("contract.balance_too_low.proto"),
            None
        );
        assert_eq!(KNOWN_TEZ_ERRORS.lookup("balance_too_low"), None);
    }

    #[test]
    fn test_first_match_in_declaration_order() {
        static OVERLAPPING: SuffixTable<u8> =
            SuffixTable::new(&[("low", 1), ("too_low", 2)]);
        assert_eq!(OVERLAPPING.lookup("balance_too_low"), Some(1));
        assert_eq!(OVERLAPPING.len(), 2);
    }

    #[test]
    fn test_beacon_table_covers_message_table() {
        for (suffix, _) in KNOWN_TEZ_ERRORS.entries() {
            assert!(BEACON_ERRORS.lookup(suffix).is_some());
        }
    }
}
