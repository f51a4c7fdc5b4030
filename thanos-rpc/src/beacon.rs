// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error categories a dApp understands when an operation request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeaconErrorType {
    BroadcastError,
    NetworkNotSupported,
    NoAddressError,
    NoPrivateKeyFoundError,
    NotGrantedError,
    ParametersInvalidError,
    TooManyOperations,
    TransactionInvalidError,
    SignatureTypeNotSupported,
    AbortedError,
    UnknownError,
}

impl BeaconErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            BeaconErrorType::BroadcastError => "BROADCAST_ERROR",
            BeaconErrorType::NetworkNotSupported => "NETWORK_NOT_SUPPORTED",
            BeaconErrorType::NoAddressError => "NO_ADDRESS_ERROR",
            BeaconErrorType::NoPrivateKeyFoundError => "NO_PRIVATE_KEY_FOUND_ERROR",
            BeaconErrorType::NotGrantedError => "NOT_GRANTED_ERROR",
            BeaconErrorType::ParametersInvalidError => "PARAMETERS_INVALID_ERROR",
            BeaconErrorType::TooManyOperations => "TOO_MANY_OPERATIONS",
            BeaconErrorType::TransactionInvalidError => "TRANSACTION_INVALID_ERROR",
            BeaconErrorType::SignatureTypeNotSupported => "SIGNATURE_TYPE_NOT_SUPPORTED",
            BeaconErrorType::AbortedError => "ABORTED_ERROR",
            BeaconErrorType::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for BeaconErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
