// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! User-facing texts for node errors, keyed the way the locale bundles are.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    EmptyImplicitContract,
    BalanceTooLow,
    #[serde(rename = "unknownErrorFromRPC")]
    UnknownErrorFromRpc,
}

impl MessageKey {
    pub fn id(self) -> &'static str {
        match self {
            MessageKey::EmptyImplicitContract => "emptyImplicitContract",
            MessageKey::BalanceTooLow => "balanceTooLow",
            MessageKey::UnknownErrorFromRpc => "unknownErrorFromRPC",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            MessageKey::EmptyImplicitContract => "Empty implicit contract",
            MessageKey::BalanceTooLow => "Balance too low",
            MessageKey::UnknownErrorFromRpc => "Unknown error from RPC",
        }
    }
}

/// Text shown when a node answers with a body that is not JSON.
pub fn unknown_error_from_rpc(url: &str) -> String {
    format!("{} {url}", MessageKey::UnknownErrorFromRpc.text())
}
