// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Thanos RPC - node-facing helpers for the wallet
//!
//! - Decoding and classifying Tezos node error bodies
//! - Beacon error kinds for dApp operation reports
//! - Memoised chain-id lookup per RPC endpoint

pub mod beacon;
pub mod chain_id;
pub mod classify;
pub mod error;
pub mod messages;
pub mod tables;

pub use beacon::BeaconErrorType;
pub use chain_id::{ChainIdCache, ChainIdSource, HttpChainIdSource, DEFAULT_CHAIN_ID_CACHE_SIZE};
pub use classify::{
    beacon_error_type, decode_error_record, transform_http_response_error, ErrorRecord,
};
pub use error::{ClassifiedError, HttpResponseError, Result, RpcError};
pub use messages::MessageKey;
pub use tables::{SuffixTable, BEACON_ERRORS, KNOWN_TEZ_ERRORS};
