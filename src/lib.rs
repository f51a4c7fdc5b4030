// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Thanos - wallet front-end session client
//!
//! Re-exports the session client from `thanos-core` and the node error
//! helpers from `thanos-rpc`, and wires them up from a [`Config`].

pub mod config;
pub mod logging;

use std::sync::Arc;

use tracing::info;

pub use thanos_core::{
    Account, AccountSelector, FrontView, MessageChannel, Mnemonic, Notification, Password,
    PushListener, Request, Response, Result, SessionState, SessionStore, Status, ThanosError,
    Transport, WalletFront,
};
#[cfg(feature = "test-utils")]
pub use thanos_core::MockBackground;
pub use thanos_rpc::{
    beacon_error_type, transform_http_response_error, BeaconErrorType, ChainIdCache,
    ChainIdSource, ClassifiedError, HttpChainIdSource, HttpResponseError, MessageKey, RpcError,
};

pub use crate::config::{Config, LogLevel};
pub use crate::logging::init_logging;

/// Builds a session store over `transport` and starts listening for its
/// pushes. The store stays fresh for as long as the listener is held.
pub fn connect<T: Transport>(transport: Arc<T>) -> Result<(SessionStore<T>, PushListener)> {
    let store = SessionStore::new(MessageChannel::new(transport));
    let listener = store.listen()?;
    info!("Session store connected");
    Ok((store, listener))
}

/// Chain-id cache sized and timed from `config`.
pub fn chain_id_cache(config: &Config) -> thanos_rpc::Result<ChainIdCache<HttpChainIdSource>> {
    let source = HttpChainIdSource::new(config.timeout())?;
    Ok(ChainIdCache::with_max_size(
        source,
        config.chain_id_cache_size(),
    ))
}
