// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Memoised chain-id lookup keyed by RPC endpoint.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{HttpResponseError, Result, RpcError};

pub const DEFAULT_CHAIN_ID_CACHE_SIZE: usize = 100;

const CHAIN_ID_PREFIX: &str = "Net";

/// Something that can ask a node which chain it serves.
pub trait ChainIdSource: Send + Sync + 'static {
    fn fetch_chain_id(&self, rpc_url: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpChainIdSource {
    client: reqwest::Client,
}

impl HttpChainIdSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ChainIdSource for HttpChainIdSource {
    async fn fetch_chain_id(&self, rpc_url: &str) -> Result<String> {
        let url = format!("{}/chains/main/chain_id", rpc_url.trim_end_matches('/'));
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url = %url, error = %e, "Failed to read node error body");
                    String::new()
                }
            };
            return Err(RpcError::Http(HttpResponseError::new(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                url,
                body,
            )));
        }

        let chain_id: String = resp.json().await?;
        if !chain_id.starts_with(CHAIN_ID_PREFIX) {
            return Err(RpcError::InvalidChainId(chain_id));
        }
        Ok(chain_id)
    }
}

type Slot = Arc<OnceCell<String>>;

#[derive(Default)]
struct Slots {
    /// Resolved ids, most recently used first.
    resident: VecDeque<(String, String)>,
    in_flight: HashMap<String, Slot>,
}

impl Slots {
    fn touch(&mut self, rpc_url: &str) -> Option<String> {
        let pos = self.resident.iter().position(|(url, _)| url == rpc_url)?;
        let entry = self.resident.remove(pos)?;
        let chain_id = entry.1.clone();
        self.resident.push_front(entry);
        Some(chain_id)
    }

    fn insert(&mut self, rpc_url: &str, chain_id: &str, max_size: usize) {
        self.resident.retain(|(url, _)| url != rpc_url);
        self.resident
            .push_front((rpc_url.to_string(), chain_id.to_string()));
        while self.resident.len() > max_size {
            if let Some((evicted, _)) = self.resident.pop_back() {
                debug!(rpc_url = %evicted, "Chain id cache full, dropping oldest endpoint");
            }
        }
    }
}

/// Bounded most-recently-used cache in front of a [`ChainIdSource`].
///
/// Concurrent lookups of one endpoint share a single call. Only successful
/// lookups take a slot, so failing endpoints never push out cached ids.
pub struct ChainIdCache<S> {
    source: S,
    max_size: usize,
    slots: Mutex<Slots>,
}

impl<S: ChainIdSource> ChainIdCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_max_size(source, DEFAULT_CHAIN_ID_CACHE_SIZE)
    }

    pub fn with_max_size(source: S, max_size: usize) -> Self {
        Self {
            source,
            max_size: max_size.max(1),
            slots: Mutex::new(Slots::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.slots.lock().resident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().resident.is_empty()
    }

    pub fn contains(&self, rpc_url: &str) -> bool {
        self.slots
            .lock()
            .resident
            .iter()
            .any(|(url, _)| url == rpc_url)
    }

    pub async fn get(&self, rpc_url: &str) -> Result<String> {
        let slot = {
            let mut slots = self.slots.lock();
            if let Some(chain_id) = slots.touch(rpc_url) {
                debug!(rpc_url, "Chain id cache hit");
                return Ok(chain_id);
            }
            Arc::clone(slots.in_flight.entry(rpc_url.to_string()).or_default())
        };

        let result = slot
            .get_or_try_init(|| async {
                info!(rpc_url, "Fetching chain id");
                self.source.fetch_chain_id(rpc_url).await
            })
            .await
            .cloned();

        self.settle(rpc_url, &slot, &result);
        result
    }

    fn settle(&self, rpc_url: &str, slot: &Slot, result: &Result<String>) {
        let mut slots = self.slots.lock();
        if slots
            .in_flight
            .get(rpc_url)
            .is_some_and(|held| Arc::ptr_eq(held, slot))
        {
            slots.in_flight.remove(rpc_url);
        }
        match result {
            Ok(chain_id) => slots.insert(rpc_url, chain_id, self.max_size),
            Err(e) => debug!(rpc_url, error = %e, "Chain id lookup failed, not caching"),
        }
    }
}
