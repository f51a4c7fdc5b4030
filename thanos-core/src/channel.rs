// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{Result, ThanosError};
use crate::protocol::{Notification, Request, Response};

/// Route to the privileged background process.
///
/// Implementations deliver one request and hand back the raw reply object
/// untouched; validating its shape is the channel's job. A request the
/// background refused (wrong password, locked wallet) is reported as
/// [`ThanosError::Transport`].
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: &Request) -> impl Future<Output = Result<Value>> + Send;

    /// A fresh receiver for background pushes. Messages sent before the call
    /// are not replayed.
    fn subscribe(&self) -> broadcast::Receiver<Notification>;
}

pub struct MessageChannel<T> {
    transport: Arc<T>,
}

impl<T> Clone for MessageChannel<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> MessageChannel<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Sends `request` and returns the background's reply, which is
    /// guaranteed to carry the response tag paired with the request.
    pub async fn send(&self, request: Request) -> Result<Response> {
        let expected = request.expected_response();
        debug!(request = %request.message_type(), "Sending message to background");

        let raw = self.transport.send(&request).await?;
        let response = decode_response(raw)?;

        if response.message_type() != expected {
            warn!(
                %expected,
                received = %response.message_type(),
                "Background answered with a mismatched response"
            );
            return Err(ThanosError::ProtocolViolation);
        }

        Ok(response)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.transport.subscribe()
    }
}

fn decode_response(raw: Value) -> Result<Response> {
    let Some(tag) = raw.get("type").and_then(Value::as_str).map(str::to_owned) else {
        warn!("Background reply carries no message type");
        return Err(ThanosError::ProtocolViolation);
    };

    let response: Response = serde_json::from_value(raw).map_err(|e| {
        warn!(%tag, error = %e, "Undecodable background reply");
        ThanosError::ProtocolViolation
    })?;

    if let Response::GetState { state } = &response {
        if !state.is_consistent() {
            warn!(status = ?state.status(), "Ready session reported without accounts");
            return Err(ThanosError::ProtocolViolation);
        }
    }

    Ok(response)
}
