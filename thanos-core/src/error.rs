// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThanosError {
    /// The background process replied with a message that has no recognisable
    /// type tag, or with a tag that does not pair with the request.
    #[error("Invalid response received")]
    ProtocolViolation,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Home directory not found")]
    HomeNotFound,

    /// A failure observed by several waiters of the same state fetch.
    #[error("{0}")]
    Shared(Arc<ThanosError>),
}

impl ThanosError {
    /// Looks through [`ThanosError::Shared`] wrappers.
    pub fn root(&self) -> &ThanosError {
        match self {
            ThanosError::Shared(inner) => inner.root(),
            other => other,
        }
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self.root(), ThanosError::ProtocolViolation)
    }
}

pub type Result<T> = std::result::Result<T, ThanosError>;
