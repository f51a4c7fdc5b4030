// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::messages::MessageKey;

/// A non-success reply from a node RPC endpoint, body kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseError {
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub body: String,
    pub message: String,
}

impl HttpResponseError {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let body = body.into();
        Self {
            message: format!("Http error response: ({status}) {body}"),
            status,
            status_text: status_text.into(),
            url: url.into(),
            body,
        }
    }
}

impl fmt::Display for HttpResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpResponseError {}

/// A decoded node error ready for display, with the parsed body attached for
/// upstream logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    pub message: String,
    pub key: Option<MessageKey>,
    pub payload: Value,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("{message}")]
    MalformedErrorBody { url: String, message: String },

    #[error("Not a JSON RPC error response")]
    NotAJsonRpcError,

    #[error("{0}")]
    Classified(ClassifiedError),

    #[error("{0}")]
    Http(HttpResponseError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),
}

impl RpcError {
    pub fn url(&self) -> Option<&str> {
        match self {
            RpcError::MalformedErrorBody { url, .. } => Some(url),
            RpcError::Http(err) => Some(&err.url),
            RpcError::Request(err) => err.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
