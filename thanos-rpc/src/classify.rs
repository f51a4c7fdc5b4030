// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Turns node error replies into something a dApp or a user can act on.
//!
//! Both entry points decode the body the same way but fall back differently:
//! [`beacon_error_type`] never fails and degrades to a default kind, while
//! [`transform_http_response_error`] always hands back an error to raise and
//! keeps the original one when wrapping it is not possible.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::beacon::BeaconErrorType;
use crate::error::{ClassifiedError, HttpResponseError, Result, RpcError};
use crate::messages;
use crate::tables::{BEACON_ERRORS, KNOWN_TEZ_ERRORS};

/// First record of a node error body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorRecord {
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ErrorRecord {
    pub fn kind(&self) -> Option<&str> {
        self.rest.get("kind").and_then(Value::as_str)
    }
}

pub fn decode_error_record(err: &HttpResponseError) -> Result<ErrorRecord> {
    let body: Value =
        serde_json::from_str(&err.body).map_err(|e| RpcError::MalformedErrorBody {
            url: err.url.clone(),
            message: format!("Malformed error body from {}: {e}", err.url),
        })?;

    let first = body
        .as_array()
        .and_then(|records| records.first())
        .filter(|record| record.get("id").is_some_and(Value::is_string))
        .ok_or(RpcError::NotAJsonRpcError)?;

    ErrorRecord::deserialize(first).map_err(|_| RpcError::NotAJsonRpcError)
}

/// Category reported back to a dApp for a failed operation.
pub fn beacon_error_type(err: &HttpResponseError) -> BeaconErrorType {
    match decode_error_record(err) {
        Ok(record) => BEACON_ERRORS.lookup(&record.id).unwrap_or_else(|| {
            debug!(id = %record.id, "No beacon error kind for node error");
            BeaconErrorType::TransactionInvalidError
        }),
        Err(RpcError::NotAJsonRpcError) => {
            debug!(url = %err.url, "Node error body has no error record");
            BeaconErrorType::TransactionInvalidError
        }
        Err(e) => {
            debug!(url = %err.url, error = %e, "Undecodable node error body");
            BeaconErrorType::UnknownError
        }
    }
}

/// The error to surface to the user for a failed node call.
pub fn transform_http_response_error(err: HttpResponseError) -> RpcError {
    let payload: Value = match serde_json::from_str(&err.body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!(url = %err.url, error = %e, "Node error body is not JSON");
            return RpcError::MalformedErrorBody {
                message: messages::unknown_error_from_rpc(&err.url),
                url: err.url,
            };
        }
    };

    let first = match &payload {
        Value::Null => return RpcError::Http(err),
        Value::Array(records) => records.first(),
        _ => None,
    };

    let id = match first.and_then(|record| record.get("id")) {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.as_str()),
        Some(_) => return RpcError::Http(err),
    };

    let key = id.and_then(|id| KNOWN_TEZ_ERRORS.lookup(id));
    trace!(?id, ?key, "Classified node error");
    let message = match key {
        Some(key) => key.text().to_string(),
        None => err.message,
    };

    RpcError::Classified(ClassifiedError {
        message,
        key,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageKey;

    fn http_error(body: &str) -> HttpResponseError {
        HttpResponseError::new(500, "Internal Server Error", "https://rpc.example", body)
    }

    #[test]
    fn test_decode_keeps_extra_fields() {
        let record = decode_error_record(&http_error(
            r#"[{"kind":"temporary","id":"proto.005-PsBabyM1.contract.balance_too_low","amount":"5"}]"#,
        ))
        .unwrap();
        assert_eq!(record.id, "proto.005-PsBabyM1.contract.balance_too_low");
        assert_eq!(record.kind(), Some("temporary"));
        assert_eq!(record.rest["amount"], "5");
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = decode_error_record(&http_error("<html>")).unwrap_err();
        assert!(matches!(err, RpcError::MalformedErrorBody { ref url, .. } if url == "https://rpc.example"));
    }

    #[test]
    fn test_decode_rejects_unstructured_json() {
        for body in ["{}", "[]", "[1]", "[{}]", r#"[{"id":7}]"#, "null", r#""text""#] {
            let err = decode_error_record(&http_error(body)).unwrap_err();
            assert!(matches!(err, RpcError::NotAJsonRpcError), "{body}");
        }
    }

    #[test]
    fn test_unmatched_message_falls_back_to_transport_message() {
        let err = transform_http_response_error(http_error(r#"[{"id":"proto.alpha.foo"}]"#));
        let RpcError::Classified(classified) = err else {
            panic!("expected classified error");
        };
        assert_eq!(classified.message, "Http error response: (500) [{\"id\":\"proto.alpha.foo\"}]");
        assert_eq!(classified.key, None);
    }

    #[test]
    fn test_matched_message_carries_key() {
        let err = transform_http_response_error(http_error(
            r#"[{"id":"proto.alpha.implicit.empty_implicit_contract"}]"#,
        ));
        let RpcError::Classified(classified) = err else {
            panic!("expected classified error");
        };
        assert_eq!(classified.key, Some(MessageKey::EmptyImplicitContract));
        assert_eq!(classified.message, MessageKey::EmptyImplicitContract.text());
    }
}
