// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Idle,
    Locked,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    public_key_hash: String,
    name: String,
}

impl Account {
    pub fn new(public_key_hash: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            public_key_hash: public_key_hash.into(),
            name: name.into(),
        }
    }

    pub fn public_key_hash(&self) -> &str {
        &self.public_key_hash
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Wallet session as derived by the background process. The front-end only
/// ever observes it; status and accounts are replaced together on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    status: Status,
    accounts: Vec<Account>,
}

impl SessionState {
    pub fn new(status: Status, accounts: Vec<Account>) -> Self {
        Self { status, accounts }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_idle(&self) -> bool {
        self.status == Status::Idle
    }

    pub fn is_locked(&self) -> bool {
        self.status == Status::Locked
    }

    pub fn is_ready(&self) -> bool {
        self.status == Status::Ready
    }

    /// A ready session always has at least one account.
    pub fn is_consistent(&self) -> bool {
        self.status != Status::Ready || !self.accounts.is_empty()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Mnemonic(String);

impl Mnemonic {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([REDACTED; {} words])", self.word_count())
    }
}

impl From<&str> for Mnemonic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Mnemonic {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Every tag that can cross the front-end/background boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    StateUpdated,
    GetStateRequest,
    GetStateResponse,
    NewWalletRequest,
    NewWalletResponse,
    UnlockRequest,
    UnlockResponse,
    LockRequest,
    LockResponse,
    CreateAccountRequest,
    CreateAccountResponse,
    RevealMnemonicRequest,
    RevealMnemonicResponse,
    EditAccountRequest,
    EditAccountResponse,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateUpdated => "StateUpdated",
            Self::GetStateRequest => "GetStateRequest",
            Self::GetStateResponse => "GetStateResponse",
            Self::NewWalletRequest => "NewWalletRequest",
            Self::NewWalletResponse => "NewWalletResponse",
            Self::UnlockRequest => "UnlockRequest",
            Self::UnlockResponse => "UnlockResponse",
            Self::LockRequest => "LockRequest",
            Self::LockResponse => "LockResponse",
            Self::CreateAccountRequest => "CreateAccountRequest",
            Self::CreateAccountResponse => "CreateAccountResponse",
            Self::RevealMnemonicRequest => "RevealMnemonicRequest",
            Self::RevealMnemonicResponse => "RevealMnemonicResponse",
            Self::EditAccountRequest => "EditAccountRequest",
            Self::EditAccountResponse => "EditAccountResponse",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "GetStateRequest")]
    GetState,
    #[serde(rename = "NewWalletRequest")]
    NewWallet {
        password: Password,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mnemonic: Option<Mnemonic>,
    },
    #[serde(rename = "UnlockRequest")]
    Unlock { password: Password },
    #[serde(rename = "LockRequest")]
    Lock,
    #[serde(rename = "CreateAccountRequest")]
    CreateAccount,
    #[serde(rename = "RevealMnemonicRequest")]
    RevealMnemonic { password: Password },
    #[serde(rename = "EditAccountRequest", rename_all = "camelCase")]
    EditAccount { account_index: usize, name: String },
}

impl Request {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::GetState => MessageType::GetStateRequest,
            Self::NewWallet { .. } => MessageType::NewWalletRequest,
            Self::Unlock { .. } => MessageType::UnlockRequest,
            Self::Lock => MessageType::LockRequest,
            Self::CreateAccount => MessageType::CreateAccountRequest,
            Self::RevealMnemonic { .. } => MessageType::RevealMnemonicRequest,
            Self::EditAccount { .. } => MessageType::EditAccountRequest,
        }
    }

    /// The only response tag the background may answer this request with.
    pub fn expected_response(&self) -> MessageType {
        match self {
            Self::GetState => MessageType::GetStateResponse,
            Self::NewWallet { .. } => MessageType::NewWalletResponse,
            Self::Unlock { .. } => MessageType::UnlockResponse,
            Self::Lock => MessageType::LockResponse,
            Self::CreateAccount => MessageType::CreateAccountResponse,
            Self::RevealMnemonic { .. } => MessageType::RevealMnemonicResponse,
            Self::EditAccount { .. } => MessageType::EditAccountResponse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    #[serde(rename = "GetStateResponse")]
    GetState { state: SessionState },
    #[serde(rename = "NewWalletResponse")]
    NewWallet,
    #[serde(rename = "UnlockResponse")]
    Unlock,
    #[serde(rename = "LockResponse")]
    Lock,
    #[serde(rename = "CreateAccountResponse")]
    CreateAccount,
    #[serde(rename = "RevealMnemonicResponse")]
    RevealMnemonic { mnemonic: Mnemonic },
    #[serde(rename = "EditAccountResponse")]
    EditAccount,
}

impl Response {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::GetState { .. } => MessageType::GetStateResponse,
            Self::NewWallet => MessageType::NewWalletResponse,
            Self::Unlock => MessageType::UnlockResponse,
            Self::Lock => MessageType::LockResponse,
            Self::CreateAccount => MessageType::CreateAccountResponse,
            Self::RevealMnemonic { .. } => MessageType::RevealMnemonicResponse,
            Self::EditAccount => MessageType::EditAccountResponse,
        }
    }
}

/// Unsolicited message pushed by the background to every listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    StateUpdated,
}

impl Notification {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::StateUpdated => MessageType::StateUpdated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = Request::EditAccount {
            account_index: 2,
            name: "Savings".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"type": "EditAccountRequest", "accountIndex": 2, "name": "Savings"})
        );

        let value = serde_json::to_value(Request::Lock).unwrap();
        assert_eq!(value, json!({"type": "LockRequest"}));
    }

    #[test]
    fn test_new_wallet_omits_missing_mnemonic() {
        let fresh = Request::NewWallet {
            password: "hunter22".into(),
            mnemonic: None,
        };
        let value = serde_json::to_value(&fresh).unwrap();
        assert_eq!(
            value,
            json!({"type": "NewWalletRequest", "password": "hunter22"})
        );
    }

    #[test]
    fn test_state_response_decodes() {
        let raw = json!({
            "type": "GetStateResponse",
            "state": {
                "status": "Ready",
                "accounts": [{"publicKeyHash": "tz1abc", "name": "Account 1"}]
            }
        });
        let response: Response = serde_json::from_value(raw).unwrap();
        let Response::GetState { state } = response else {
            panic!("expected state response");
        };
        assert!(state.is_ready());
        assert_eq!(state.accounts()[0].public_key_hash(), "tz1abc");
        assert_eq!(state.accounts()[0].name(), "Account 1");
    }

    #[test]
    fn test_every_request_pairs_with_its_response() {
        let requests = [
            Request::GetState,
            Request::NewWallet {
                password: "pw".into(),
                mnemonic: Some("a b c".into()),
            },
            Request::Unlock {
                password: "pw".into(),
            },
            Request::Lock,
            Request::CreateAccount,
            Request::RevealMnemonic {
                password: "pw".into(),
            },
            Request::EditAccount {
                account_index: 0,
                name: "x".into(),
            },
        ];
        for request in &requests {
            let req = request.message_type().as_str();
            let res = request.expected_response().as_str();
            assert_eq!(
                req.strip_suffix("Request"),
                res.strip_suffix("Response"),
                "{req} paired with {res}"
            );
        }
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let request = Request::NewWallet {
            password: "correct horse".into(),
            mnemonic: Some("abandon ability able".into()),
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("correct horse"));
        assert!(!rendered.contains("abandon"));
        assert!(rendered.contains("3 words"));
    }

    #[test]
    fn test_consistency_invariant() {
        assert!(!SessionState::new(Status::Ready, vec![]).is_consistent());
        assert!(SessionState::new(Status::Locked, vec![]).is_consistent());
        assert!(SessionState::new(Status::Idle, vec![]).is_consistent());
    }

    #[test]
    fn test_notification_wire_format() {
        let value = serde_json::to_value(Notification::StateUpdated).unwrap();
        assert_eq!(value, json!({"type": "StateUpdated"}));
    }
}
