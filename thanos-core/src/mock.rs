// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! In-process stand-in for the background process.
//!
//! Answers the message protocol from an in-memory vault and pushes
//! `StateUpdated` after every change, the way the real background does.
//! Test hooks can hold `GetStateRequest` replies back, inject raw replies and
//! count state fetches. Built only for tests or with the `test-utils`
//! feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::channel::Transport;
use crate::error::{Result, ThanosError};
use crate::protocol::{
    Account, Mnemonic, Notification, Password, Request, Response, SessionState, Status,
};

pub const DEFAULT_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

const PUSH_CAPACITY: usize = 64;

#[derive(Default)]
struct Vault {
    password: Option<Password>,
    mnemonic: Option<Mnemonic>,
    unlocked: bool,
    accounts: Vec<Account>,
}

impl Vault {
    fn state(&self) -> SessionState {
        match (&self.password, self.unlocked) {
            (None, _) => SessionState::new(Status::Idle, Vec::new()),
            (Some(_), false) => SessionState::new(Status::Locked, Vec::new()),
            (Some(_), true) => SessionState::new(Status::Ready, self.accounts.clone()),
        }
    }

    fn check_password(&self, password: &Password) -> Result<()> {
        match &self.password {
            None => Err(ThanosError::Transport("Wallet not found".into())),
            Some(stored) if stored == password => Ok(()),
            Some(_) => Err(ThanosError::Transport("Invalid password".into())),
        }
    }

    fn require_unlocked(&self) -> Result<()> {
        if self.unlocked {
            Ok(())
        } else {
            Err(ThanosError::Transport("Wallet locked".into()))
        }
    }

    fn push_account(&mut self) {
        let n = self.accounts.len() + 1;
        self.accounts
            .push(Account::new(format!("tz1{n:033}"), format!("Account {n}")));
    }
}

pub struct MockBackground {
    vault: Mutex<Vault>,
    pushes: broadcast::Sender<Notification>,
    gate: watch::Sender<bool>,
    scripted: Mutex<VecDeque<Value>>,
    state_requests: AtomicUsize,
}

impl Default for MockBackground {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackground {
    pub fn new() -> Self {
        let (pushes, _) = broadcast::channel(PUSH_CAPACITY);
        let (gate, _) = watch::channel(true);
        Self {
            vault: Mutex::new(Vault::default()),
            pushes,
            gate,
            scripted: Mutex::new(VecDeque::new()),
            state_requests: AtomicUsize::new(0),
        }
    }

    /// A background with an unlocked wallet holding `accounts` accounts.
    pub fn with_unlocked_wallet(password: &str, accounts: usize) -> Self {
        let mock = Self::new();
        {
            let mut vault = mock.vault.lock();
            vault.password = Some(Password::new(password));
            vault.mnemonic = Some(Mnemonic::new(DEFAULT_MNEMONIC));
            vault.unlocked = true;
            for _ in 0..accounts.max(1) {
                vault.push_account();
            }
        }
        mock
    }

    pub fn process_request(&self, request: &Request) -> Result<Response> {
        let mut vault = self.vault.lock();
        let (response, changed) = match request {
            Request::GetState => (
                Response::GetState {
                    state: vault.state(),
                },
                false,
            ),
            Request::NewWallet { password, mnemonic } => {
                vault.password = Some(password.clone());
                vault.mnemonic = Some(
                    mnemonic
                        .clone()
                        .unwrap_or_else(|| Mnemonic::new(DEFAULT_MNEMONIC)),
                );
                vault.unlocked = true;
                vault.accounts.clear();
                vault.push_account();
                (Response::NewWallet, true)
            }
            Request::Unlock { password } => {
                vault.check_password(password)?;
                vault.unlocked = true;
                (Response::Unlock, true)
            }
            Request::Lock => {
                vault.unlocked = false;
                (Response::Lock, true)
            }
            Request::CreateAccount => {
                vault.require_unlocked()?;
                vault.push_account();
                (Response::CreateAccount, true)
            }
            Request::RevealMnemonic { password } => {
                vault.check_password(password)?;
                let mnemonic = vault
                    .mnemonic
                    .clone()
                    .ok_or_else(|| ThanosError::Transport("Wallet not found".into()))?;
                (Response::RevealMnemonic { mnemonic }, false)
            }
            Request::EditAccount {
                account_index,
                name,
            } => {
                vault.require_unlocked()?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(ThanosError::Transport("Invalid name".into()));
                }
                let account = vault
                    .accounts
                    .get_mut(*account_index)
                    .ok_or_else(|| ThanosError::Transport("Account not found".into()))?;
                let renamed = Account::new(account.public_key_hash(), name);
                *account = renamed;
                (Response::EditAccount, true)
            }
        };
        drop(vault);

        if changed {
            self.notify_state_updated();
        }
        Ok(response)
    }

    pub fn notify_state_updated(&self) {
        debug!("Mock background pushing StateUpdated");
        let _ = self.pushes.send(Notification::StateUpdated);
    }

    /// Removes accounts past `len` without pushing, as another front-end
    /// context acting on the wallet would.
    pub fn truncate_accounts(&self, len: usize) {
        self.vault.lock().accounts.truncate(len.max(1));
    }

    /// Replies to the next request with `raw` instead of processing it.
    pub fn script_reply(&self, raw: Value) {
        self.scripted.lock().push_back(raw);
    }

    /// Parks every `GetStateRequest` until [`Self::release_state_requests`].
    pub fn hold_state_requests(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_state_requests(&self) {
        self.gate.send_replace(true);
    }

    pub fn state_requests(&self) -> usize {
        self.state_requests.load(Ordering::SeqCst)
    }
}

impl Transport for MockBackground {
    async fn send(&self, request: &Request) -> Result<Value> {
        if matches!(request, Request::GetState) {
            self.state_requests.fetch_add(1, Ordering::SeqCst);
            let mut gate = self.gate.subscribe();
            let opened = gate.wait_for(|open| *open).await.is_ok();
            if !opened {
                return Err(ThanosError::Transport("Background stopped".into()));
            }
        }

        let scripted = self.scripted.lock().pop_front();
        if let Some(raw) = scripted {
            return Ok(raw);
        }

        let response = self.process_request(request)?;
        Ok(serde_json::to_value(response)?)
    }

    fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.pushes.subscribe()
    }
}
