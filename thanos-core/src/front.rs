// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::sync::Arc;

use crate::account::AccountSelector;
use crate::channel::Transport;
use crate::error::Result;
use crate::protocol::{Account, Mnemonic, Password, SessionState, Status};
use crate::store::SessionStore;

/// What one consumer renders from: the shared snapshot plus its own
/// selection, already bounds-checked.
#[derive(Debug, Clone)]
pub struct FrontView {
    pub state: Arc<SessionState>,
    pub account_index: usize,
    pub account: Option<Account>,
}

impl FrontView {
    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn idle(&self) -> bool {
        self.state.is_idle()
    }

    pub fn locked(&self) -> bool {
        self.state.is_locked()
    }

    pub fn ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn accounts(&self) -> &[Account] {
        self.state.accounts()
    }
}

/// Per-consumer handle over a shared [`SessionStore`].
pub struct WalletFront<T> {
    store: SessionStore<T>,
    selector: AccountSelector,
}

impl<T: Transport> WalletFront<T> {
    pub fn new(store: SessionStore<T>) -> Self {
        Self {
            store,
            selector: AccountSelector::new(),
        }
    }

    pub fn store(&self) -> &SessionStore<T> {
        &self.store
    }

    pub fn account_index(&self) -> usize {
        self.selector.index()
    }

    pub fn select_account(&mut self, index: usize) {
        self.selector.select(index);
    }

    pub async fn view(&mut self) -> Result<FrontView> {
        let state = self.store.get_state().await?;
        let account_index = self.selector.observe(state.accounts());
        let account = self.selector.account(state.accounts()).cloned();
        Ok(FrontView {
            state,
            account_index,
            account,
        })
    }

    pub async fn register_wallet(
        &self,
        password: impl Into<Password>,
        mnemonic: Option<Mnemonic>,
    ) -> Result<()> {
        self.store.register_wallet(password, mnemonic).await
    }

    pub async fn unlock(&self, password: impl Into<Password>) -> Result<()> {
        self.store.unlock(password).await
    }

    pub async fn lock(&self) -> Result<()> {
        self.store.lock().await
    }

    pub async fn create_account(&self) -> Result<()> {
        self.store.create_account().await
    }

    pub async fn reveal_mnemonic(&self, password: impl Into<Password>) -> Result<Mnemonic> {
        self.store.reveal_mnemonic(password).await
    }

    /// Renames the currently selected account.
    pub async fn edit_account_name(&self, name: impl Into<String>) -> Result<()> {
        self.store
            .edit_account_name(self.selector.index(), name)
            .await
    }
}
