// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Thanos Core - front-end side of the wallet session protocol
//!
//! - Typed request/response messages to the background process
//! - A validating message channel over a pluggable transport
//! - A shared session-state cache revalidated by background pushes
//! - Per-consumer account selection

pub mod account;
pub mod channel;
pub mod error;
pub mod front;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod protocol;
pub mod store;

pub use account::AccountSelector;
pub use channel::{MessageChannel, Transport};
pub use error::{Result, ThanosError};
pub use front::{FrontView, WalletFront};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockBackground;
pub use protocol::{
    Account, MessageType, Mnemonic, Notification, Password, Request, Response, SessionState,
    Status,
};
pub use store::{PushListener, SessionStore};
