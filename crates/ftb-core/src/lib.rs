//! Core domain + application logic for the Finance Tracker Bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! messaging port (trait) implemented in the adapter crate; persistence lives
//! behind the `AccountStore` port.

pub mod account;
pub mod amount;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod logging;
pub mod messaging;
pub mod store;

pub use errors::{Error, Result};
