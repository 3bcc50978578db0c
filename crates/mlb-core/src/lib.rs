//! Core domain + application logic for the mclo.gs upload bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the mclo.gs HTTP API live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod fetch;
pub mod filter;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod paste;
pub mod pipeline;
pub mod ports;
pub mod reply;

pub use errors::{Error, Result};
