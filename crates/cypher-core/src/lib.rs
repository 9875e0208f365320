//! Core routing and risk-aggregation engine for the AgentCypher bot.
//!
//! This crate is framework-agnostic. Telegram, the completion model and the
//! reputation/verification HTTP services live behind ports (traits)
//! implemented in adapter crates.

pub mod actions;
pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;
pub mod known_scams;
pub mod logging;
pub mod memory;
pub mod messaging;
pub mod ports;
pub mod risk;
pub mod session;

pub use errors::{Error, Result};
