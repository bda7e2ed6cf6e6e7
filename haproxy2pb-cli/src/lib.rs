//! haproxy2pb CLI library.
//!
//! Exposes the command handlers for integration testing.
//! In production, `haproxy2pb` is used as a binary (main.rs).

pub mod cli;
pub mod commands;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod records;
