//! Shared domain types for Telephonist.
//!
//! This crate contains the core domain types used across the relay:
//! Message, Session, Dialog, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod dialog;
pub mod error;
pub mod message;
pub mod session;
