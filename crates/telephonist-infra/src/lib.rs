//! Infrastructure layer for Telephonist.
//!
//! Contains implementations of the port traits defined in `telephonist-core`:
//! the Mistral chat-completion client, the Yandex Cloud translator, SQLite
//! dialog storage, and the TOML configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
pub mod translate;
