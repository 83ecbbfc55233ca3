//! Mistral chat-completions client.
//!
//! This module provides the [`MistralClient`] which implements the
//! [`ChatCompletionClient`](telephonist_core::llm::client::ChatCompletionClient)
//! trait for the Mistral `/v1/chat/completions` endpoint, including the
//! assistant `prefix` flag used for persona priming.

pub mod client;
pub mod types;

pub use client::MistralClient;
