//! Chat-completion client implementations.
//!
//! Contains the concrete [`ChatCompletionClient`] used by the engine,
//! built from the `[llm]` configuration section.
//!
//! [`ChatCompletionClient`]: telephonist_core::llm::client::ChatCompletionClient

pub mod mistral;
