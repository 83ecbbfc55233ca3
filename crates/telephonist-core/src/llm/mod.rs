//! LLM chat-completion abstractions.
//!
//! - `ChatCompletionClient`: RPITIT trait for concrete provider clients
//! - `priming`: persona primer injection and reply prefix stripping

pub mod client;
pub mod priming;
