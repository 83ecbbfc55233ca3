//! Conversation engine and collaborator trait definitions for Telephonist.
//!
//! This crate defines the "ports" (LLM client, translator, dialog store,
//! session registry) that the infrastructure layer implements, and the
//! engine that orchestrates them. It depends only on `telephonist-types` --
//! never on `telephonist-infra` or any HTTP/database crate.

pub mod dialog;
pub mod engine;
pub mod llm;
pub mod session;
pub mod sweep;
pub mod translate;
