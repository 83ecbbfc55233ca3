//! Dialog persistence abstractions.
//!
//! This module defines the `DialogStore` trait that the infrastructure
//! layer implements for finished-conversation storage.

pub mod store;
