//! Route handlers.

pub mod ping;
pub mod talk;
