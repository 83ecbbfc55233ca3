//! Live session storage.
//!
//! - `SessionRegistry`: the load/store/remove/iterate contract
//! - `InMemorySessionRegistry`: `DashMap`-backed default implementation
//! - `TurnLocks`: per-user mutual exclusion for the serialized turn policy

pub mod registry;
pub mod turn_lock;
