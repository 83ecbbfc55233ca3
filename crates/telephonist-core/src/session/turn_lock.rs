//! Per-user turn locks for `TurnPolicy::Serialized`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per user id, created on first use and dropped again
/// once the last guard for it goes away.
#[derive(Debug, Default)]
pub struct TurnLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Exclusive access to one user's session.
///
/// Dropping the guard unlocks and removes the map entry unless another
/// caller is already waiting on it, including when the holding future is
/// cancelled.
#[derive(Debug)]
pub struct TurnGuard<'a> {
    locks: &'a TurnLocks,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.release(&self.user_id);
    }
}

impl TurnLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        // The map guard is released at the end of this statement, before any await.
        self.locks.entry(user_id.to_string()).or_default().value().clone()
    }

    /// Wait for exclusive access to `user_id`'s session.
    pub async fn acquire(&self, user_id: &str) -> TurnGuard<'_> {
        let guard = self.lock_for(user_id).lock_owned().await;
        TurnGuard {
            locks: self,
            user_id: user_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Take `user_id`'s lock only if nobody currently holds it.
    pub fn try_acquire(&self, user_id: &str) -> Option<TurnGuard<'_>> {
        let guard = self.lock_for(user_id).try_lock_owned().ok()?;
        Some(TurnGuard {
            locks: self,
            user_id: user_id.to_string(),
            guard: Some(guard),
        })
    }

    /// Drop the lock entry for `user_id` if nobody holds or waits on it.
    fn release(&self, user_id: &str) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
