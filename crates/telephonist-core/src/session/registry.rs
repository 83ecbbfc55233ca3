//! Session registry: at most one live session per user id.
//!
//! Every operation is individually atomic, but there is no lock spanning
//! several calls. A `talk` round trip is "load a snapshot, compute, store a
//! new snapshot", so two concurrent turns for the same user id race and the
//! later store silently replaces the earlier one. Callers that need more
//! use `TurnPolicy::Serialized` on the engine.

use std::sync::Arc;

use dashmap::DashMap;

use telephonist_types::session::Session;

/// Concurrency-safe store for live sessions keyed by user id.
pub trait SessionRegistry: Send + Sync {
    /// Cloned snapshot of the session for `user_id`, if any.
    fn load(&self, user_id: &str) -> Option<Session>;

    /// Insert or replace the session for `user_id`, returning the replaced
    /// value.
    fn store(&self, user_id: &str, session: Session) -> Option<Session>;

    /// Remove and return the session for `user_id`.
    fn load_and_remove(&self, user_id: &str) -> Option<Session>;

    /// Remove the session for `user_id` only if `predicate` holds for its
    /// current value. The check and the removal are one atomic step.
    fn remove_if(&self, user_id: &str, predicate: &dyn Fn(&Session) -> bool) -> Option<Session>;

    /// Visit every live session. Order is unspecified.
    ///
    /// `visit` must not call back into the registry.
    fn for_each(&self, visit: &mut dyn FnMut(&str, &Session));

    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process registry backed by `DashMap`.
///
/// Cloning produces a shared view of the same underlying map. Reads return
/// cloned sessions so no `DashMap` guard outlives a call.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRegistry {
    inner: Arc<DashMap<String, Session>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn load(&self, user_id: &str) -> Option<Session> {
        self.inner.get(user_id).map(|r| r.value().clone())
    }

    fn store(&self, user_id: &str, session: Session) -> Option<Session> {
        self.inner.insert(user_id.to_string(), session)
    }

    fn load_and_remove(&self, user_id: &str) -> Option<Session> {
        self.inner.remove(user_id).map(|(_, session)| session)
    }

    fn remove_if(&self, user_id: &str, predicate: &dyn Fn(&Session) -> bool) -> Option<Session> {
        self.inner
            .remove_if(user_id, |_, session| predicate(session))
            .map(|(_, session)| session)
    }

    fn for_each(&self, visit: &mut dyn FnMut(&str, &Session)) {
        for entry in self.inner.iter() {
            visit(entry.key(), entry.value());
        }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telephonist_types::message::Message;

    #[test]
    fn load_missing_returns_none() {
        let registry = InMemorySessionRegistry::new();
        assert!(registry.load("nobody").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn store_replaces_and_returns_previous() {
        let registry = InMemorySessionRegistry::new();
        assert!(registry.store("1", Session::new("1", "first")).is_none());

        let previous = registry.store("1", Session::new("1", "second")).unwrap();
        assert_eq!(previous.messages[0].content, "first");
        assert_eq!(registry.load("1").unwrap().messages[0].content, "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn load_returns_a_snapshot() {
        let registry = InMemorySessionRegistry::new();
        registry.store("1", Session::new("1", "persona"));

        let mut snapshot = registry.load("1").unwrap();
        snapshot.messages.push(Message::user("Hallo"));

        assert_eq!(registry.load("1").unwrap().messages.len(), 1);
    }

    #[test]
    fn load_and_remove_is_one_shot() {
        let registry = InMemorySessionRegistry::new();
        registry.store("1", Session::new("1", "persona"));

        assert!(registry.load_and_remove("1").is_some());
        assert!(registry.load_and_remove("1").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_if_respects_predicate() {
        let registry = InMemorySessionRegistry::new();
        registry.store("1", Session::new("1", "persona"));

        assert!(registry.remove_if("1", &|_| false).is_none());
        assert_eq!(registry.len(), 1);

        assert!(registry.remove_if("1", &|s| s.user_id == "1").is_some());
        assert!(registry.is_empty());
        assert!(registry.remove_if("1", &|_| true).is_none());
    }

    #[test]
    fn for_each_visits_every_session() {
        let registry = InMemorySessionRegistry::new();
        for id in ["a", "b", "c"] {
            registry.store(id, Session::new(id, "persona"));
        }

        let mut seen = Vec::new();
        registry.for_each(&mut |user_id, session| {
            assert_eq!(user_id, session.user_id);
            seen.push(user_id.to_string());
        });
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn clones_share_state() {
        let registry = InMemorySessionRegistry::new();
        let view = registry.clone();
        registry.store("1", Session::new("1", "persona"));
        assert!(view.load("1").is_some());
    }
}
