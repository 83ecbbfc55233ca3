//! Live, in-memory conversation session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A live conversation for one user id.
///
/// Sessions only exist in the session registry; they are never persisted
/// directly. When a session is closed its conversational messages become a
/// [`crate::dialog::Dialog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub messages: Vec<Message>,
    pub started_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Start a session seeded with the persona directive as its only
    /// `system` message.
    pub fn new(user_id: impl Into<String>, system_directive: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            messages: vec![Message::system(system_directive)],
            started_at: now,
            last_active_at: now,
        }
    }

    /// Mark the session as active at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active_at = now;
    }

    /// Whether the session has been inactive for longer than `idle_timeout`.
    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        self.last_active_at + idle_timeout < now
    }
}
