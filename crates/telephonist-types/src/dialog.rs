//! Persisted, closed form of a conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::message::{Message, conversational};
use crate::session::Session;

/// Minimum number of user/assistant messages a dialog must hold to be stored.
pub const MIN_DIALOG_MESSAGES: usize = 2;

/// A finished conversation as stored by the dialog store.
///
/// `id` is `None` until the store has generated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub id: Option<String>,
    #[serde(skip)]
    pub user_id: String,
    pub messages: Vec<Message>,
    pub start_time: DateTime<Utc>,
    pub duration_s: i64,
}

impl Dialog {
    /// Close a session into a dialog.
    ///
    /// Keeps only the user/assistant exchange. Returns `None` when fewer than
    /// [`MIN_DIALOG_MESSAGES`] messages remain.
    pub fn from_session(session: Session, now: DateTime<Utc>) -> Option<Self> {
        let messages = conversational(&session.messages);
        if messages.len() < MIN_DIALOG_MESSAGES {
            return None;
        }

        Some(Self {
            id: None,
            user_id: session.user_id,
            messages,
            start_time: session.started_at,
            duration_s: (now - session.started_at).num_seconds(),
        })
    }

    /// Message contents in transcript order, the batch sent for translation.
    pub fn contents(&self) -> Vec<String> {
        self.messages.iter().map(|m| m.content.clone()).collect()
    }

    /// Attach translations index-by-index.
    ///
    /// The batch must match the transcript one-to-one; on a length mismatch
    /// nothing is assigned.
    pub fn apply_translations(&mut self, translations: Vec<String>) -> Result<(), TranslateError> {
        if translations.len() != self.messages.len() {
            return Err(TranslateError::LengthMismatch {
                expected: self.messages.len(),
                actual: translations.len(),
            });
        }

        for (message, translation) in self.messages.iter_mut().zip(translations) {
            message.translation = Some(translation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_with_exchange() -> Session {
        let mut session = Session::new("7", "persona");
        session.messages.push(Message::user("Hallo"));
        session.messages.push(Message::assistant("Hallo! Wie geht's?"));
        session
    }

    #[test]
    fn test_from_session_strips_system_message() {
        let session = session_with_exchange();
        let started = session.started_at;
        let dialog = Dialog::from_session(session, started + Duration::seconds(95)).unwrap();

        assert!(dialog.id.is_none());
        assert_eq!(dialog.user_id, "7");
        assert_eq!(dialog.messages.len(), 2);
        assert_eq!(dialog.duration_s, 95);
        assert_eq!(dialog.start_time, started);
    }

    #[test]
    fn test_from_session_requires_an_exchange() {
        let session = Session::new("7", "persona");
        assert!(Dialog::from_session(session, Utc::now()).is_none());

        let mut session = Session::new("7", "persona");
        session.messages.push(Message::user("Hallo"));
        assert!(Dialog::from_session(session, Utc::now()).is_none());
    }

    #[test]
    fn test_apply_translations() {
        let mut dialog = Dialog::from_session(session_with_exchange(), Utc::now()).unwrap();
        assert_eq!(dialog.contents(), vec!["Hallo", "Hallo! Wie geht's?"]);

        dialog
            .apply_translations(vec!["Привет".into(), "Привет! Как дела?".into()])
            .unwrap();
        assert_eq!(dialog.messages[0].translation.as_deref(), Some("Привет"));
        assert_eq!(dialog.messages[1].translation.as_deref(), Some("Привет! Как дела?"));
    }

    #[test]
    fn test_apply_translations_length_mismatch_assigns_nothing() {
        let mut dialog = Dialog::from_session(session_with_exchange(), Utc::now()).unwrap();

        let err = dialog.apply_translations(vec!["Привет".into()]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::LengthMismatch { expected: 2, actual: 1 }
        ));
        assert!(dialog.messages.iter().all(|m| m.translation.is_none()));
    }
}
