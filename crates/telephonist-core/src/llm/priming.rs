//! Persona priming protocol.
//!
//! Every outbound request ends with a throwaway assistant message carrying a
//! fixed fragment. The provider continues from it and echoes it verbatim at
//! the start of its reply, so exactly `fragment.len()` bytes are cut from the
//! reply before it is stored or returned. This is positional, not a pattern
//! match: a provider that does not echo the fragment gets its reply cut at
//! the wrong place.

use telephonist_types::error::LlmError;
use telephonist_types::message::{Message, Role};

/// The outbound message sequence: the transcript followed by the primer.
pub fn primed_request(messages: &[Message], fragment: &str) -> Vec<Message> {
    let mut request = Vec::with_capacity(messages.len() + 1);
    request.extend_from_slice(messages);
    request.push(Message::primer(fragment));
    request
}

/// Remove the echoed primer from a reply and trim surrounding whitespace.
///
/// Only non-empty assistant replies are cut. A reply shorter than the
/// fragment, or one where the cut would split a UTF-8 character, yields
/// [`LlmError::PrimerMismatch`].
pub fn strip_primer(mut message: Message, fragment: &str) -> Result<Message, LlmError> {
    message.is_primer = false;
    if message.role != Role::Assistant || message.content.is_empty() {
        return Ok(message);
    }

    let rest = message
        .content
        .get(fragment.len()..)
        .ok_or(LlmError::PrimerMismatch {
            primer_len: fragment.len(),
            reply_len: message.content.len(),
        })?;
    message.content = rest.trim().to_string();
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use telephonist_types::config::DEFAULT_PRIMER_FRAGMENT;

    #[test]
    fn test_primed_request_appends_primer() {
        let transcript = vec![Message::system("persona"), Message::user("Hallo")];
        let request = primed_request(&transcript, "ANSWER:");

        assert_eq!(request.len(), 3);
        assert_eq!(request[..2], transcript[..]);
        let primer = request.last().unwrap();
        assert!(primer.is_primer);
        assert_eq!(primer.role, Role::Assistant);
        assert_eq!(primer.content, "ANSWER:");
    }

    #[test]
    fn test_strip_primer_removes_fragment_and_trims() {
        let mut reply = Message::assistant(format!("{DEFAULT_PRIMER_FRAGMENT}Hallo!"));
        reply.is_primer = true;

        let stripped = strip_primer(reply, DEFAULT_PRIMER_FRAGMENT).unwrap();
        assert_eq!(stripped.content, "Hallo!");
        assert!(!stripped.is_primer);
    }

    #[test]
    fn test_strip_primer_is_positional() {
        // The fragment is not echoed: the first len(fragment) bytes go anyway.
        let reply = Message::assistant("XXXXXXX  Guten Morgen ");
        let stripped = strip_primer(reply, "ANSWER:").unwrap();
        assert_eq!(stripped.content, "Guten Morgen");
    }

    #[test]
    fn test_strip_primer_leaves_non_assistant_and_empty_replies() {
        let user = strip_primer(Message::user("ANSWER: hi"), "ANSWER:").unwrap();
        assert_eq!(user.content, "ANSWER: hi");

        let empty = strip_primer(Message::assistant(""), "ANSWER:").unwrap();
        assert_eq!(empty.content, "");
    }

    #[test]
    fn test_strip_primer_short_reply_is_mismatch() {
        let err = strip_primer(Message::assistant("Ja"), "ANSWER:").unwrap_err();
        assert!(matches!(
            err,
            LlmError::PrimerMismatch {
                primer_len: 7,
                reply_len: 2
            }
        ));
    }

    #[test]
    fn test_strip_primer_mid_character_cut_is_mismatch() {
        // "ü" is two bytes; a 2-byte fragment would cut it in half.
        let err = strip_primer(Message::assistant("aüb"), "ab").unwrap_err();
        assert!(matches!(err, LlmError::PrimerMismatch { .. }));
    }
}
