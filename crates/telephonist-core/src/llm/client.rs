//! ChatCompletionClient trait definition.

use secrecy::SecretString;

use telephonist_types::error::LlmError;
use telephonist_types::message::Message;

/// Trait for chat-completion backends (Mistral, etc.).
///
/// Clients are stateless: the bearer credential is supplied per call and
/// never stored. Implementations live in telephonist-infra
/// (e.g., `MistralClient`).
pub trait ChatCompletionClient: Send + Sync {
    /// Human-readable provider name (e.g., "mistral").
    fn name(&self) -> &str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send the full message sequence and return the message of the last
    /// choice.
    ///
    /// `Ok(None)` is an empty reply: the provider returned no choices, or a
    /// choice with no role, no content and no prefix flag.
    fn complete(
        &self,
        credential: &SecretString,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<Option<Message>, LlmError>> + Send;
}
