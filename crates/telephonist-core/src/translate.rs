//! Translator trait definition.

use telephonist_types::error::TranslateError;

/// Stateless batch text translator with a language pair fixed at
/// construction.
///
/// Implementations live in telephonist-infra (e.g., `YandexTranslator`).
pub trait Translator: Send + Sync {
    /// Translate `texts` in one request.
    ///
    /// The result has the same length and order as the input. An empty
    /// batch is a caller error ([`TranslateError::EmptyInput`]).
    fn translate(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<String>, TranslateError>> + Send;
}
