//! YandexTranslator -- concrete [`Translator`] for Yandex Cloud Translate v2.
//!
//! One `POST /translate/v2/translate` per batch. The language pair and the
//! cloud folder are fixed at construction; the API key is held as a
//! [`SecretString`] and only exposed in the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use telephonist_core::translate::Translator;
use telephonist_types::config::TranslatorConfig;
use telephonist_types::error::TranslateError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    texts: &'a [String],
    source_language_code: &'a str,
    target_language_code: &'a str,
    folder_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    text: String,
    #[allow(dead_code)]
    #[serde(default)]
    detected_language_code: Option<String>,
}

/// Yandex Cloud batch translator.
pub struct YandexTranslator {
    client: reqwest::Client,
    api_key: SecretString,
    folder_id: String,
    base_url: String,
    source_language: String,
    target_language: String,
}

impl YandexTranslator {
    pub fn new(
        api_key: SecretString,
        folder_id: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            folder_id: folder_id.into(),
            base_url: "https://translate.api.cloud.yandex.net".to_string(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        })
    }

    /// Build a translator from the `[translator]` section.
    ///
    /// Returns `None` when the API key or folder id is missing.
    pub fn from_config(config: &TranslatorConfig) -> Option<Result<Self, TranslateError>> {
        let api_key = config.api_key.clone().filter(|k| !k.is_empty())?;
        let folder_id = config.folder_id.clone().filter(|f| !f.is_empty())?;

        Some(
            Self::new(
                SecretString::from(api_key),
                folder_id,
                config.source_language.clone(),
                config.target_language.clone(),
                Duration::from_secs(config.timeout_secs),
            )
            .map(|t| t.with_base_url(config.base_url.clone())),
        )
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/translate/v2/translate", self.base_url)
    }

    fn to_request<'a>(&'a self, texts: &'a [String]) -> TranslateRequest<'a> {
        TranslateRequest {
            texts,
            source_language_code: &self.source_language,
            target_language_code: &self.target_language,
            folder_id: &self.folder_id,
        }
    }
}

impl Translator for YandexTranslator {
    async fn translate(&self, texts: &[String]) -> Result<Vec<String>, TranslateError> {
        if texts.is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let response = self
            .client
            .post(self.url())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Api-Key {}", self.api_key.expose_secret()),
            )
            .json(&self.to_request(texts))
            .send()
            .await
            .map_err(|e| TranslateError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Translator rejected request");
            return Err(TranslateError::Status(status.as_u16()));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Deserialization(e.to_string()))?;

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}
