//! Configuration types for Telephonist.
//!
//! `TelephonistConfig` represents the top-level `config.toml`. Every field
//! has a default so an empty or missing file yields a usable (dry-run)
//! configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persona directive injected once as the session's system message.
pub const DEFAULT_SYSTEM_DIRECTIVE: &str = "
	You are a language learning assistant. You help users to practice conversating skills in German.
	You can speak in German and only German. If you get a message not in German, you politely ask user to repeat their line in German.
	You use simple vocabulary unless the user asks you not to.
	You act friendly and interested in user's speach.
	You are politeful and gentle. You refuse to swear in bad words and tell hateful sentences.
";

/// Priming fragment the provider echoes at the start of every reply.
pub const DEFAULT_PRIMER_FRAGMENT: &str = "
	I am a language learning assitant. I help users to practice conversating skills in German.
	I can speak German and only German, I refuse to speak in any other language.

	ANSWER:
";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelephonistConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

/// Dialog persistence. With no `url` the dialog store runs in dry-run mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Generation latency dominates, so this is longer than other timeouts.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String {
    "https://api.mistral.ai".to_string()
}

fn default_llm_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    20
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Batch translator settings.
///
/// Debug output redacts `api_key`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_translator_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_translator_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_translator_base_url() -> String {
    "https://translate.api.cloud.yandex.net".to_string()
}

fn default_source_language() -> String {
    "de".to_string()
}

fn default_target_language() -> String {
    "ru".to_string()
}

fn default_translator_timeout_secs() -> u64 {
    30
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_translator_base_url(),
            folder_id: None,
            api_key: None,
            source_language: default_source_language(),
            target_language: default_target_language(),
            timeout_secs: default_translator_timeout_secs(),
        }
    }
}

impl fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("base_url", &self.base_url)
            .field("folder_id", &self.folder_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// How concurrent `talk` calls for the same user id interact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPolicy {
    /// Load and store are individually atomic; the last store wins and a
    /// concurrently appended turn can be lost.
    #[default]
    LastWriterWins,
    /// A per-user lock is held across the whole round trip. Hangup waits
    /// for it and the idle sweep skips users whose turn is in flight.
    Serialized,
}

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default)]
    pub turn_policy: TurnPolicy,
    /// Upper bound on concurrently running translation tasks.
    #[serde(default = "default_max_translation_tasks")]
    pub max_translation_tasks: usize,
    /// How long shutdown waits for translation tasks. `None` drops them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain_timeout_secs: Option<u64>,
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_max_translation_tasks() -> usize {
    4
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            turn_policy: TurnPolicy::default(),
            max_translation_tasks: default_max_translation_tasks(),
            drain_timeout_secs: None,
        }
    }
}

/// Persona directive and priming fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_system_directive")]
    pub system_directive: String,
    #[serde(default = "default_primer_fragment")]
    pub primer_fragment: String,
}

fn default_system_directive() -> String {
    DEFAULT_SYSTEM_DIRECTIVE.to_string()
}

fn default_primer_fragment() -> String {
    DEFAULT_PRIMER_FRAGMENT.to_string()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            system_directive: default_system_directive(),
            primer_fragment: default_primer_fragment(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = TelephonistConfig::default();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert!(config.database.url.is_none());
        assert_eq!(config.llm.model, "mistral-small-latest");
        assert_eq!(config.llm.timeout_secs, 20);
        assert_eq!(config.translator.source_language, "de");
        assert_eq!(config.translator.target_language, "ru");
        assert_eq!(config.session.idle_timeout_secs, 600);
        assert_eq!(config.session.sweep_interval_secs, 60);
        assert_eq!(config.session.turn_policy, TurnPolicy::LastWriterWins);
        assert!(config.persona.primer_fragment.ends_with("ANSWER:\n"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
[database]
url = "sqlite://dialogs.db"

[session]
idle_timeout_secs = 120
turn_policy = "serialized"
"#;
        let config: TelephonistConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("sqlite://dialogs.db"));
        assert_eq!(config.session.idle_timeout_secs, 120);
        assert_eq!(config.session.sweep_interval_secs, 60);
        assert_eq!(config.session.turn_policy, TurnPolicy::Serialized);
        assert_eq!(config.server.addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_translator_debug_redacts_key() {
        let config = TranslatorConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
