//! Application state wiring the engine to its concrete collaborators.
//!
//! The engine is generic over the port traits; AppState pins it to the
//! infra implementations.

use std::sync::Arc;

use anyhow::Context;

use telephonist_core::engine::{ConversationEngine, EngineSettings};
use telephonist_core::session::registry::InMemorySessionRegistry;
use telephonist_infra::llm::mistral::MistralClient;
use telephonist_infra::sqlite::dialog::SqliteDialogStore;
use telephonist_infra::sqlite::pool::DatabasePool;
use telephonist_infra::translate::YandexTranslator;
use telephonist_types::config::TelephonistConfig;

/// Concrete engine type pinned to infra implementations.
pub type ConcreteEngine =
    ConversationEngine<MistralClient, YandexTranslator, SqliteDialogStore, InMemorySessionRegistry>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteEngine>,
    pub config: Arc<TelephonistConfig>,
}

impl AppState {
    /// Connect the database (if configured) and build the engine.
    ///
    /// Fails when the translator credentials are missing.
    pub async fn init(config: TelephonistConfig) -> anyhow::Result<Self> {
        let translator = YandexTranslator::from_config(&config.translator)
            .context("yandex cloud credentials are not provided (YA_TRANSLATE_KEY, YA_FOLDER_ID)")??;

        let store = match config.database.url.as_deref() {
            Some(url) => {
                let pool = DatabasePool::new(url)
                    .await
                    .with_context(|| format!("failed to open database {url}"))?;
                SqliteDialogStore::new(pool)
            }
            None => {
                tracing::warn!("No database configured, dialogs will not be stored");
                SqliteDialogStore::dry_run()
            }
        };

        let llm = MistralClient::from_config(&config.llm)?;

        Ok(Self::with_parts(llm, translator, store, config))
    }

    /// Assemble state from already constructed collaborators.
    pub fn with_parts(
        llm: MistralClient,
        translator: YandexTranslator,
        store: SqliteDialogStore,
        config: TelephonistConfig,
    ) -> Self {
        let settings = EngineSettings::from_config(&config.session, &config.persona);
        let engine = ConversationEngine::new(
            llm,
            translator,
            store,
            InMemorySessionRegistry::new(),
            settings,
        );

        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }
}
