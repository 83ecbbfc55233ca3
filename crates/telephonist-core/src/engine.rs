//! Conversation engine: the `talk` / `stop` / `clean_up` orchestrator.
//!
//! ConversationEngine coordinates the session registry with the three leaf
//! collaborators: a turn goes registry -> LLM client -> registry, a hangup
//! goes registry -> dialog store, followed by a detached translate-then-update
//! task on a small bounded pool the engine tracks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, error, info, info_span, warn};

use telephonist_types::config::{PersonaConfig, SessionConfig, TurnPolicy};
use telephonist_types::dialog::Dialog;
use telephonist_types::error::StoreError;
use telephonist_types::message::Message;
use telephonist_types::session::Session;

use crate::dialog::store::DialogStore;
use crate::llm::client::ChatCompletionClient;
use crate::llm::priming::{primed_request, strip_primer};
use crate::session::registry::{InMemorySessionRegistry, SessionRegistry};
use crate::session::turn_lock::{TurnGuard, TurnLocks};
use crate::sweep::Sweep;
use crate::translate::Translator;

/// Tunables for the engine, resolved from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Seed `system` message of every new session.
    pub system_directive: String,
    /// Content of the primer appended to every outbound request.
    pub primer_fragment: String,
    /// Sessions inactive for longer than this are closed by `clean_up`.
    pub idle_timeout: chrono::Duration,
    pub turn_policy: TurnPolicy,
    pub max_translation_tasks: usize,
}

impl EngineSettings {
    pub fn from_config(session: &SessionConfig, persona: &PersonaConfig) -> Self {
        Self {
            system_directive: persona.system_directive.clone(),
            primer_fragment: persona.primer_fragment.clone(),
            idle_timeout: chrono::Duration::seconds(session.idle_timeout_secs as i64),
            turn_policy: session.turn_policy,
            max_translation_tasks: session.max_translation_tasks.max(1),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default(), &PersonaConfig::default())
    }
}

/// Orchestrates live sessions and their archival.
///
/// Generic over the collaborator traits so the core never depends on
/// telephonist-infra. The translator and store are shared with background
/// translation tasks and therefore held behind `Arc`.
pub struct ConversationEngine<L, T, D, R = InMemorySessionRegistry> {
    llm: L,
    translator: Arc<T>,
    store: Arc<D>,
    registry: R,
    settings: EngineSettings,
    turn_locks: TurnLocks,
    translations: TaskTracker,
    translation_permits: Arc<Semaphore>,
}

impl<L, T, D, R> ConversationEngine<L, T, D, R>
where
    L: ChatCompletionClient,
    T: Translator + 'static,
    D: DialogStore + 'static,
    R: SessionRegistry,
{
    pub fn new(llm: L, translator: T, store: D, registry: R, settings: EngineSettings) -> Self {
        let permits = settings.max_translation_tasks.max(1);
        Self {
            llm,
            translator: Arc::new(translator),
            store: Arc::new(store),
            registry,
            settings,
            turn_locks: TurnLocks::new(),
            translations: TaskTracker::new(),
            translation_permits: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Access the session registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    // --- Turns ---

    /// Run one conversational turn for `user_id` and return the reply.
    ///
    /// Creates the session on first use. Any provider failure, an empty reply
    /// or a reply that cannot carry the primer yields `""` and leaves the
    /// registry untouched, so the caller can simply resubmit.
    ///
    /// Under `TurnPolicy::LastWriterWins` concurrent turns for the same user
    /// id race and the later store discards the other's turn. Under
    /// `TurnPolicy::Serialized` turns, `stop` and the idle sweep for one user
    /// id exclude each other.
    pub async fn talk(&self, user_id: &str, credential: &SecretString, input: &str) -> String {
        let _turn = self.begin_turn(user_id).await;
        self.run_turn(user_id, credential, input).await
    }

    async fn run_turn(&self, user_id: &str, credential: &SecretString, input: &str) -> String {
        let mut session = match self.registry.load(user_id) {
            Some(session) => {
                debug!(user_id, messages = session.messages.len(), "Continuing session");
                session
            }
            None => {
                info!(user_id, "Starting new session");
                Session::new(user_id, self.settings.system_directive.as_str())
            }
        };
        session.messages.push(Message::user(input));

        let request = primed_request(&session.messages, &self.settings.primer_fragment);
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.llm.name(),
            gen_ai.request.model = self.llm.model(),
            user_id,
        );

        let reply = match self.llm.complete(credential, &request).instrument(span).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                warn!(user_id, "Empty answer from chat provider");
                return String::new();
            }
            Err(e) => {
                error!(user_id, error = %e, "Chat completion failed");
                return String::new();
            }
        };

        let reply = match strip_primer(reply, &self.settings.primer_fragment) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user_id, error = %e, "Reply does not carry the primer");
                return String::new();
            }
        };

        let answer = reply.content.clone();
        session.messages.push(reply);
        session.touch(Utc::now());
        self.registry.store(user_id, session);

        info!(user_id, answer_len = answer.len(), "Answer from chat provider");
        answer
    }

    // --- Hangup ---

    /// Close the session for `user_id` and persist it.
    ///
    /// Returns `Ok(None)` when there is no live session or it holds no
    /// user/assistant exchange; calling this twice, or racing the sweeper, is
    /// safe. Translation runs afterwards in the background and never affects
    /// the result.
    pub async fn stop(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let session = {
            let _turn = self.begin_turn(user_id).await;
            self.registry.load_and_remove(user_id)
        };

        let Some(session) = session else {
            debug!(user_id, "No live session to stop");
            return Ok(None);
        };
        self.close(session).await
    }

    async fn close(&self, session: Session) -> Result<Option<String>, StoreError> {
        let user_id = session.user_id.clone();

        let Some(dialog) = Dialog::from_session(session, Utc::now()) else {
            info!(user_id = %user_id, "Session closed without an exchange, nothing to store");
            return Ok(None);
        };

        let dialog = self.store.create(&dialog).await.inspect_err(|e| {
            error!(user_id = %user_id, error = %e, "Failed to store dialog");
        })?;

        let Some(dialog_id) = dialog.id.clone() else {
            info!(user_id = %user_id, "Dialog store has no database, translation skipped");
            return Ok(None);
        };

        info!(
            user_id = %user_id,
            dialog_id = %dialog_id,
            messages = dialog.messages.len(),
            duration_s = dialog.duration_s,
            "Dialog stored"
        );
        self.spawn_translation(dialog);

        Ok(Some(dialog_id))
    }

    // --- Turn locks ---

    /// Under `TurnPolicy::Serialized`, wait for the user's turn lock.
    async fn begin_turn(&self, user_id: &str) -> Option<TurnGuard<'_>> {
        match self.settings.turn_policy {
            TurnPolicy::Serialized => Some(self.turn_locks.acquire(user_id).await),
            TurnPolicy::LastWriterWins => None,
        }
    }

    fn spawn_translation(&self, dialog: Dialog) {
        let translator = Arc::clone(&self.translator);
        let store = Arc::clone(&self.store);
        let permits = Arc::clone(&self.translation_permits);

        self.translations.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            translate_and_update(translator.as_ref(), store.as_ref(), dialog).await;
        });
    }

    // --- Sweeping ---

    /// Close every session idle for longer than the configured timeout.
    ///
    /// Stale sessions are processed one after another; each is removed only
    /// if it is still idle at removal time, so a turn that lands between the
    /// scan and the removal keeps its session. Returns the number of sessions
    /// closed.
    pub async fn clean_up(&self) -> usize {
        let now = Utc::now();
        let idle_timeout = self.settings.idle_timeout;

        let mut stale = Vec::new();
        self.registry.for_each(&mut |user_id, session| {
            if session.is_idle(now, idle_timeout) {
                stale.push(user_id.to_string());
            }
        });

        let mut closed = 0;
        for user_id in stale {
            let turn = match self.settings.turn_policy {
                TurnPolicy::Serialized => match self.turn_locks.try_acquire(&user_id) {
                    Some(guard) => Some(guard),
                    None => {
                        debug!(user_id = %user_id, "Turn in progress, idle session kept");
                        continue;
                    }
                },
                TurnPolicy::LastWriterWins => None,
            };
            let removed = self
                .registry
                .remove_if(&user_id, &|session| session.is_idle(now, idle_timeout));
            drop(turn);

            let Some(session) = removed else {
                continue;
            };

            info!(user_id = %user_id, "Closing idle session");
            closed += 1;
            if let Err(e) = self.close(session).await {
                warn!(user_id = %user_id, error = %e, "Idle session was not archived");
            }
        }
        closed
    }

    // --- Shutdown ---

    /// Number of translation tasks still queued or running.
    pub fn pending_translations(&self) -> usize {
        self.translations.len()
    }

    /// Wait up to `deadline` for background translations to finish.
    ///
    /// Returns `true` if all of them completed in time. Without a call to
    /// this, shutting the runtime down drops in-flight translations.
    pub async fn drain(&self, deadline: Duration) -> bool {
        self.translations.close();
        let pending = self.translations.len();
        if pending > 0 {
            info!(pending, "Waiting for background translations");
        }

        let drained = tokio::time::timeout(deadline, self.translations.wait())
            .await
            .is_ok();
        if !drained {
            warn!(
                remaining = self.translations.len(),
                "Translation drain deadline reached"
            );
        }
        drained
    }
}

impl<L, T, D, R> Sweep for ConversationEngine<L, T, D, R>
where
    L: ChatCompletionClient,
    T: Translator + 'static,
    D: DialogStore + 'static,
    R: SessionRegistry,
{
    async fn sweep(&self) -> usize {
        self.clean_up().await
    }
}

/// Translate a stored dialog and write the translations back.
///
/// Failures are logged and dropped; the dialog simply stays untranslated.
async fn translate_and_update<T, D>(translator: &T, store: &D, mut dialog: Dialog)
where
    T: Translator,
    D: DialogStore,
{
    let dialog_id = dialog.id.clone().unwrap_or_default();

    let translated = match translator.translate(&dialog.contents()).await {
        Ok(translated) => translated,
        Err(e) => {
            error!(dialog_id = %dialog_id, error = %e, "Failed to translate dialog");
            return;
        }
    };

    if let Err(e) = dialog.apply_translations(translated) {
        error!(dialog_id = %dialog_id, error = %e, "Translation does not match dialog");
        return;
    }

    match store.update(&dialog).await {
        Ok(()) => debug!(dialog_id = %dialog_id, "Dialog translation stored"),
        Err(e) => error!(dialog_id = %dialog_id, error = %e, "Failed to store dialog translation"),
    }
}
