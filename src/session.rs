//! Session controller
//!
//! The one stateful coordinator. Each submitted turn runs the full chain:
//! credential read, page extraction, prompt assembly, provider exchange,
//! reply decoding, store append. Every failure is absorbed here and
//! reported as a [`TurnOutcome`]; nothing escapes to crash the host. The
//! worst case is a turn that produces no visible assistant reply.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::credentials::CredentialStore;
use crate::error::CoachError;
use crate::extractor::ContextExtractor;
use crate::history::{ChatEntry, ConversationStore};
use crate::parser::parse_reply;
use crate::prompt::build_system_prompt;
use crate::provider::CompletionClient;

/// Controller state, observed by the rendering boundary to enable or
/// disable input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingReply,
}

/// What one submitted turn came to
#[derive(Debug)]
pub enum TurnOutcome {
    /// Reply parsed; an assistant entry was appended
    Completed,
    /// Empty or whitespace-only submission; nothing happened
    IgnoredEmptyInput,
    /// No credential in the store; prompt the user, store unchanged
    CredentialRequired,
    /// The reply was empty or failed the structural contract; dropped
    /// with no assistant entry and no error surfaced
    ReplyDropped,
    /// Provider or transport failure, surfaced to the boundary. Auth
    /// failures stay distinguishable via [`CoachError::is_auth`].
    Failed(CoachError),
    /// A turn is already in flight; submissions are serialized
    Busy,
}

/// One chat session against one hosting page
pub struct ChatSession {
    extractor: Box<dyn ContextExtractor>,
    credentials: Arc<dyn CredentialStore>,
    client: CompletionClient,
    store: ConversationStore,
    state: SessionState,
}

impl ChatSession {
    pub fn new(
        extractor: Box<dyn ContextExtractor>,
        credentials: Arc<dyn CredentialStore>,
        client: CompletionClient,
    ) -> Self {
        Self {
            extractor,
            credentials,
            client,
            store: ConversationStore::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The conversation so far, for the rendering boundary
    pub fn history(&self) -> &ConversationStore {
        &self.store
    }

    /// Run one turn. Once a turn starts it runs to completion; there is
    /// no mid-flight cancellation.
    pub async fn submit(&mut self, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            return TurnOutcome::IgnoredEmptyInput;
        }
        if self.state == SessionState::AwaitingReply {
            return TurnOutcome::Busy;
        }

        // Credential is read once, at the start of turn processing, so a
        // missing secret aborts before anything is appended or sent.
        let Some(credential) = self.credentials.get().await else {
            debug!("no credential configured, aborting turn");
            return TurnOutcome::CredentialRequired;
        };

        self.state = SessionState::AwaitingReply;
        let outcome = self.run_turn(&credential, text).await;
        self.state = SessionState::Idle;
        outcome
    }

    async fn run_turn(&mut self, credential: &str, text: &str) -> TurnOutcome {
        // History replayed to the provider excludes the entry for the turn
        // being submitted; the user entry is still appended before the
        // provider call begins.
        let history = self.store.snapshot().to_vec();
        self.store.append(ChatEntry::user(text));

        let ctx = self.extractor.extract();
        let system_prompt = build_system_prompt(&ctx);

        let raw = match self
            .client
            .complete(credential, &system_prompt, &history, text, &ctx.user_code)
            .await
        {
            Ok(raw) => raw,
            Err(err) if err.is_silent_drop() => {
                debug!("provider reply dropped: {err}");
                return TurnOutcome::ReplyDropped;
            }
            Err(err) => {
                warn!("completion failed: {err}");
                return TurnOutcome::Failed(err);
            }
        };

        match parse_reply(&raw) {
            Ok(payload) => {
                self.store.append(ChatEntry::assistant(payload));
                TurnOutcome::Completed
            }
            Err(err) => {
                // Observed upstream behavior: replies that miss the shape
                // are ignored, not surfaced. Candidate for a visible error
                // in a future revision.
                debug!("unparseable reply dropped: {err}");
                TurnOutcome::ReplyDropped
            }
        }
    }
}
