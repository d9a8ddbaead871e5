//! codecoach - chat session engine for an in-page coding assistant
//!
//! Scrapes a coding-problem page for the problem statement and the user's
//! in-progress code, folds both into a fixed prompt, exchanges
//! JSON-constrained turns with a chat-completions endpoint, and keeps the
//! decoded conversation in an append-only session store. Rendering,
//! credential storage and page chrome are external collaborators behind
//! the traits in [`extractor`] and [`credentials`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod history;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod repl;
pub mod session;

pub use error::{CoachError, Result};
pub use extractor::{ContextExtractor, DomExtractor, PageSelectors, SessionContext};
pub use history::{AssistantPayload, ChatEntry, ConversationStore, DisplayKind, Role};
pub use session::{ChatSession, SessionState, TurnOutcome};
