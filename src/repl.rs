//! Interactive REPL for codecoach
//!
//! A readline-based stand-in for the in-page rendering boundary:
//! - submits turns to the session controller
//! - renders the structured payload of each assistant entry
//! - prompts for a credential when the store has none

use std::sync::Arc;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::credentials::MemoryCredentialStore;
use crate::history::{AssistantPayload, ChatEntry, Role};
use crate::session::{ChatSession, TurnOutcome};

/// REPL state
pub struct Repl {
    /// Readline editor with history
    editor: DefaultEditor,
    /// The chat session under the prompt
    session: ChatSession,
    /// Shared handle for setting the credential from /key
    credentials: Arc<MemoryCredentialStore>,
    /// History file path
    history_path: std::path::PathBuf,
}

impl Repl {
    pub fn new(session: ChatSession, credentials: Arc<MemoryCredentialStore>) -> Result<Self> {
        let editor = DefaultEditor::new()?;

        // History file in ~/.codecoach/repl_history
        let history_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".codecoach")
            .join("repl_history");

        Ok(Self {
            editor,
            session,
            credentials,
            history_path,
        })
    }

    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        println!("Ask about the loaded problem (Ctrl+D to exit, /help for commands)");
        println!();

        loop {
            let readline = self.editor.readline(">>> ");

            match readline {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(&line)?;

                    if trimmed.starts_with('/') {
                        self.handle_command(trimmed);
                        continue;
                    }

                    self.process_input(trimmed).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn handle_command(&mut self, cmd: &str) {
        match cmd.split_whitespace().next().unwrap_or_default() {
            "/help" => {
                println!("Commands:");
                println!("  /help       - Show this help");
                println!("  /history    - Show the conversation so far");
                println!("  /key <key>  - Set the API credential");
                println!("  /quit       - Exit");
            }
            "/history" => {
                if self.session.history().is_empty() {
                    println!("No conversation yet.");
                }
                for entry in self.session.history().snapshot() {
                    render_entry(entry);
                }
            }
            "/key" => {
                let key = cmd.strip_prefix("/key").unwrap_or_default().trim();
                if key.is_empty() {
                    self.credentials.set(None);
                    println!("Credential cleared.");
                } else {
                    self.credentials.set(Some(key.to_string()));
                    println!("Credential set.");
                }
            }
            "/quit" | "/exit" => {
                std::process::exit(0);
            }
            other => {
                println!("Unknown command: {}", other);
            }
        }
    }

    /// Process one user turn and render its outcome
    async fn process_input(&mut self, input: &str) {
        match self.session.submit(input).await {
            TurnOutcome::Completed => {
                if let Some(entry) = self.session.history().snapshot().last() {
                    render_entry(entry);
                }
            }
            TurnOutcome::CredentialRequired => {
                println!("  [no API key configured - set one with /key <key>]");
            }
            TurnOutcome::ReplyDropped => {
                println!("  [no usable reply this turn]");
            }
            TurnOutcome::Failed(err) => {
                eprintln!("Error: {}", err);
            }
            TurnOutcome::IgnoredEmptyInput | TurnOutcome::Busy => {}
        }
    }
}

fn render_entry(entry: &ChatEntry) {
    match entry.role {
        Role::User => println!("you> {}", entry.raw_message),
        Role::Assistant => {
            if let Some(payload) = &entry.payload {
                render_payload(payload);
            }
        }
    }
}

fn render_payload(payload: &AssistantPayload) {
    if payload.is_empty() {
        println!("  [assistant sent an empty payload]");
        return;
    }
    if let Some(feedback) = &payload.feedback {
        println!("\n{}", feedback);
    }
    if !payload.hints.is_empty() {
        println!("\nHints:");
        for (i, hint) in payload.hints.iter().enumerate() {
            println!("  {}. {}", i + 1, hint);
        }
    }
    if let Some(snippet) = &payload.snippet {
        let lang = payload.programming_language.as_deref().unwrap_or("");
        println!("\n```{}\n{}\n```", lang, snippet);
    }
    println!();
}
