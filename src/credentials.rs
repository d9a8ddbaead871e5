//! Credential access
//!
//! The provider secret lives in an external store (browser storage in the
//! hosted setting, config or env here). The engine never persists it: it
//! is read once per turn at submit time, and the turn aborts with a
//! user-visible prompt when it is absent. Hosts subscribe once per
//! session to observe changes and unsubscribe on teardown by dropping
//! the receiver.

use async_trait::async_trait;
use tokio::sync::watch;

/// "Get current secret" plus a change-notification channel
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current secret, if any
    async fn get(&self) -> Option<String>;

    /// Watch for secret changes (new value or removal)
    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}

/// In-memory credential store backed by a watch channel
pub struct MemoryCredentialStore {
    tx: watch::Sender<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new(initial: Option<String>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Replace the secret and notify subscribers. `None` clears it.
    pub fn set(&self, secret: Option<String>) {
        // send_replace never fails; the sender keeps the value even with
        // no live receivers
        self.tx.send_replace(secret);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}
