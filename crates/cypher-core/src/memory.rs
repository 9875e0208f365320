//! Short-lived per-user conversation memory.
//!
//! Each user owns a bounded, ordered log of role-tagged turns. The log lives for
//! the process lifetime only. Users are locked independently: a slow exchange
//! for one user never blocks another.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::UserId;

/// Maximum number of turns kept per user.
pub const MAX_TURNS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

type Entry = Arc<Mutex<Vec<ChatTurn>>>;

/// Owner of every conversation entry.
#[derive(Default)]
pub struct ConversationStore {
    entries: Mutex<HashMap<UserId, Entry>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, user: UserId) -> Entry {
        let mut map = self.entries.lock().await;
        map.entry(user).or_default().clone()
    }

    /// Snapshot of the stored turns (empty if the user has none).
    pub async fn get(&self, user: UserId) -> Vec<ChatTurn> {
        let entry = {
            let map = self.entries.lock().await;
            map.get(&user).cloned()
        };
        match entry {
            Some(e) => e.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// Replace the user's log with an empty one.
    pub async fn reset(&self, user: UserId) {
        self.lock(user).await.clear();
    }

    /// Append `user_text` then `assistant_text`, keeping the newest [`MAX_TURNS`].
    ///
    /// No deduplication: call at most once per real exchange.
    pub async fn append_exchange(&self, user: UserId, user_text: &str, assistant_text: &str) {
        self.lock(user)
            .await
            .append_exchange(user_text, assistant_text);
    }

    /// Exclusive access to one user's log, held across an await if needed.
    pub async fn lock(&self, user: UserId) -> ConversationGuard {
        ConversationGuard {
            turns: self.entry(user).await.lock_owned().await,
        }
    }
}

/// Exclusive handle on a single user's log.
pub struct ConversationGuard {
    turns: OwnedMutexGuard<Vec<ChatTurn>>,
}

impl ConversationGuard {
    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn append_exchange(&mut self, user_text: &str, assistant_text: &str) {
        self.turns.push(ChatTurn::user(user_text));
        self.turns.push(ChatTurn::assistant(assistant_text));
        self.prune();
    }

    fn prune(&mut self) {
        if self.turns.len() > MAX_TURNS {
            let excess = self.turns.len() - MAX_TURNS;
            self.turns.drain(..excess);
        }
    }
}
