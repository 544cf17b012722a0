//! # Chat Session Store
//!
//! Injected capability for per-user chat history. The in-memory
//! implementation is a single-process placeholder: it does not survive
//! restarts and is not shared across processes. A keyed external store
//! with expiry can be substituted behind the same trait for multi-process
//! deployment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// One chat message, either side of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Keyed chat-history capability
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn history(&self, key: i64) -> Vec<ChatEntry>;

    async fn append(&self, key: i64, entry: ChatEntry);

    async fn clear(&self, key: i64);
}

/// In-memory session store bounded per key
pub struct InMemorySessionStore {
    sessions: DashMap<i64, Vec<ChatEntry>>,
    history_limit: usize,
}

impl InMemorySessionStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            history_limit,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn history(&self, key: i64) -> Vec<ChatEntry> {
        self.sessions
            .get(&key)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    async fn append(&self, key: i64, entry: ChatEntry) {
        let mut entries = self.sessions.entry(key).or_default();
        entries.push(entry);

        // Oldest messages fall off once the per-key cap is hit
        let len = entries.len();
        if len > self.history_limit {
            entries.drain(..len - self.history_limit);
        }
    }

    async fn clear(&self, key: i64) {
        self.sessions.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_history() {
        let store = InMemorySessionStore::new(10);

        store.append(1, ChatEntry::user("hello")).await;
        store.append(1, ChatEntry::assistant("hi there")).await;

        let history = store.history(1).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].text, "hi there");

        assert!(store.history(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_limit() {
        let store = InMemorySessionStore::new(3);

        for i in 0..5 {
            store.append(1, ChatEntry::user(format!("message {i}"))).await;
        }

        let history = store.history(1).await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].text, "message 2");
        assert_eq!(history[2].text, "message 4");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemorySessionStore::new(10);
        store.append(1, ChatEntry::user("hello")).await;
        store.clear(1).await;
        assert!(store.history(1).await.is_empty());
    }
}
