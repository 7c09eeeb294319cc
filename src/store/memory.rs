//! In-memory store for testing.
//!
//! **Note**: This store is for testing and examples only. All data is lost
//! when the last handle is dropped.

use super::{GraphStore, StoreCommand, StoreReply};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// String and set tables, guarded together so a batch mutates both under one
/// write lock.
#[derive(Debug, Default)]
struct Tables {
    strings: BTreeMap<String, String>,
    sets: BTreeMap<String, BTreeSet<String>>,
}

/// In-memory [`GraphStore`] backed by `BTreeMap` tables.
///
/// Cloning is cheap and clones share the same data. Batch atomicity comes
/// from holding the write lock across the whole batch; publishes go over
/// per-channel broadcast channels so tests can observe the change feed via
/// [`subscribe`](MemoryStore::subscribe).
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to a publish channel.
    ///
    /// Only messages published after the subscription are received. Lagging
    /// receivers drop the oldest messages (bounded channel).
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        let mut senders = self.channels.write().unwrap();
        senders
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(256).0)
            .subscribe()
    }

    /// Total number of stored keys, counting string and set keys alike.
    ///
    /// Useful for testing and assertions.
    pub fn len(&self) -> usize {
        let tables = self.tables.read().unwrap();
        tables.strings.len() + tables.sets.len()
    }

    /// Check if the store holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all data from the store.
    ///
    /// Useful for resetting state between tests.
    pub fn clear(&self) {
        let mut tables = self.tables.write().unwrap();
        tables.strings.clear();
        tables.sets.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.tables.read().unwrap().strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.tables
            .write()
            .unwrap()
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn getset(&self, key: &str, value: &str) -> Result<Option<String>> {
        Ok(self
            .tables
            .write()
            .unwrap()
            .strings
            .insert(key.to_string(), value.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let tables = self.tables.read().unwrap();
        Ok(tables.strings.contains_key(key) || tables.sets.contains_key(key))
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn exec(&self, batch: Vec<StoreCommand>) -> Result<Vec<StoreReply>> {
        // One write guard across the whole batch is what makes it atomic.
        let mut tables = self.tables.write().unwrap();
        let mut replies = Vec::with_capacity(batch.len());
        for command in batch {
            match command {
                StoreCommand::Set { key, value } => {
                    tables.strings.insert(key, value);
                    replies.push(StoreReply::Done);
                }
                StoreCommand::Get { key } => {
                    replies.push(StoreReply::Value(tables.strings.get(&key).cloned()));
                }
                StoreCommand::Del { keys } => {
                    for key in keys {
                        tables.strings.remove(&key);
                        tables.sets.remove(&key);
                    }
                    replies.push(StoreReply::Done);
                }
                StoreCommand::SAdd { key, member } => {
                    tables.sets.entry(key).or_default().insert(member);
                    replies.push(StoreReply::Done);
                }
                StoreCommand::SRem { key, member } => {
                    // An emptied set disappears entirely.
                    if let Some(set) = tables.sets.get_mut(&key) {
                        set.remove(&member);
                        if set.is_empty() {
                            tables.sets.remove(&key);
                        }
                    }
                    replies.push(StoreReply::Done);
                }
                StoreCommand::SMembers { key } => {
                    replies.push(StoreReply::Members(
                        tables
                            .sets
                            .get(&key)
                            .map(|set| set.iter().cloned().collect())
                            .unwrap_or_default(),
                    ));
                }
            }
        }
        Ok(replies)
    }

    async fn publish(&self, channel: &str, message: &str) -> Result<()> {
        let senders = self.channels.read().unwrap();
        if let Some(sender) = senders.get(channel) {
            // Ignore send errors - they just mean there are no subscribers.
            let _ = sender.send(message.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        store.set("key1", "value1").await.unwrap();

        let value = store.get("key1").await.unwrap();
        assert_eq!(value, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_getset_returns_previous_value() {
        let store = MemoryStore::new();
        assert_eq!(store.getset("key1", "first").await.unwrap(), None);
        assert_eq!(
            store.getset("key1", "second").await.unwrap(),
            Some("first".to_string())
        );
        assert_eq!(store.get("key1").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_exists_covers_strings_and_sets() {
        let store = MemoryStore::new();
        assert!(!store.exists("s").await.unwrap());
        assert!(!store.exists("m").await.unwrap());

        store.set("s", "v").await.unwrap();
        store
            .exec(vec![StoreCommand::SAdd {
                key: "m".to_string(),
                member: "x".to_string(),
            }])
            .await
            .unwrap();

        assert!(store.exists("s").await.unwrap());
        assert!(store.exists("m").await.unwrap());
    }

    #[tokio::test]
    async fn test_smembers_absent_key_is_empty() {
        let store = MemoryStore::new();
        assert!(store.smembers("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exec_mixed_batch() {
        let store = MemoryStore::new();
        store.set("old", "gone soon").await.unwrap();

        let replies = store
            .exec(vec![
                StoreCommand::Set {
                    key: "k".to_string(),
                    value: "v".to_string(),
                },
                StoreCommand::SAdd {
                    key: "set".to_string(),
                    member: "a".to_string(),
                },
                StoreCommand::Del {
                    keys: vec!["old".to_string()],
                },
                StoreCommand::Get {
                    key: "k".to_string(),
                },
                StoreCommand::SMembers {
                    key: "set".to_string(),
                },
            ])
            .await
            .unwrap();

        assert_eq!(replies.len(), 5);
        assert_eq!(replies[0], StoreReply::Done);
        assert_eq!(replies[3], StoreReply::Value(Some("v".to_string())));
        assert_eq!(replies[4], StoreReply::Members(vec!["a".to_string()]));
        assert_eq!(store.get("old").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_del_removes_sets_too() {
        let store = MemoryStore::new();
        store
            .exec(vec![StoreCommand::SAdd {
                key: "set".to_string(),
                member: "a".to_string(),
            }])
            .await
            .unwrap();

        store
            .exec(vec![StoreCommand::Del {
                keys: vec!["set".to_string()],
            }])
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_srem_drops_emptied_set() {
        let store = MemoryStore::new();
        store
            .exec(vec![StoreCommand::SAdd {
                key: "set".to_string(),
                member: "only".to_string(),
            }])
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        store
            .exec(vec![StoreCommand::SRem {
                key: "set".to_string(),
                member: "only".to_string(),
            }])
            .await
            .unwrap();
        assert!(store.is_empty());
        assert!(!store.exists("set").await.unwrap());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let store = MemoryStore::new();
        let mut receiver = store.subscribe("events");

        store.publish("events", "hello").await.unwrap();
        assert_eq!(receiver.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let store = MemoryStore::new();
        store.publish("nobody", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();
        store
            .exec(vec![StoreCommand::SAdd {
                key: "set".to_string(),
                member: "a".to_string(),
            }])
            .await
            .unwrap();
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }
}
