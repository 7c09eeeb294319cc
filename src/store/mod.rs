//! Store abstractions and the in-memory implementation.
//!
//! This module defines the [`GraphStore`] trait, the primitive surface the
//! graph layer assumes of its external key-value store, and provides
//! [`MemoryStore`] for tests and examples.
//!
//! The store offers no native graph concepts. Everything the graph layer
//! needs is expressed through string values, member sets, atomic command
//! batches, and channel publishes.

mod memory;

pub use memory::MemoryStore;

use crate::error::{GraphError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Primitive operations of the external key-value store.
///
/// Implementations wrap a concrete client (connection handling, transport,
/// and retries live there, not here) and report I/O failures as
/// [`GraphError::Storage`]. The graph layer never remaps those errors.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Read the string value at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the read fails.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write the string value at `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Atomically write `value` at `key` and return the previous value.
    ///
    /// Returns `Ok(None)` if the key did not exist before the write.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the swap fails.
    async fn getset(&self, key: &str, value: &str) -> Result<Option<String>>;

    /// Check whether `key` exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the check fails.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Read all members of the set at `key`.
    ///
    /// Returns an empty list if the key does not exist. Member order is
    /// unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the read fails.
    async fn smembers(&self, key: &str) -> Result<Vec<String>>;

    /// Execute a batch of commands as one indivisible unit.
    ///
    /// All commands apply together or none do, and no other client observes
    /// a partially applied batch. The store does NOT isolate this batch from
    /// commands issued outside it: another client may interleave between a
    /// read and a later batch.
    ///
    /// Replies align with the submitted commands by position.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the batch fails; no command of a
    /// failed batch is applied.
    async fn exec(&self, batch: Vec<StoreCommand>) -> Result<Vec<StoreReply>>;

    /// Publish `message` on `channel`.
    ///
    /// Fire-and-forget: delivery reaches whoever is subscribed at publish
    /// time, with no acknowledgement or replay.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the publish fails.
    async fn publish(&self, channel: &str, message: &str) -> Result<()>;
}

/// One command inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreCommand {
    /// Write a string value
    Set {
        /// Key to write
        key: String,
        /// Value to write
        value: String,
    },
    /// Read a string value
    Get {
        /// Key to read
        key: String,
    },
    /// Delete keys of any kind (missing keys are ignored)
    Del {
        /// Keys to delete
        keys: Vec<String>,
    },
    /// Add a member to a set, creating the set if absent
    SAdd {
        /// Set key
        key: String,
        /// Member to add
        member: String,
    },
    /// Remove a member from a set (missing member is ignored)
    SRem {
        /// Set key
        key: String,
        /// Member to remove
        member: String,
    },
    /// Read all members of a set
    SMembers {
        /// Set key
        key: String,
    },
}

/// Positional reply to one [`StoreCommand`].
///
/// `Set`, `Del`, `SAdd`, and `SRem` answer [`Done`](StoreReply::Done);
/// `Get` answers [`Value`](StoreReply::Value); `SMembers` answers
/// [`Members`](StoreReply::Members).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreReply {
    /// Command applied, nothing to return
    Done,
    /// String value, `None` if the key was absent
    Value(Option<String>),
    /// Set members, empty if the key was absent
    Members(Vec<String>),
}

impl StoreReply {
    /// Extract a value reply.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the store answered a `Get` with a
    /// different reply shape.
    pub fn into_value(self) -> Result<Option<String>> {
        match self {
            StoreReply::Value(value) => Ok(value),
            other => Err(GraphError::Storage {
                message: format!("expected a value reply, got {other:?}"),
                source: None,
            }),
        }
    }

    /// Extract a members reply.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the store answered an `SMembers`
    /// with a different reply shape.
    pub fn into_members(self) -> Result<Vec<String>> {
        match self {
            StoreReply::Members(members) => Ok(members),
            other => Err(GraphError::Storage {
                message: format!("expected a members reply, got {other:?}"),
                source: None,
            }),
        }
    }
}
