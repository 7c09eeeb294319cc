//! Change notification feed.
//!
//! Every mutation publishes its `{before, after}` transition on one
//! namespaced channel. Delivery is best-effort: whoever is subscribed at
//! publish time sees the message, nobody else ever will.

use crate::error::{GraphError, Result};
use crate::graph::Edge;
use crate::store::GraphStore;
use log::trace;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One edge state transition.
///
/// `before` is absent for creations and `after` for destructions; updates
/// carry both. Absent sides serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Edge state before the mutation
    pub before: Option<Edge>,
    /// Edge state after the mutation
    pub after: Option<Edge>,
}

impl ChangeRecord {
    /// Record for a created edge.
    pub fn created(after: Edge) -> Self {
        Self {
            before: None,
            after: Some(after),
        }
    }

    /// Record for an updated edge.
    pub fn updated(before: Edge, after: Edge) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    /// Record for a destroyed edge.
    pub fn destroyed(before: Edge) -> Self {
        Self {
            before: Some(before),
            after: None,
        }
    }
}

/// Publisher of [`ChangeRecord`]s through the store's publish primitive.
///
/// The wire format is always a JSON array, even for a single record, so
/// consumers parse one shape. Publishing happens after the mutating batch has
/// already been applied; a publish failure surfaces to the caller but never
/// rolls the batch back.
pub struct ChangeFeed {
    store: Arc<dyn GraphStore>,
    channel: String,
}

impl ChangeFeed {
    /// Create a feed publishing on the given channel.
    pub fn new(store: Arc<dyn GraphStore>, channel: impl Into<String>) -> Self {
        Self {
            store,
            channel: channel.into(),
        }
    }

    /// Channel name records are published on.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Publish a single created record.
    pub async fn created(&self, after: Edge) -> Result<()> {
        self.publish(vec![ChangeRecord::created(after)]).await
    }

    /// Publish a single updated record.
    pub async fn updated(&self, before: Edge, after: Edge) -> Result<()> {
        self.publish(vec![ChangeRecord::updated(before, after)]).await
    }

    /// Publish a single destroyed record.
    pub async fn destroyed(&self, before: Edge) -> Result<()> {
        self.publish(vec![ChangeRecord::destroyed(before)]).await
    }

    /// Publish a whole cascade of destructions as one message.
    ///
    /// An empty cascade still publishes (an empty array on the wire).
    pub async fn destroyed_many(&self, before: Vec<Edge>) -> Result<()> {
        self.publish(before.into_iter().map(ChangeRecord::destroyed).collect())
            .await
    }

    async fn publish(&self, records: Vec<ChangeRecord>) -> Result<()> {
        let message = serde_json::to_string(&records)
            .map_err(|e| GraphError::serialization("Failed to serialize change records", Some(e)))?;
        trace!(
            "Publishing {} change record(s) on {}",
            records.len(),
            self.channel
        );
        self.store.publish(&self.channel, &message).await
    }
}
