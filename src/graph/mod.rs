//! Graph handle and public operation surface.
//!
//! [`Graph`] composes a shared store handle with the key shaper, the change
//! feed, and the validator. Node-facing operations live in `nodes`, edge
//! operations and adjacency plumbing in `edges`; this module owns
//! construction and the selector dispatch.

mod edges;
mod nodes;
mod types;

pub use types::{Edge, EdgeSelector};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::feed::ChangeFeed;
use crate::keys::KeyShaper;
use crate::store::{GraphStore, MemoryStore, StoreReply};
use crate::validate::{EdgeValidator, ShapeValidator};
use std::sync::Arc;

/// A directed graph persisted in an external key-value store.
///
/// The store knows nothing about graphs. An edge exists exactly when three
/// facts hold at once: its data record is present, its subscriber appears in
/// the publisher's outgoing index, and its publisher appears in the
/// subscriber's incoming index. Every mutation keeps the three facts together
/// by issuing them as one atomic batch.
///
/// All operations are async; existence checks before a batch are separate
/// round-trips, so concurrent clients racing on the same node or edge may
/// interleave between them. Operations on disjoint parts of the graph never
/// interfere.
pub struct Graph {
    store: Arc<dyn GraphStore>,
    keys: KeyShaper,
    feed: ChangeFeed,
    validator: Box<dyn EdgeValidator>,
}

impl Graph {
    /// Create a graph over the given store with the default
    /// [`ShapeValidator`].
    pub fn new(store: Arc<dyn GraphStore>, config: GraphConfig) -> Self {
        Self::with_validator(store, config, Box::new(ShapeValidator))
    }

    /// Create a graph with a caller-supplied edge validator.
    pub fn with_validator(
        store: Arc<dyn GraphStore>,
        config: GraphConfig,
        validator: Box<dyn EdgeValidator>,
    ) -> Self {
        let keys = KeyShaper::new(&config);
        let feed = ChangeFeed::new(Arc::clone(&store), config.channel());
        Self {
            store,
            keys,
            feed,
            validator,
        }
    }

    /// Create a graph over a fresh in-memory store.
    ///
    /// **Warning**: All data is lost when the graph is dropped.
    /// Only use for testing.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), GraphConfig::default())
    }

    /// Channel name change records are published on.
    pub fn channel(&self) -> &str {
        self.feed.channel()
    }

    /// Query edges by explicit selector.
    ///
    /// `Between` resolves the single named edge as a one-element list (and
    /// fails if it does not exist); the other variants delegate to
    /// [`get_from`](Graph::get_from), [`get_to`](Graph::get_to), and
    /// [`get_all`](Graph::get_all).
    ///
    /// # Errors
    ///
    /// Whatever the delegated query returns: [`GraphError::NoSuchEdge`] for
    /// `Between`, [`GraphError::NoSuchNode`] for the node-anchored variants.
    pub async fn get_edges(&self, selector: EdgeSelector) -> Result<Vec<Edge>> {
        match selector {
            EdgeSelector::Between { pid, sid } => Ok(vec![self.get_edge(&pid, &sid).await?]),
            EdgeSelector::From { pid } => self.get_from(&pid).await,
            EdgeSelector::To { sid } => self.get_to(&sid).await,
            EdgeSelector::Any { id } => self.get_all(&id).await,
        }
    }
}

/// Serialize the payload of an edge for storage.
///
/// Only `data` is stored; pid and sid live in the key.
pub(crate) fn encode_data(edge: &Edge) -> Result<String> {
    serde_json::to_string(&edge.data)
        .map_err(|e| GraphError::serialization("Failed to serialize edge data", Some(e)))
}

/// Rebuild an edge from its key endpoints and stored payload.
pub(crate) fn decode_edge(pid: &str, sid: &str, raw: &str) -> Result<Edge> {
    let data = serde_json::from_str(raw)
        .map_err(|e| GraphError::serialization("Failed to parse stored edge data", Some(e)))?;
    Ok(Edge::new(pid, sid, data))
}

/// Pull the next positional reply of a batch, failing if the store answered
/// fewer replies than commands.
pub(crate) fn next_reply(replies: &mut impl Iterator<Item = StoreReply>) -> Result<StoreReply> {
    replies.next().ok_or_else(|| GraphError::Storage {
        message: "store returned fewer replies than batch commands".to_string(),
        source: None,
    })
}
