//! Node operations: existence, forced creation, cascading destruction.

use super::types::IndexEntry;
use super::{Edge, Graph};
use crate::error::{GraphError, Result};
use crate::keys::KeySpec;
use crate::store::StoreCommand;
use log::{debug, trace};

impl Graph {
    /// Check whether a node marker exists for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the store check fails.
    pub async fn node_exists(&self, id: &str) -> Result<bool> {
        let key = self.keys.shape(KeySpec::Node { id });
        self.store.exists(&key).await
    }

    /// Fail with [`GraphError::NoSuchNode`] unless `id` exists.
    pub(crate) async fn assert_node(&self, id: &str) -> Result<()> {
        if self.node_exists(id).await? {
            Ok(())
        } else {
            Err(GraphError::NoSuchNode { id: id.to_string() })
        }
    }

    /// Unconditionally create the node marker for `id`.
    ///
    /// Idempotent: an existing marker is overwritten with the same value
    /// (the marker value is the id itself). Returns the id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Storage`] if the write fails.
    pub async fn force_create_node(&self, id: &str) -> Result<String> {
        debug!("Force-creating node: id={id}");
        let key = self.keys.shape(KeySpec::Node { id });
        self.store.set(&key, id).await?;
        Ok(id.to_string())
    }

    /// Destroy a node together with every edge incident to it.
    ///
    /// Returns the destroyed edges as they existed immediately before
    /// deletion; the same snapshot goes out as one destroyed-batch event,
    /// an empty array for an isolated node.
    ///
    /// The whole removal is one atomic batch: every incident edge's data
    /// record, this node's own adjacency indexes and marker, and this node's
    /// membership in each neighbor's opposite index all vanish together.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchNode`] if no marker exists for `id`.
    pub async fn destroy_node(&self, id: &str) -> Result<Vec<Edge>> {
        debug!("Destroying node: id={id}");
        self.assert_node(id).await?;

        let entries = self.read_indexes(id).await?;
        // Snapshot incident edges before anything is deleted; the feed must
        // report their pre-deletion state.
        let edges = self.resolve_entries(id, &entries).await?;

        let mut doomed = vec![
            self.keys.shape(KeySpec::From { pid: id }),
            self.keys.shape(KeySpec::To { sid: id }),
        ];
        for edge in &edges {
            doomed.push(self.keys.shape(KeySpec::Data {
                pid: &edge.pid,
                sid: &edge.sid,
            }));
        }
        doomed.push(self.keys.shape(KeySpec::Node { id }));

        let mut batch = Vec::with_capacity(entries.len() + 1);
        batch.push(StoreCommand::Del { keys: doomed });
        for entry in &entries {
            // A subscriber neighbor holds this id in its incoming index, a
            // publisher neighbor in its outgoing index.
            batch.push(match entry {
                IndexEntry::Subscriber(sid) => StoreCommand::SRem {
                    key: self.keys.shape(KeySpec::To { sid }),
                    member: id.to_string(),
                },
                IndexEntry::Publisher(pid) => StoreCommand::SRem {
                    key: self.keys.shape(KeySpec::From { pid }),
                    member: id.to_string(),
                },
            });
        }
        self.store.exec(batch).await?;
        trace!("Node {id} destroyed with {} incident edge(s)", edges.len());

        self.feed.destroyed_many(edges.clone()).await?;
        Ok(edges)
    }
}
