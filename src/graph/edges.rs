//! Edge operations: create, read, update, destroy, and directional queries.

use super::types::IndexEntry;
use super::{decode_edge, encode_data, next_reply, Edge, Graph};
use crate::error::{GraphError, Result};
use crate::keys::KeySpec;
use crate::store::StoreCommand;
use log::{debug, trace};

impl Graph {
    /// Create an edge between two existing nodes.
    ///
    /// `spec` is validated before any I/O; then both endpoints are
    /// confirmed; then the data record and both index memberships are
    /// written in one atomic batch and a created event is published. The
    /// stored payload is the serialization of `data` alone.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] for a malformed spec, and
    /// [`GraphError::UnknownPublisher`], [`GraphError::UnknownSubscriber`],
    /// or [`GraphError::UnknownEndpoints`] when endpoints are missing. A
    /// failed check leaves no partial state.
    pub async fn create_edge(&self, spec: Edge) -> Result<Edge> {
        self.validator.validate(&spec)?;
        debug!("Creating edge: {} -> {}", spec.pid, spec.sid);

        let pid_exists = self.node_exists(&spec.pid).await?;
        let sid_exists = self.node_exists(&spec.sid).await?;
        match (pid_exists, sid_exists) {
            (true, true) => {}
            (false, true) => return Err(GraphError::UnknownPublisher { pid: spec.pid }),
            (true, false) => return Err(GraphError::UnknownSubscriber { sid: spec.sid }),
            (false, false) => {
                return Err(GraphError::UnknownEndpoints {
                    pid: spec.pid,
                    sid: spec.sid,
                })
            }
        }

        let value = encode_data(&spec)?;
        self.store
            .exec(vec![
                StoreCommand::Set {
                    key: self.keys.shape(KeySpec::Data {
                        pid: &spec.pid,
                        sid: &spec.sid,
                    }),
                    value,
                },
                StoreCommand::SAdd {
                    key: self.keys.shape(KeySpec::From { pid: &spec.pid }),
                    member: spec.sid.clone(),
                },
                StoreCommand::SAdd {
                    key: self.keys.shape(KeySpec::To { sid: &spec.sid }),
                    member: spec.pid.clone(),
                },
            ])
            .await?;
        trace!("Edge {} -> {} created", spec.pid, spec.sid);

        self.feed.created(spec.clone()).await?;
        Ok(spec)
    }

    /// Create an edge, force-creating missing endpoints first.
    ///
    /// The publisher is created before the subscriber; both creations are
    /// idempotent, so pre-existing nodes are untouched. Validation still
    /// runs before any I/O.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] for a malformed spec; otherwise
    /// whatever [`create_edge`](Graph::create_edge) returns.
    pub async fn force_create_edge(&self, spec: Edge) -> Result<Edge> {
        self.validator.validate(&spec)?;
        self.force_create_node(&spec.pid).await?;
        self.force_create_node(&spec.sid).await?;
        self.create_edge(spec).await
    }

    /// Fetch the edge `pid` -> `sid`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchEdge`] if no data record exists.
    pub async fn get_edge(&self, pid: &str, sid: &str) -> Result<Edge> {
        let key = self.keys.shape(KeySpec::Data { pid, sid });
        let raw = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| GraphError::NoSuchEdge {
                pid: pid.to_string(),
                sid: sid.to_string(),
            })?;
        decode_edge(pid, sid, &raw)
    }

    /// Fetch the edge named by an edge-shaped spec.
    ///
    /// Convenience over [`get_edge`](Graph::get_edge); the payload of the
    /// argument is ignored, only its endpoints matter.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchEdge`] if no data record exists.
    pub async fn get_edge_spec(&self, edge: &Edge) -> Result<Edge> {
        self.get_edge(&edge.pid, &edge.sid).await
    }

    /// Replace the payload of an existing edge.
    ///
    /// Identity is immutable: only `data` changes. The previous payload is
    /// returned by the same store operation that writes the new one, so the
    /// published before-state cannot miss a write that landed in between.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchEdge`] if the edge does not exist, or if
    /// it vanished between the existence check and the swap.
    pub async fn update_edge(&self, after: Edge) -> Result<Edge> {
        debug!("Updating edge: {} -> {}", after.pid, after.sid);
        let key = self.keys.shape(KeySpec::Data {
            pid: &after.pid,
            sid: &after.sid,
        });
        if !self.store.exists(&key).await? {
            return Err(GraphError::NoSuchEdge {
                pid: after.pid,
                sid: after.sid,
            });
        }

        let value = encode_data(&after)?;
        let previous = match self.store.getset(&key, &value).await? {
            Some(previous) => previous,
            None => {
                // Lost a race with a destroy. Remove the value the swap just
                // wrote and report the edge gone instead of inventing a
                // before-state.
                self.store
                    .exec(vec![StoreCommand::Del { keys: vec![key] }])
                    .await?;
                return Err(GraphError::NoSuchEdge {
                    pid: after.pid,
                    sid: after.sid,
                });
            }
        };
        let before = decode_edge(&after.pid, &after.sid, &previous)?;
        trace!("Edge {} -> {} updated", after.pid, after.sid);

        self.feed.updated(before, after.clone()).await?;
        Ok(after)
    }

    /// Destroy the edge `pid` -> `sid`.
    ///
    /// The edge is read first so the destroyed event carries its final
    /// state; the data record and both index memberships are then removed
    /// in one atomic batch.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchEdge`] if the edge does not exist.
    pub async fn destroy_edge(&self, pid: &str, sid: &str) -> Result<Edge> {
        debug!("Destroying edge: {pid} -> {sid}");
        let edge = self.get_edge(pid, sid).await?;

        self.store
            .exec(vec![
                StoreCommand::Del {
                    keys: vec![self.keys.shape(KeySpec::Data { pid, sid })],
                },
                StoreCommand::SRem {
                    key: self.keys.shape(KeySpec::To { sid }),
                    member: pid.to_string(),
                },
                StoreCommand::SRem {
                    key: self.keys.shape(KeySpec::From { pid }),
                    member: sid.to_string(),
                },
            ])
            .await?;
        trace!("Edge {pid} -> {sid} destroyed");

        self.feed.destroyed(edge.clone()).await?;
        Ok(edge)
    }

    /// Destroy the edge named by an edge-shaped spec.
    ///
    /// Convenience over [`destroy_edge`](Graph::destroy_edge); the payload
    /// of the argument is ignored, only its endpoints matter.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchEdge`] if the edge does not exist.
    pub async fn destroy_edge_spec(&self, edge: &Edge) -> Result<Edge> {
        self.destroy_edge(&edge.pid, &edge.sid).await
    }

    /// All edges leaving `pid`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchNode`] if `pid` does not exist.
    pub async fn get_from(&self, pid: &str) -> Result<Vec<Edge>> {
        self.assert_node(pid).await?;
        let members = self
            .store
            .smembers(&self.keys.shape(KeySpec::From { pid }))
            .await?;
        let mut edges = Vec::with_capacity(members.len());
        for sid in &members {
            edges.push(self.get_edge(pid, sid).await?);
        }
        Ok(edges)
    }

    /// All edges arriving at `sid`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchNode`] if `sid` does not exist.
    pub async fn get_to(&self, sid: &str) -> Result<Vec<Edge>> {
        self.assert_node(sid).await?;
        let members = self
            .store
            .smembers(&self.keys.shape(KeySpec::To { sid }))
            .await?;
        let mut edges = Vec::with_capacity(members.len());
        for pid in &members {
            edges.push(self.get_edge(pid, sid).await?);
        }
        Ok(edges)
    }

    /// All edges incident to `id`, in either direction.
    ///
    /// Both adjacency indexes are read in one atomic batch, then every
    /// witnessed edge is resolved in a second batched read. A self-loop is
    /// witnessed by both indexes and appears twice.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchNode`] if `id` does not exist, and
    /// [`GraphError::NoSuchEdge`] if an index member has no data record.
    pub async fn get_all(&self, id: &str) -> Result<Vec<Edge>> {
        self.assert_node(id).await?;
        let entries = self.read_indexes(id).await?;
        self.resolve_entries(id, &entries).await
    }

    /// Read both adjacency indexes of `id` in one atomic batch, tagging
    /// each member with the index it came from.
    pub(crate) async fn read_indexes(&self, id: &str) -> Result<Vec<IndexEntry>> {
        let replies = self
            .store
            .exec(vec![
                StoreCommand::SMembers {
                    key: self.keys.shape(KeySpec::From { pid: id }),
                },
                StoreCommand::SMembers {
                    key: self.keys.shape(KeySpec::To { sid: id }),
                },
            ])
            .await?;
        let mut replies = replies.into_iter();
        let outgoing = next_reply(&mut replies)?.into_members()?;
        let incoming = next_reply(&mut replies)?.into_members()?;

        let mut entries = Vec::with_capacity(outgoing.len() + incoming.len());
        entries.extend(outgoing.into_iter().map(IndexEntry::Subscriber));
        entries.extend(incoming.into_iter().map(IndexEntry::Publisher));
        Ok(entries)
    }

    /// Resolve the full edge behind every tagged adjacency member of `id`
    /// in one batched read.
    ///
    /// An index member without a data record means the index and the data
    /// no longer agree; that surfaces as [`GraphError::NoSuchEdge`] rather
    /// than flowing on as a payload-less edge.
    pub(crate) async fn resolve_entries(
        &self,
        id: &str,
        entries: &[IndexEntry],
    ) -> Result<Vec<Edge>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let batch = entries
            .iter()
            .map(|entry| {
                let (pid, sid) = entry.endpoints(id);
                StoreCommand::Get {
                    key: self.keys.shape(KeySpec::Data { pid, sid }),
                }
            })
            .collect();
        let mut replies = self.store.exec(batch).await?.into_iter();

        let mut edges = Vec::with_capacity(entries.len());
        for entry in entries {
            let (pid, sid) = entry.endpoints(id);
            let raw = next_reply(&mut replies)?
                .into_value()?
                .ok_or_else(|| GraphError::NoSuchEdge {
                    pid: pid.to_string(),
                    sid: sid.to_string(),
                })?;
            edges.push(decode_edge(pid, sid, &raw)?);
        }
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_indexes_tags_directions() {
        let graph = Graph::in_memory();
        for id in ["hub", "out", "in"] {
            graph.force_create_node(id).await.unwrap();
        }
        graph
            .create_edge(Edge::new("hub", "out", json!({})))
            .await
            .unwrap();
        graph
            .create_edge(Edge::new("in", "hub", json!({})))
            .await
            .unwrap();

        let entries = graph.read_indexes("hub").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&IndexEntry::Subscriber("out".to_string())));
        assert!(entries.contains(&IndexEntry::Publisher("in".to_string())));
    }

    #[tokio::test]
    async fn test_resolve_entries_is_strict_about_missing_data() {
        let graph = Graph::in_memory();
        graph.force_create_node("a").await.unwrap();
        let entries = vec![IndexEntry::Subscriber("ghost".to_string())];

        let err = graph.resolve_entries("a", &entries).await.unwrap_err();
        assert_eq!(err.code(), "NO_SUCH_EDGE");
    }

    #[tokio::test]
    async fn test_self_loop_appears_in_both_directions() {
        let graph = Graph::in_memory();
        graph
            .force_create_edge(Edge::new("me", "me", json!({"loop": true})))
            .await
            .unwrap();

        let all = graph.get_all("me").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], all[1]);
        assert_eq!(graph.get_from("me").await.unwrap().len(), 1);
        assert_eq!(graph.get_to("me").await.unwrap().len(), 1);
    }
}
