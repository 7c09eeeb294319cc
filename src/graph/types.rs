//! Core graph types: edges, query selectors, and adjacency tags.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A directed edge from a publisher node to a subscriber node.
///
/// Serves as both the creation spec and the stored result. Identity is the
/// `(pid, sid)` pair and never changes after creation; only `data` is mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Publisher (source) node ID
    pub pid: String,
    /// Subscriber (destination) node ID
    pub sid: String,
    /// Opaque payload; a JSON object under the default validator
    pub data: Value,
}

impl Edge {
    /// Create an edge spec.
    pub fn new(pid: impl Into<String>, sid: impl Into<String>, data: Value) -> Self {
        Self {
            pid: pid.into(),
            sid: sid.into(),
            data,
        }
    }
}

/// Selector for [`get_edges`](crate::Graph::get_edges).
///
/// Each variant names its query explicitly; there is no runtime shape
/// sniffing of the argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeSelector {
    /// Exactly the edge `pid` -> `sid`, returned as a one-element list.
    Between {
        /// Publisher node ID
        pid: String,
        /// Subscriber node ID
        sid: String,
    },
    /// All edges leaving `pid`.
    From {
        /// Publisher node ID
        pid: String,
    },
    /// All edges arriving at `sid`.
    To {
        /// Subscriber node ID
        sid: String,
    },
    /// All edges incident to `id`, in either direction.
    Any {
        /// Node ID
        id: String,
    },
}

/// An adjacency member tagged with the index it was read from.
///
/// A member of a node's outgoing index is a subscriber neighbor; a member of
/// the incoming index is a publisher neighbor. The tag decides which way the
/// witnessed edge points and which opposite index a cascade must clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IndexEntry {
    /// Neighbor found in the scanned node's outgoing index.
    Subscriber(String),
    /// Neighbor found in the scanned node's incoming index.
    Publisher(String),
}

impl IndexEntry {
    /// Endpoint pair `(pid, sid)` of the witnessed edge, relative to the
    /// scanned node.
    pub(crate) fn endpoints<'a>(&'a self, node: &'a str) -> (&'a str, &'a str) {
        match self {
            IndexEntry::Subscriber(sid) => (node, sid),
            IndexEntry::Publisher(pid) => (pid, node),
        }
    }
}
