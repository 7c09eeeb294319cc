//! # kvgraph
//!
//! A directed-graph layer over an external key-value store that only offers
//! strings, sets, atomic command batches, and channel publish.
//!
//! ## Core Principles
//!
//! - **Store Agnostic**: any client exposing the primitive surface plugs in
//! - **Three Facts Together**: an edge is its data record plus two index
//!   memberships, always written and removed in one atomic batch
//! - **Explicit Errors**: stable error codes, no retries, no hidden recovery
//! - **Change Feed Always On**: every mutation publishes its before/after
//!   transition, always as a JSON array
//!
//! ## Architecture
//!
//! kvgraph is organized in layers:
//!
//! ```text
//! Caller (your application)
//!     ↓
//! Graph (node + edge operations, selector queries)
//!     ↓
//! KeyShaper / EdgeValidator / ChangeFeed
//!     ↓
//! GraphStore trait (strings, sets, atomic batches, publish)
//!     ↓
//! External key-value store (MemoryStore for tests)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kvgraph::{Edge, Graph};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> kvgraph::Result<()> {
//! let graph = Graph::in_memory();
//!
//! // Nodes are opaque IDs; force-creation is idempotent.
//! graph.force_create_node("alpha").await?;
//! graph.force_create_node("beta").await?;
//!
//! let edge = graph
//!     .create_edge(Edge::new("alpha", "beta", json!({"weight": 2})))
//!     .await?;
//! assert_eq!(graph.get_from("alpha").await?, vec![edge]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod feed;
pub mod graph;
pub mod keys;
pub mod store;
pub mod validate;

// Re-export main types
pub use config::GraphConfig;
pub use error::{GraphError, Result};
pub use feed::{ChangeFeed, ChangeRecord};
pub use graph::{Edge, EdgeSelector, Graph};
pub use keys::{KeyShaper, KeySpec};
pub use store::{GraphStore, MemoryStore, StoreCommand, StoreReply};
pub use validate::{EdgeValidator, ShapeValidator};
