//! Edge spec validation.
//!
//! Validation is synchronous and runs before any store round-trip, so a
//! rejected spec guarantees no command reached the store.

use crate::error::{GraphError, Result};
use crate::graph::Edge;

/// Pluggable edge spec check.
///
/// [`Graph::with_validator`](crate::Graph::with_validator) swaps in a custom
/// implementation; the default is [`ShapeValidator`].
pub trait EdgeValidator: Send + Sync {
    /// Check an edge spec, rejecting with [`GraphError::Validation`].
    fn validate(&self, edge: &Edge) -> Result<()>;
}

/// Default validator enforcing the edge record shape.
///
/// Requires a non-empty `pid`, a non-empty `sid`, and a JSON object payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeValidator;

impl EdgeValidator for ShapeValidator {
    fn validate(&self, edge: &Edge) -> Result<()> {
        if edge.pid.is_empty() {
            return Err(GraphError::validation("pid must be a non-empty string"));
        }
        if edge.sid.is_empty() {
            return Err(GraphError::validation("sid must be a non-empty string"));
        }
        if !edge.data.is_object() {
            return Err(GraphError::validation("data must be a JSON object"));
        }
        Ok(())
    }
}
