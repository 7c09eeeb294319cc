//! Error types for kvgraph operations.
//!
//! All fallible operations return [`Result<T>`]. Recoverable errors carry a
//! stable [`code`](GraphError::code) string so callers can branch without
//! matching individual variants.

use thiserror::Error;

/// Result type alias for kvgraph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for all graph operations.
///
/// The three unknown-endpoint variants are distinct errors with distinct
/// messages, but all report the `NO_SUCH_NODE` code.
#[derive(Error, Debug)]
pub enum GraphError {
    /// No edge exists between the named endpoints
    #[error("There is no edge from {pid} to {sid}")]
    NoSuchEdge {
        /// Publisher (source) node ID
        pid: String,
        /// Subscriber (destination) node ID
        sid: String,
    },

    /// No node marker exists for the given ID
    #[error("There is no such node with ID \"{id}\"")]
    NoSuchNode {
        /// ID of the missing node
        id: String,
    },

    /// Edge creation referenced a nonexistent publisher node
    #[error("Edge cannot be created because of unknown publisher \"{pid}\"")]
    UnknownPublisher {
        /// Publisher node ID that does not exist
        pid: String,
    },

    /// Edge creation referenced a nonexistent subscriber node
    #[error("Edge cannot be created because of unknown subscriber \"{sid}\"")]
    UnknownSubscriber {
        /// Subscriber node ID that does not exist
        sid: String,
    },

    /// Edge creation referenced two nonexistent nodes
    #[error("Edge cannot be created because of unknown publisher \"{pid}\" and unknown subscriber \"{sid}\"")]
    UnknownEndpoints {
        /// Publisher node ID that does not exist
        pid: String,
        /// Subscriber node ID that does not exist
        sid: String,
    },

    /// Edge spec rejected before any I/O was performed
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what was malformed
        message: String,
    },

    /// Underlying store I/O error
    #[error("Storage error: {message}")]
    Storage {
        /// Detailed error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GraphError {
    /// Stable machine-readable code for this error.
    ///
    /// All unknown-endpoint variants share `NO_SUCH_NODE` with
    /// [`GraphError::NoSuchNode`]; the message text tells them apart.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchEdge { .. } => "NO_SUCH_EDGE",
            Self::NoSuchNode { .. }
            | Self::UnknownPublisher { .. }
            | Self::UnknownSubscriber { .. }
            | Self::UnknownEndpoints { .. } => "NO_SUCH_NODE",
            Self::Validation { .. } => "VALIDATION",
            Self::Storage { .. } => "STORAGE",
            Self::Serialization { .. } => "SERIALIZATION",
        }
    }

    /// Create a validation error from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a storage error from a message and optional source.
    pub fn storage<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_edge_message() {
        let err = GraphError::NoSuchEdge {
            pid: "a".to_string(),
            sid: "b".to_string(),
        };
        assert_eq!(err.to_string(), "There is no edge from a to b");
        assert_eq!(err.code(), "NO_SUCH_EDGE");
    }

    #[test]
    fn test_no_such_node_message() {
        let err = GraphError::NoSuchNode {
            id: "lost".to_string(),
        };
        assert_eq!(err.to_string(), "There is no such node with ID \"lost\"");
        assert_eq!(err.code(), "NO_SUCH_NODE");
    }

    #[test]
    fn test_unknown_endpoint_messages_are_distinct() {
        let pub_only = GraphError::UnknownPublisher {
            pid: "p".to_string(),
        };
        let sub_only = GraphError::UnknownSubscriber {
            sid: "s".to_string(),
        };
        let both = GraphError::UnknownEndpoints {
            pid: "p".to_string(),
            sid: "s".to_string(),
        };
        assert_eq!(
            pub_only.to_string(),
            "Edge cannot be created because of unknown publisher \"p\""
        );
        assert_eq!(
            sub_only.to_string(),
            "Edge cannot be created because of unknown subscriber \"s\""
        );
        assert_eq!(
            both.to_string(),
            "Edge cannot be created because of unknown publisher \"p\" and unknown subscriber \"s\""
        );
        // All three classify as missing nodes.
        assert_eq!(pub_only.code(), "NO_SUCH_NODE");
        assert_eq!(sub_only.code(), "NO_SUCH_NODE");
        assert_eq!(both.code(), "NO_SUCH_NODE");
    }

    #[test]
    fn test_validation_error() {
        let err = GraphError::validation("pid must not be empty");
        assert_eq!(err.to_string(), "Validation error: pid must not be empty");
        assert_eq!(err.code(), "VALIDATION");
    }

    #[test]
    fn test_storage_error() {
        let err = GraphError::storage("connection refused", None::<std::io::Error>);
        assert_eq!(err.to_string(), "Storage error: connection refused");
        assert_eq!(err.code(), "STORAGE");
    }
}
