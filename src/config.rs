//! Graph configuration.

/// Configuration for a [`Graph`](crate::Graph).
///
/// Only key naming is configurable here; the store client itself is passed
/// separately at construction. Every template uses `{}` placeholders filled
/// left to right, one per ID the key addresses.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Key namespace prefix. Also prefixes the change channel.
    pub namespace: String,
    /// Override for the node marker key template (one placeholder).
    pub key_node: Option<String>,
    /// Override for the edge data key template (two placeholders: pid, sid).
    pub key_data: Option<String>,
    /// Override for the outgoing-index key template (one placeholder).
    pub key_from: Option<String>,
    /// Override for the incoming-index key template (one placeholder).
    pub key_to: Option<String>,
}

impl GraphConfig {
    /// Configuration with the given namespace and default key templates.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key_node: None,
            key_data: None,
            key_from: None,
            key_to: None,
        }
    }

    /// Resolved node marker key template.
    pub fn template_node(&self) -> String {
        self.key_node
            .clone()
            .unwrap_or_else(|| format!("{}:node:{{}}", self.namespace))
    }

    /// Resolved edge data key template.
    pub fn template_data(&self) -> String {
        self.key_data
            .clone()
            .unwrap_or_else(|| format!("{}:fromto:{{}}:{{}}", self.namespace))
    }

    /// Resolved outgoing-index key template.
    pub fn template_from(&self) -> String {
        self.key_from
            .clone()
            .unwrap_or_else(|| format!("{}:from:{{}}", self.namespace))
    }

    /// Resolved incoming-index key template.
    pub fn template_to(&self) -> String {
        self.key_to
            .clone()
            .unwrap_or_else(|| format!("{}:to:{{}}", self.namespace))
    }

    /// Channel name change records are published on.
    pub fn channel(&self) -> String {
        format!("{}:changes", self.namespace)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::with_namespace("graph")
    }
}
