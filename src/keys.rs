//! Logical address to store key mapping.
//!
//! Every key the crate touches is produced here, from one template per key
//! role. Nothing in this module performs I/O.

use crate::config::GraphConfig;

/// A logical store address, before template substitution.
///
/// Explicit tags replace shape-sniffing of untyped arguments: each address
/// names its role and carries exactly the IDs that role needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec<'a> {
    /// Node marker key for `id`.
    Node {
        /// Node ID
        id: &'a str,
    },
    /// Outgoing-index key (the set of IDs `pid` points to).
    From {
        /// Publisher node ID
        pid: &'a str,
    },
    /// Incoming-index key (the set of IDs pointing to `sid`).
    To {
        /// Subscriber node ID
        sid: &'a str,
    },
    /// Edge data key for the edge `pid` -> `sid`.
    Data {
        /// Publisher node ID
        pid: &'a str,
        /// Subscriber node ID
        sid: &'a str,
    },
}

/// Pure mapper from [`KeySpec`] to concrete store keys.
///
/// Deterministic and injective as long as caller IDs avoid the template
/// separator (`:` in the defaults); an ID containing the separator can alias
/// another address.
#[derive(Debug, Clone)]
pub struct KeyShaper {
    node: String,
    data: String,
    from: String,
    to: String,
}

impl KeyShaper {
    /// Build a shaper from resolved config templates.
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            node: config.template_node(),
            data: config.template_data(),
            from: config.template_from(),
            to: config.template_to(),
        }
    }

    /// Produce the concrete key for a logical address.
    pub fn shape(&self, spec: KeySpec<'_>) -> String {
        match spec {
            KeySpec::Node { id } => fill(&self.node, &[id]),
            KeySpec::From { pid } => fill(&self.from, &[pid]),
            KeySpec::To { sid } => fill(&self.to, &[sid]),
            KeySpec::Data { pid, sid } => fill(&self.data, &[pid, sid]),
        }
    }
}

impl Default for KeyShaper {
    fn default() -> Self {
        Self::new(&GraphConfig::default())
    }
}

/// Substitute `{}` placeholders left to right in a single pass.
///
/// Placeholders inside substituted arguments are left untouched. Surplus
/// placeholders survive literally; surplus arguments are ignored.
fn fill(template: &str, args: &[&str]) -> String {
    let extra = args.iter().map(|a| a.len()).sum::<usize>();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    let mut args = args.iter();
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
