//! Node-level error type.

use thiserror::Error;

use crate::NodeKind;

/// Errors raised while building or editing a node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A well-known config key holds a value of the wrong JSON type.
    #[error("{kind} node config key '{key}' must be {expected}")]
    InvalidConfig {
        kind: NodeKind,
        key: String,
        expected: &'static str,
    },

    /// A kind tag outside `start | trigger | action | condition | end`.
    #[error("unknown node kind: '{0}'")]
    UnknownKind(String),

    /// A status tag outside `idle | running | completed | error`.
    #[error("unknown node status: '{0}'")]
    UnknownStatus(String),
}
