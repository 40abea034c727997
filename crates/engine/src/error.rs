//! Engine-level error types.

use thiserror::Error;

/// Errors produced by the workflow model and its store.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Lookup errors ------

    /// No template with this id exists in the catalog.
    #[error("template not found: '{0}'")]
    TemplateNotFound(String),

    /// No workflow with this id exists in the store.
    #[error("workflow not found: '{0}'")]
    WorkflowNotFound(String),

    // ------ Integrity errors ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// A connection references a node ID that doesn't exist in the graph.
    #[error("connection '{connection_id}' references unknown node '{node_id}' ({side} side)")]
    DanglingConnection {
        connection_id: String,
        node_id: String,
        side: &'static str,
    },

    /// A node position with a NaN or infinite coordinate.
    #[error("node position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },

    // ------ Wrapped errors ------

    /// A node was built with an invalid config.
    #[error("invalid node: {0}")]
    InvalidNode(#[from] nodes::NodeError),

    /// Persistence error from the db crate.
    #[error("storage error: {0}")]
    Storage(#[from] db::DbError),
}
