//! Graph integrity check: run this over anything loaded from outside.
//!
//! Rules enforced:
//! 1. Node IDs must be unique within the graph.
//! 2. Every connection must reference existing node IDs on both ends.
//!
//! Cycles, self-loops and parallel connections are all legal.

use std::collections::HashSet;

use crate::models::{Connection, Node, Workflow, WorkflowTemplate};
use crate::EngineError;

/// Validate a node/connection set.
///
/// # Errors
/// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
/// - [`EngineError::DanglingConnection`] if a connection references a missing node.
pub fn check_graph(nodes: &[Node], connections: &[Connection]) -> Result<(), EngineError> {
    let mut node_set: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !node_set.insert(node.id.as_str()) {
            return Err(EngineError::DuplicateNodeId(node.id.clone()));
        }
    }

    for conn in connections {
        for (node_id, side) in [(&conn.source_id, "source"), (&conn.target_id, "target")] {
            if !node_set.contains(node_id.as_str()) {
                return Err(EngineError::DanglingConnection {
                    connection_id: conn.id.clone(),
                    node_id: node_id.clone(),
                    side,
                });
            }
        }
    }

    Ok(())
}

/// [`check_graph`] over a workflow.
pub fn check_workflow(workflow: &Workflow) -> Result<(), EngineError> {
    check_graph(&workflow.nodes, &workflow.connections)
}

/// [`check_graph`] over a template.
pub fn check_template(template: &WorkflowTemplate) -> Result<(), EngineError> {
    check_graph(&template.nodes, &template.connections)
}
