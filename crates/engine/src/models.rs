//! Core domain models for the workflow graph.
//!
//! These types are the source of truth for what a workflow looks like in
//! memory and in the durable slot.  Field names serialise in camelCase
//! (`sourceId`, `isActive`, `updatedAt`, ...) and a node's kind is written
//! under `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nodes::{validate_config, NodeConfig, NodeError, NodeKind, NodeStatus};

use crate::EngineError;

/// Allocate a fresh, globally unique identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Canvas coordinates. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Like [`Position::new`], but rejects NaN and infinite coordinates.
    ///
    /// # Errors
    /// [`EngineError::NonFinitePosition`] if either coordinate is not finite.
    pub fn try_new(x: f64, y: f64) -> Result<Self, EngineError> {
        let position = Self::new(x, y);
        if !position.is_finite() {
            return Err(EngineError::NonFinitePosition { x, y });
        }
        Ok(position)
    }

    /// JSON has no NaN or infinity; only finite positions survive a snapshot.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A typed vertex in a workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable for the lifetime of the node; referenced by connections.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub config: NodeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl Node {
    /// A freshly placed node: new id, the kind's default config, no status.
    pub fn new(kind: NodeKind, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: new_id(),
            kind,
            name: name.into(),
            position,
            config: kind.default_config(),
            status: None,
        }
    }

    /// Replace the id. Used for template-local ids.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the config after checking it against the kind's rules.
    ///
    /// # Errors
    /// [`NodeError::InvalidConfig`] if a well-known key has the wrong type.
    pub fn with_config(mut self, config: NodeConfig) -> Result<Self, NodeError> {
        validate_config(self.kind, &config)?;
        self.config = config;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Directed edge between two nodes of the same workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-text expression; never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Connection {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: None,
            condition: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// True if either endpoint is `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A workflow graph: nodes in creation order plus their connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    /// Display flag only; nothing runs when it flips.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Empty, inactive workflow stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn connection(&self, connection_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    /// Remove `node_id` and every connection touching it in one step.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        let before = (self.nodes.len(), self.connections.len());
        self.nodes.retain(|n| n.id != node_id);
        self.connections.retain(|c| !c.touches(node_id));
        before != (self.nodes.len(), self.connections.len())
    }

    /// Advance `updated_at` to now, never backwards.
    pub(crate) fn touch(&mut self) {
        self.updated_at = self.updated_at.max(Utc::now());
    }
}

// ---------------------------------------------------------------------------
// WorkflowTemplate
// ---------------------------------------------------------------------------

/// Category assigned to templates saved from a workflow.
pub const CUSTOM_CATEGORY: &str = "Custom";

/// Reusable graph blueprint. Its node and connection ids are template-local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub created_at: DateTime<Utc>,
}

impl WorkflowTemplate {
    /// Snapshot `workflow`'s current graph into a new `Custom` template.
    ///
    /// The template owns copies; later edits to the workflow do not reach it.
    pub fn from_workflow(
        workflow: &Workflow,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description: description.into(),
            category: CUSTOM_CATEGORY.to_owned(),
            nodes: workflow.nodes.clone(),
            connections: workflow.connections.clone(),
            created_at: Utc::now(),
        }
    }
}
