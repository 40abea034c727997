//! Node kind and status tags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{rules_for, NodeError};

/// Open, kind-dependent configuration attached to every node.
pub type NodeConfig = Map<String, Value>;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// The role a node plays in a workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Trigger,
    Action,
    Condition,
    End,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Trigger,
        NodeKind::Action,
        NodeKind::Condition,
        NodeKind::End,
    ];

    /// Configuration a freshly placed node of this kind starts with.
    pub fn default_config(self) -> NodeConfig {
        rules_for(self).defaults()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Trigger => "trigger",
            Self::Action => "action",
            Self::Condition => "condition",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = NodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start"     => Ok(Self::Start),
            "trigger"   => Ok(Self::Trigger),
            "action"    => Ok(Self::Action),
            "condition" => Ok(Self::Condition),
            "end"       => Ok(Self::End),
            other       => Err(NodeError::UnknownKind(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// NodeStatus
// ---------------------------------------------------------------------------

/// Execution-visualization state of a node. Never changed by the model itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Idle,
    Running,
    Completed,
    Error,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle      => write!(f, "idle"),
            Self::Running   => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Error     => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for NodeStatus {
    type Err = NodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle"      => Ok(Self::Idle),
            "running"   => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "error"     => Ok(Self::Error),
            other       => Err(NodeError::UnknownStatus(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_its_tag() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.to_string().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            "loop".parse::<NodeKind>(),
            Err(NodeError::UnknownKind("loop".into()))
        );
    }

    #[test]
    fn kind_serializes_as_lowercase_tag() {
        assert_eq!(serde_json::to_value(NodeKind::Condition).unwrap(), "condition");
        let parsed: NodeStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, NodeStatus::Completed);
    }
}
