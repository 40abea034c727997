//! `nodes` crate: the closed set of workflow node kinds and the rules for
//! their configuration.
//!
//! A node's `config` is an open JSON object whose shape depends on its kind.
//! Every kind implements [`ConfigRules`]; builders call [`validate_config`]
//! at the point where a node is placed or edited.

pub mod error;
pub mod kind;
pub mod rules;
pub mod traits;

pub use error::NodeError;
pub use kind::{NodeConfig, NodeKind, NodeStatus};
pub use rules::{rules_for, validate_config};
pub use traits::ConfigRules;
