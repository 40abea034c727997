//! `engine` crate: the workflow graph model, the template catalog, and the
//! store that owns them.

pub mod config;
pub mod error;
pub mod integrity;
pub mod models;
pub mod store;
pub mod templates;

pub use config::StoreConfig;
pub use error::EngineError;
pub use integrity::{check_graph, check_template, check_workflow};
pub use models::{Connection, Node, Position, Workflow, WorkflowTemplate, CUSTOM_CATEGORY};
pub use store::WorkflowStore;
pub use nodes::{NodeConfig, NodeKind, NodeStatus};
