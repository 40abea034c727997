//! The `ConfigRules` trait: what every node kind knows about its config.

use crate::{NodeConfig, NodeError, NodeKind};

/// Per-kind configuration contract.
///
/// Any key set is legal; implementations only reject well-known keys that
/// carry the wrong JSON type.
pub trait ConfigRules: Send + Sync {
    /// The kind these rules apply to.
    fn kind(&self) -> NodeKind;

    /// Config a newly placed node receives.
    fn defaults(&self) -> NodeConfig;

    /// Check a config map for this kind.
    fn check(&self, config: &NodeConfig) -> Result<(), NodeError>;
}
