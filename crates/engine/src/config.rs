//! Store configuration.

/// Tuning knobs for [`crate::WorkflowStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slot key holding the workflow snapshot.
    pub workflows_key: String,
    /// Slot key holding custom templates, when they are persisted.
    pub templates_key: String,
    /// Persist templates saved from workflows across sessions.
    pub persist_custom_templates: bool,
    /// Appended to a template's name when it is instantiated.
    pub copy_suffix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            workflows_key: "workflows".to_owned(),
            templates_key: "workflow-templates".to_owned(),
            persist_custom_templates: false,
            copy_suffix: " Copy".to_owned(),
        }
    }
}
