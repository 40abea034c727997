//! `WorkflowStore`: the single owner of every workflow and template.
//!
//! All operations run synchronously on the caller's thread.  After each
//! successful mutation the full workflow snapshot is written to the durable
//! slot; a failed write is logged and never reported back to the caller.
//!
//! Lookups on a missing id degrade instead of failing: reads return `None`,
//! writes do nothing and return `false`.  The one exception is
//! [`WorkflowStore::create_workflow_from_template`], which reports
//! [`EngineError::TemplateNotFound`].

use tracing::{debug, info, instrument, warn};

use db::{DbError, MemorySlot, SnapshotSlot};
use nodes::NodeStatus;

use crate::config::StoreConfig;
use crate::integrity::check_workflow;
use crate::models::{Connection, Node, Workflow, WorkflowTemplate};
use crate::templates::{builtin_templates, instantiate};
use crate::EngineError;

/// Workflow collection plus template catalog, backed by a snapshot slot.
pub struct WorkflowStore {
    slot: Box<dyn SnapshotSlot>,
    config: StoreConfig,
    workflows: Vec<Workflow>,
    templates: Vec<WorkflowTemplate>,
    /// `templates[..builtin_count]` is the compiled-in catalog.
    builtin_count: usize,
}

impl WorkflowStore {
    /// Load the workflow snapshot from `slot` and seed the template catalog.
    ///
    /// An absent or unparsable snapshot yields an empty collection.
    pub fn open(slot: impl SnapshotSlot + 'static, config: StoreConfig) -> Self {
        let workflows = load_or_default::<Workflow>(&slot, &config.workflows_key);
        for workflow in &workflows {
            if let Err(e) = check_workflow(workflow) {
                warn!(workflow_id = %workflow.id, "loaded workflow is inconsistent: {}", e);
            }
        }

        let mut templates = builtin_templates();
        let builtin_count = templates.len();
        if config.persist_custom_templates {
            for template in load_or_default::<WorkflowTemplate>(&slot, &config.templates_key) {
                if templates_contains(&templates, &template.id) {
                    warn!(template_id = %template.id, "skipping template with a duplicate id");
                    continue;
                }
                templates.push(template);
            }
        }

        info!(
            "opened workflow store with {} workflows and {} templates",
            workflows.len(),
            templates.len()
        );

        Self {
            slot: Box::new(slot),
            config,
            workflows,
            templates,
            builtin_count,
        }
    }

    /// A store backed by a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::open(MemorySlot::new(), StoreConfig::default())
    }

    // -----------------------------------------------------------------------
    // Workflows
    // -----------------------------------------------------------------------

    /// All workflows in store order.
    pub fn list_workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn get_workflow(&self, id: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.id == id)
    }

    /// Create an empty, inactive workflow. The name is not checked.
    pub fn create_workflow(&mut self, name: impl Into<String>) -> Workflow {
        let workflow = Workflow::new(name);
        info!(workflow_id = %workflow.id, "created workflow '{}'", workflow.name);
        self.workflows.push(workflow.clone());
        self.persist();
        workflow
    }

    /// Replace the stored workflow with the same id.
    ///
    /// The input's `updated_at` is ignored and set to now.  Returns `false`
    /// (and changes nothing) if no workflow has that id or one of its nodes
    /// has a non-finite position.
    pub fn update_workflow(&mut self, workflow: Workflow) -> bool {
        if let Some(node) = workflow.nodes.iter().find(|n| !n.position.is_finite()) {
            warn!(
                workflow_id = %workflow.id,
                node_id = %node.id,
                "update with non-finite position ignored"
            );
            return false;
        }
        let Some(existing) = self.workflows.iter_mut().find(|w| w.id == workflow.id) else {
            debug!(workflow_id = %workflow.id, "update of unknown workflow ignored");
            return false;
        };
        let previous = existing.updated_at;
        *existing = workflow;
        existing.updated_at = previous;
        existing.touch();
        self.persist();
        true
    }

    /// Remove a workflow. Deleting an unknown id is a no-op.
    pub fn delete_workflow(&mut self, id: &str) -> bool {
        let before = self.workflows.len();
        self.workflows.retain(|w| w.id != id);
        if self.workflows.len() == before {
            return false;
        }
        info!(workflow_id = %id, "deleted workflow");
        self.persist();
        true
    }

    pub fn activate_workflow(&mut self, id: &str) -> bool {
        self.set_active(id, true)
    }

    pub fn deactivate_workflow(&mut self, id: &str) -> bool {
        self.set_active(id, false)
    }

    fn set_active(&mut self, id: &str, active: bool) -> bool {
        self.mutate(id, |wf| {
            wf.is_active = active;
            true
        })
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Append `node`. The caller supplies its id.
    ///
    /// A node with a non-finite position is refused.
    pub fn add_node(&mut self, workflow_id: &str, node: Node) -> bool {
        if !placeable(workflow_id, &node) {
            return false;
        }
        debug!(workflow_id, node_id = %node.id, "adding {} node", node.kind);
        self.mutate(workflow_id, |wf| {
            wf.nodes.push(node);
            true
        })
    }

    /// Replace the node with the same id. Unknown node ids are ignored, and so
    /// is a node with a non-finite position.
    pub fn update_node(&mut self, workflow_id: &str, node: Node) -> bool {
        if !placeable(workflow_id, &node) {
            return false;
        }
        self.mutate(workflow_id, |wf| match wf.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(existing) => {
                *existing = node;
                true
            }
            None => false,
        })
    }

    /// Set or clear a node's execution-visualization status.
    pub fn update_node_status(
        &mut self,
        workflow_id: &str,
        node_id: &str,
        status: Option<NodeStatus>,
    ) -> bool {
        self.mutate(workflow_id, |wf| match wf.nodes.iter_mut().find(|n| n.id == node_id) {
            Some(node) => {
                node.status = status;
                true
            }
            None => false,
        })
    }

    /// Remove a node together with every connection that references it.
    #[instrument(skip(self))]
    pub fn delete_node(&mut self, workflow_id: &str, node_id: &str) -> bool {
        self.mutate(workflow_id, |wf| wf.remove_node(node_id))
    }

    // -----------------------------------------------------------------------
    // Connections
    // -----------------------------------------------------------------------

    /// Append `connection`. Endpoints are not checked against the node set.
    pub fn add_connection(&mut self, workflow_id: &str, connection: Connection) -> bool {
        debug!(
            workflow_id,
            "connecting {} -> {}", connection.source_id, connection.target_id
        );
        self.mutate(workflow_id, |wf| {
            wf.connections.push(connection);
            true
        })
    }

    pub fn delete_connection(&mut self, workflow_id: &str, connection_id: &str) -> bool {
        self.mutate(workflow_id, |wf| {
            let before = wf.connections.len();
            wf.connections.retain(|c| c.id != connection_id);
            wf.connections.len() != before
        })
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Built-in templates followed by templates saved from workflows.
    pub fn list_templates(&self) -> &[WorkflowTemplate] {
        &self.templates
    }

    pub fn get_template(&self, id: &str) -> Option<&WorkflowTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn templates_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowTemplate> + 'a {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Clone a template into a new workflow with fresh node and connection ids.
    ///
    /// # Errors
    /// [`EngineError::TemplateNotFound`] if no template has `template_id`.
    #[instrument(skip(self))]
    pub fn create_workflow_from_template(
        &mut self,
        template_id: &str,
    ) -> Result<Workflow, EngineError> {
        let template = self
            .get_template(template_id)
            .ok_or_else(|| EngineError::TemplateNotFound(template_id.to_owned()))?;

        let workflow = instantiate(template, &self.config.copy_suffix);
        info!(
            workflow_id = %workflow.id,
            "instantiated '{}' with {} nodes and {} connections",
            workflow.name,
            workflow.nodes.len(),
            workflow.connections.len()
        );

        self.workflows.push(workflow.clone());
        self.persist();
        Ok(workflow)
    }

    /// Snapshot a workflow's graph into a new `Custom` template.
    ///
    /// Returns `None` (and changes nothing) if the workflow is unknown.
    pub fn save_workflow_as_template(
        &mut self,
        workflow_id: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<WorkflowTemplate> {
        let Some(workflow) = self.get_workflow(workflow_id) else {
            debug!(workflow_id, "save-as-template of unknown workflow ignored");
            return None;
        };

        let template = WorkflowTemplate::from_workflow(workflow, name, description);
        info!(
            template_id = %template.id,
            workflow_id,
            "saved workflow as template '{}'",
            template.name
        );

        self.templates.push(template.clone());
        if self.config.persist_custom_templates {
            self.persist_templates();
        }
        Some(template)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Serialize the workflow collection as it is written to the slot.
    pub fn snapshot(&self) -> Result<String, EngineError> {
        encode(&self.workflows)
    }

    /// Parse a snapshot produced by [`WorkflowStore::snapshot`].
    pub fn decode_snapshot(contents: &str) -> Result<Vec<Workflow>, EngineError> {
        serde_json::from_str(contents)
            .map_err(|e| EngineError::Storage(DbError::Serialization(e)))
    }

    /// Apply `f` to one workflow; on change, advance `updated_at` and persist.
    fn mutate<F>(&mut self, workflow_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Workflow) -> bool,
    {
        let Some(workflow) = self.workflows.iter_mut().find(|w| w.id == workflow_id) else {
            debug!(workflow_id, "mutation of unknown workflow ignored");
            return false;
        };
        if !f(workflow) {
            return false;
        }
        workflow.touch();
        self.persist();
        true
    }

    fn persist(&self) {
        let result = encode(&self.workflows)
            .and_then(|json| Ok(self.slot.write(&self.config.workflows_key, &json)?));
        if let Err(e) = result {
            warn!("failed to persist workflows: {}", e);
        }
    }

    fn persist_templates(&self) {
        let custom = &self.templates[self.builtin_count..];
        let result = encode(custom)
            .and_then(|json| Ok(self.slot.write(&self.config.templates_key, &json)?));
        if let Err(e) = result {
            warn!("failed to persist custom templates: {}", e);
        }
    }
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, EngineError> {
    serde_json::to_string(value).map_err(|e| EngineError::Storage(DbError::Serialization(e)))
}

fn placeable(workflow_id: &str, node: &Node) -> bool {
    if node.position.is_finite() {
        return true;
    }
    warn!(workflow_id, node_id = %node.id, "node with non-finite position ignored");
    false
}

fn templates_contains(templates: &[WorkflowTemplate], id: &str) -> bool {
    templates.iter().any(|t| t.id == id)
}

/// Read and parse a JSON array from `key`, falling back to empty.
fn load_or_default<T: serde::de::DeserializeOwned>(slot: &dyn SnapshotSlot, key: &str) -> Vec<T> {
    let contents = match slot.read(key) {
        Ok(Some(contents)) => contents,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, "failed to read slot, starting empty: {}", e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(items) => items,
        Err(e) => {
            warn!(key, "slot content is malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}
