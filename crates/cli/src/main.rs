//! `loanflow` CLI entry-point.
//!
//! Every workflow-store operation is exposed as a sub-command against a
//! file-backed slot in the data directory.  Results are printed to stdout as
//! JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db::FileSlot;
use engine::{Connection, EngineError, Node, Position, StoreConfig, WorkflowStore};
use nodes::{NodeConfig, NodeKind, NodeStatus};

#[derive(Parser)]
#[command(
    name = "loanflow",
    about = "Build and manage loan-processing workflow graphs",
    version
)]
struct Cli {
    /// Directory holding the workflow snapshot (default: ~/.loanflow).
    #[arg(long, global = true, env = "LOANFLOW_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep templates saved from workflows across runs.
    #[arg(long, global = true, env = "LOANFLOW_PERSIST_TEMPLATES")]
    persist_templates: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all workflows.
    List,
    /// Print one workflow.
    Show { workflow_id: String },
    /// Create an empty workflow.
    Create { name: String },
    /// Rename a workflow or change its description.
    Update {
        workflow_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a workflow.
    Delete { workflow_id: String },
    /// Mark a workflow active.
    Activate { workflow_id: String },
    /// Mark a workflow inactive.
    Deactivate { workflow_id: String },
    /// Add a node to a workflow.
    AddNode {
        workflow_id: String,
        #[arg(long)]
        kind: NodeKind,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        /// JSON object replacing the kind's default config.
        #[arg(long)]
        config: Option<String>,
    },
    /// Edit an existing node.
    UpdateNode {
        workflow_id: String,
        node_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        x: Option<f64>,
        #[arg(long)]
        y: Option<f64>,
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        status: Option<NodeStatus>,
    },
    /// Remove a node and every connection touching it.
    RemoveNode { workflow_id: String, node_id: String },
    /// Connect two nodes.
    Connect {
        workflow_id: String,
        source_id: String,
        target_id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        condition: Option<String>,
    },
    /// Remove a connection.
    Disconnect { workflow_id: String, connection_id: String },
    /// List templates, optionally by category.
    Templates {
        #[arg(long)]
        category: Option<String>,
    },
    /// Create a workflow from a template.
    Instantiate { template_id: String },
    /// Save a workflow's graph as a custom template.
    SaveTemplate {
        workflow_id: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loanflow=info,engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::home_dir()
            .context("could not determine home directory")?
            .join(".loanflow"),
    };
    info!("using data directory {}", data_dir.display());

    let config = StoreConfig {
        persist_custom_templates: cli.persist_templates,
        ..StoreConfig::default()
    };
    let mut store = WorkflowStore::open(FileSlot::new(data_dir), config);

    run(&mut store, cli.command)
}

fn run(store: &mut WorkflowStore, command: Command) -> Result<()> {
    match command {
        Command::List => print(store.list_workflows()),
        Command::Show { workflow_id } => print(require(store, &workflow_id)?),
        Command::Create { name } => print(&store.create_workflow(name)),
        Command::Update { workflow_id, name, description } => {
            let mut workflow = require(store, &workflow_id)?.clone();
            if let Some(name) = name {
                workflow.name = name;
            }
            if let Some(description) = description {
                workflow.description = description;
            }
            applied(store.update_workflow(workflow), &workflow_id)?;
            print(require(store, &workflow_id)?)
        }
        Command::Delete { workflow_id } => {
            if !store.delete_workflow(&workflow_id) {
                info!("workflow '{workflow_id}' was already absent");
            }
            Ok(())
        }
        Command::Activate { workflow_id } => {
            applied(store.activate_workflow(&workflow_id), &workflow_id)?;
            print(require(store, &workflow_id)?)
        }
        Command::Deactivate { workflow_id } => {
            applied(store.deactivate_workflow(&workflow_id), &workflow_id)?;
            print(require(store, &workflow_id)?)
        }
        Command::AddNode { workflow_id, kind, name, x, y, config } => {
            require(store, &workflow_id)?;
            let mut node = Node::new(kind, name, Position::try_new(x, y)?);
            if let Some(raw) = config {
                node = node.with_config(parse_config(&raw)?)?;
            }
            store.add_node(&workflow_id, node.clone());
            print(&node)
        }
        Command::UpdateNode { workflow_id, node_id, name, x, y, config, status } => {
            let workflow = require(store, &workflow_id)?;
            let Some(existing) = workflow.node(&node_id) else {
                bail!("node '{node_id}' not found in workflow '{workflow_id}'");
            };

            let mut node = existing.clone();
            if let Some(name) = name {
                node.name = name;
            }
            node.position = Position::try_new(
                x.unwrap_or(node.position.x),
                y.unwrap_or(node.position.y),
            )?;
            if let Some(raw) = config {
                node = node.with_config(parse_config(&raw)?)?;
            }
            if status.is_some() {
                node.status = status;
            }

            store.update_node(&workflow_id, node.clone());
            print(&node)
        }
        Command::RemoveNode { workflow_id, node_id } => {
            require(store, &workflow_id)?;
            if !store.delete_node(&workflow_id, &node_id) {
                info!("node '{node_id}' was already absent");
            }
            print(require(store, &workflow_id)?)
        }
        Command::Connect { workflow_id, source_id, target_id, label, condition } => {
            let workflow = require(store, &workflow_id)?;
            for endpoint in [&source_id, &target_id] {
                if workflow.node(endpoint).is_none() {
                    bail!("node '{endpoint}' not found in workflow '{workflow_id}'");
                }
            }

            let mut connection = Connection::new(source_id, target_id);
            connection.label = label;
            connection.condition = condition;
            store.add_connection(&workflow_id, connection.clone());
            print(&connection)
        }
        Command::Disconnect { workflow_id, connection_id } => {
            require(store, &workflow_id)?;
            if !store.delete_connection(&workflow_id, &connection_id) {
                info!("connection '{connection_id}' was already absent");
            }
            print(require(store, &workflow_id)?)
        }
        Command::Templates { category } => match category {
            Some(category) => print(&store.templates_in_category(&category).collect::<Vec<_>>()),
            None => print(store.list_templates()),
        },
        Command::Instantiate { template_id } => {
            print(&store.create_workflow_from_template(&template_id)?)
        }
        Command::SaveTemplate { workflow_id, name, description } => {
            match store.save_workflow_as_template(&workflow_id, name, description) {
                Some(template) => print(&template),
                None => Err(EngineError::WorkflowNotFound(workflow_id).into()),
            }
        }
    }
}

fn require<'a>(store: &'a WorkflowStore, workflow_id: &str) -> Result<&'a engine::Workflow> {
    store
        .get_workflow(workflow_id)
        .ok_or_else(|| EngineError::WorkflowNotFound(workflow_id.to_owned()).into())
}

fn applied(applied: bool, workflow_id: &str) -> Result<()> {
    if !applied {
        return Err(EngineError::WorkflowNotFound(workflow_id.to_owned()).into());
    }
    Ok(())
}

fn parse_config(raw: &str) -> Result<NodeConfig> {
    serde_json::from_str(raw).with_context(|| format!("--config must be a JSON object: {raw}"))
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
