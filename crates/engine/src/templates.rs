//! Built-in template catalog and template instantiation.
//!
//! Every built-in template has the same shape:
//!
//! ```text
//! start → trigger → condition ─Yes→ action ─┐
//!                             └─No──→ action ─┴→ end
//! ```

use std::collections::HashMap;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use nodes::{NodeConfig, NodeKind};

use crate::models::{new_id, Connection, Node, Position, Workflow, WorkflowTemplate};

pub const LOAN_APPROVAL: &str = "template-loan-approval";
pub const DOCUMENT_VERIFICATION: &str = "template-document-verification";
pub const PAYMENT_REMINDER: &str = "template-payment-reminder";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Branch of a catalog template: name and config of one action node.
struct Branch {
    name: &'static str,
    config: Value,
}

struct Blueprint {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    trigger: (&'static str, Value),
    condition: (&'static str, &'static str),
    yes: Branch,
    no: Branch,
}

/// The templates compiled into the application.
pub fn builtin_templates() -> Vec<WorkflowTemplate> {
    vec![
        build(Blueprint {
            id: LOAN_APPROVAL,
            name: "Loan Approval Process",
            description: "Automated loan approval workflow with credit checks",
            category: "Credit Processing",
            trigger: ("Application Received", json!({ "eventType": "loan_application_submitted" })),
            condition: ("Credit Score Check", "creditScore >= 700"),
            yes: Branch {
                name: "Approve Loan",
                config: json!({ "actionType": "update_status", "status": "approved" }),
            },
            no: Branch {
                name: "Request Manual Review",
                config: json!({ "actionType": "assign_reviewer", "team": "underwriting" }),
            },
        }),
        build(Blueprint {
            id: DOCUMENT_VERIFICATION,
            name: "Document Verification",
            description: "Verify uploaded documents and request resubmission when checks fail",
            category: "Document Management",
            trigger: ("Document Uploaded", json!({ "eventType": "document_uploaded" })),
            condition: ("Document Valid?", "document.verified == true"),
            yes: Branch {
                name: "Mark Document Approved",
                config: json!({ "actionType": "update_document_status", "status": "approved" }),
            },
            no: Branch {
                name: "Request Resubmission",
                config: json!({
                    "actionType": "send_email",
                    "recipients": ["borrower"],
                    "template": "document_resubmission",
                }),
            },
        }),
        build(Blueprint {
            id: PAYMENT_REMINDER,
            name: "Payment Reminder",
            description: "Remind borrowers ahead of upcoming payment due dates",
            category: "Notifications",
            trigger: ("Payment Due", json!({ "eventType": "payment_due" })),
            condition: ("Due Within 3 Days?", "daysUntilDue <= 3"),
            yes: Branch {
                name: "Send SMS Reminder",
                config: json!({ "actionType": "send_sms", "recipients": ["borrower"] }),
            },
            no: Branch {
                name: "Schedule Email Reminder",
                config: json!({
                    "actionType": "send_email",
                    "recipients": ["borrower"],
                    "delayMinutes": 1440,
                }),
            },
        }),
    ]
}

fn config(value: Value) -> NodeConfig {
    match value {
        Value::Object(map) => map,
        _ => NodeConfig::new(),
    }
}

fn node(id: &str, kind: NodeKind, name: &str, x: f64, y: f64, cfg: Value) -> Node {
    let mut node = Node::new(kind, name, Position::new(x, y)).with_id(id);
    node.config = config(cfg);
    node
}

fn build(bp: Blueprint) -> WorkflowTemplate {
    let (trigger_name, trigger_cfg) = bp.trigger;
    let (condition_name, expression) = bp.condition;

    let nodes = vec![
        node("1", NodeKind::Start, "Start", 100.0, 200.0, json!({})),
        node("2", NodeKind::Trigger, trigger_name, 300.0, 200.0, trigger_cfg),
        node(
            "3",
            NodeKind::Condition,
            condition_name,
            500.0,
            200.0,
            json!({ "condition": expression }),
        ),
        node("4", NodeKind::Action, bp.yes.name, 700.0, 100.0, bp.yes.config),
        node("5", NodeKind::Action, bp.no.name, 700.0, 300.0, bp.no.config),
        node("6", NodeKind::End, "End", 900.0, 200.0, json!({})),
    ];

    let connections = vec![
        Connection::new("1", "2").with_id("e1-2"),
        Connection::new("2", "3").with_id("e2-3"),
        Connection::new("3", "4")
            .with_id("e3-4")
            .with_label("Yes")
            .with_condition(expression),
        Connection::new("3", "5")
            .with_id("e3-5")
            .with_label("No")
            .with_condition(format!("!({expression})")),
        Connection::new("4", "6").with_id("e4-6"),
        Connection::new("5", "6").with_id("e5-6"),
    ];

    WorkflowTemplate {
        id: bp.id.to_owned(),
        name: bp.name.to_owned(),
        description: bp.description.to_owned(),
        category: bp.category.to_owned(),
        nodes,
        connections,
        created_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Instantiation
// ---------------------------------------------------------------------------

/// Clone `template` into a new, inactive workflow with fresh identities.
///
/// Node `i` of the template becomes node `i` of the workflow; connection
/// endpoints are rewritten through the old→new id map.  An endpoint that is
/// not a template node keeps its original id and is logged.
pub fn instantiate(template: &WorkflowTemplate, copy_suffix: &str) -> Workflow {
    let mut id_map: HashMap<&str, String> = HashMap::with_capacity(template.nodes.len());

    let nodes: Vec<Node> = template
        .nodes
        .iter()
        .map(|node| {
            let fresh = new_id();
            id_map.insert(node.id.as_str(), fresh.clone());
            Node {
                id: fresh,
                ..node.clone()
            }
        })
        .collect();

    let remap = |old: &str, connection_id: &str| -> String {
        match id_map.get(old) {
            Some(fresh) => fresh.clone(),
            None => {
                warn!(
                    template_id = %template.id,
                    connection_id,
                    "connection endpoint '{}' is not a template node; keeping it as-is",
                    old
                );
                old.to_owned()
            }
        }
    };

    let connections: Vec<Connection> = template
        .connections
        .iter()
        .map(|conn| Connection {
            id: new_id(),
            source_id: remap(&conn.source_id, &conn.id),
            target_id: remap(&conn.target_id, &conn.id),
            label: conn.label.clone(),
            condition: conn.condition.clone(),
        })
        .collect();

    let mut workflow = Workflow::new(format!("{}{}", template.name, copy_suffix));
    workflow.description = template.description.clone();
    workflow.nodes = nodes;
    workflow.connections = connections;
    workflow
}
