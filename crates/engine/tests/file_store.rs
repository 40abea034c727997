//! End-to-end store tests against a real `FileSlot` in a temp directory.

use db::FileSlot;
use engine::templates::{DOCUMENT_VERIFICATION, LOAN_APPROVAL};
use engine::{check_workflow, Connection, Node, NodeKind, Position, StoreConfig, WorkflowStore};

fn open(dir: &tempfile::TempDir) -> WorkflowStore {
    WorkflowStore::open(FileSlot::new(dir.path()), StoreConfig::default())
}

#[test]
fn workflows_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (built, expected) = {
        let mut store = open(&dir);
        let wf = store.create_workflow("Intake");
        let start = Node::new(NodeKind::Start, "Start", Position::new(0.0, 0.0));
        let review = Node::new(NodeKind::Action, "Review", Position::new(200.0, 0.0));
        store.add_node(&wf.id, start.clone());
        store.add_node(&wf.id, review.clone());
        store.add_connection(&wf.id, Connection::new(&start.id, &review.id).with_label("ok"));
        store.activate_workflow(&wf.id);
        store.create_workflow_from_template(LOAN_APPROVAL).unwrap();
        (wf.id, store.list_workflows().to_vec())
    };

    let reopened = open(&dir);
    assert_eq!(reopened.list_workflows(), expected.as_slice());
    assert!(reopened.get_workflow(&built).unwrap().is_active);
}

#[test]
fn snapshot_on_disk_uses_camel_case_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir);
    store.create_workflow_from_template(DOCUMENT_VERIFICATION).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("workflows.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let wf = &value[0];

    assert_eq!(wf["isActive"], false);
    assert!(wf["createdAt"].is_string());
    assert!(wf["updatedAt"].is_string());
    assert_eq!(wf["nodes"][0]["type"], "start");
    assert!(wf["connections"][0]["sourceId"].is_string());
    assert!(wf["connections"][0]["targetId"].is_string());
}

#[test]
fn corrupt_file_is_recovered_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("workflows.json"), "[{\"id\": 1").unwrap();

    let mut store = open(&dir);
    assert!(store.list_workflows().is_empty());

    let wf = store.create_workflow_from_template(LOAN_APPROVAL).unwrap();
    check_workflow(&wf).unwrap();
    assert_eq!(open(&dir).list_workflows().len(), 1);
}
