//! Built-in [`ConfigRules`] for each node kind.
//!
//! Well-known keys per kind:
//! - trigger:   `eventType` (string)
//! - condition: `condition` (string expression, uninterpreted)
//! - action:    `actionType` (string), `recipients` (array), `delayMinutes` (number >= 0)
//!
//! start and end nodes carry no well-known keys.

use serde_json::{json, Value};

use crate::{ConfigRules, NodeConfig, NodeError, NodeKind};

/// Return the rules for `kind`.
pub fn rules_for(kind: NodeKind) -> &'static dyn ConfigRules {
    match kind {
        NodeKind::Start => &START,
        NodeKind::End => &END,
        NodeKind::Trigger => &TriggerRules,
        NodeKind::Condition => &ConditionRules,
        NodeKind::Action => &ActionRules,
    }
}

/// Check `config` against the rules for `kind`.
///
/// # Errors
/// [`NodeError::InvalidConfig`] naming the first offending key.
pub fn validate_config(kind: NodeKind, config: &NodeConfig) -> Result<(), NodeError> {
    rules_for(kind).check(config)
}

// ---------------------------------------------------------------------------
// Type checks
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Expect {
    String,
    Array,
    NonNegativeNumber,
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Expect::String => "a string",
            Expect::Array => "an array",
            Expect::NonNegativeNumber => "a non-negative number",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Expect::String => value.is_string(),
            Expect::Array => value.is_array(),
            Expect::NonNegativeNumber => value.as_f64().is_some_and(|n| n >= 0.0),
        }
    }
}

fn check_keys(
    kind: NodeKind,
    config: &NodeConfig,
    keys: &[(&str, Expect)],
) -> Result<(), NodeError> {
    for &(key, expect) in keys {
        match config.get(key) {
            Some(value) if !expect.accepts(value) => {
                return Err(NodeError::InvalidConfig {
                    kind,
                    key: key.to_owned(),
                    expected: expect.describe(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

fn object(value: Value) -> NodeConfig {
    match value {
        Value::Object(map) => map,
        _ => NodeConfig::new(),
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// start / end markers.
struct MarkerRules(NodeKind);

static START: MarkerRules = MarkerRules(NodeKind::Start);
static END: MarkerRules = MarkerRules(NodeKind::End);

impl ConfigRules for MarkerRules {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn defaults(&self) -> NodeConfig {
        NodeConfig::new()
    }

    fn check(&self, _config: &NodeConfig) -> Result<(), NodeError> {
        Ok(())
    }
}

struct TriggerRules;

impl ConfigRules for TriggerRules {
    fn kind(&self) -> NodeKind {
        NodeKind::Trigger
    }

    fn defaults(&self) -> NodeConfig {
        object(json!({ "eventType": "loan_created" }))
    }

    fn check(&self, config: &NodeConfig) -> Result<(), NodeError> {
        check_keys(self.kind(), config, &[("eventType", Expect::String)])
    }
}

struct ConditionRules;

impl ConfigRules for ConditionRules {
    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }

    fn defaults(&self) -> NodeConfig {
        object(json!({ "condition": "" }))
    }

    fn check(&self, config: &NodeConfig) -> Result<(), NodeError> {
        check_keys(self.kind(), config, &[("condition", Expect::String)])
    }
}

struct ActionRules;

impl ConfigRules for ActionRules {
    fn kind(&self) -> NodeKind {
        NodeKind::Action
    }

    fn defaults(&self) -> NodeConfig {
        object(json!({ "actionType": "notification" }))
    }

    fn check(&self, config: &NodeConfig) -> Result<(), NodeError> {
        check_keys(
            self.kind(),
            config,
            &[
                ("actionType", Expect::String),
                ("recipients", Expect::Array),
                ("delayMinutes", Expect::NonNegativeNumber),
            ],
        )
    }
}
