//! Condition expressions for conditional edges.
//!
//! A condition is evaluated against the source node's output payload:
//!
//! ```json
//! { "path": "order.total", "op": "gt", "value": 100 }
//! ```
//!
//! `path` is a dot-separated object path.  A path that resolves to nothing
//! makes every operator except `exists` evaluate false — a missing field
//! never routes a branch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CondOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Exists,
}

/// A condition attached to a conditional edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub path: String,
    pub op: CondOp,
    /// Comparison operand; unused by `exists`.
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    /// Parse a condition from its stored JSON form.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// Evaluate against a node's output payload.
    pub fn evaluate(&self, output: &Value) -> bool {
        let found = lookup(output, &self.path);

        match self.op {
            CondOp::Exists => found.is_some(),
            CondOp::Eq => found.is_some_and(|v| v == &self.value),
            CondOp::Ne => found.is_some_and(|v| v != &self.value),
            CondOp::Gt => compare(found, &self.value).is_some_and(|o| o == std::cmp::Ordering::Greater),
            CondOp::Lt => compare(found, &self.value).is_some_and(|o| o == std::cmp::Ordering::Less),
        }
    }
}

/// Resolve a dot-separated path inside a JSON object tree.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Numeric comparison between a resolved field and the operand.
fn compare(found: Option<&Value>, operand: &Value) -> Option<std::cmp::Ordering> {
    let left = found?.as_f64()?;
    let right = operand.as_f64()?;
    left.partial_cmp(&right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(path: &str, op: CondOp, value: Value) -> Condition {
        Condition { path: path.into(), op, value }
    }

    #[test]
    fn eq_matches_nested_path() {
        let output = json!({ "order": { "status": "paid" } });
        assert!(cond("order.status", CondOp::Eq, json!("paid")).evaluate(&output));
        assert!(!cond("order.status", CondOp::Eq, json!("open")).evaluate(&output));
    }

    #[test]
    fn numeric_comparisons() {
        let output = json!({ "total": 150 });
        assert!(cond("total", CondOp::Gt, json!(100)).evaluate(&output));
        assert!(!cond("total", CondOp::Lt, json!(100)).evaluate(&output));
    }

    #[test]
    fn missing_path_is_false_except_exists() {
        let output = json!({ "a": 1 });
        assert!(!cond("b", CondOp::Eq, json!(1)).evaluate(&output));
        assert!(!cond("b", CondOp::Ne, json!(1)).evaluate(&output));
        assert!(!cond("b", CondOp::Exists, Value::Null).evaluate(&output));
        assert!(cond("a", CondOp::Exists, Value::Null).evaluate(&output));
    }

    #[test]
    fn parses_stored_json_form() {
        let parsed = Condition::from_value(&json!({ "path": "x", "op": "gt", "value": 5 }))
            .expect("condition should parse");
        assert_eq!(parsed, cond("x", CondOp::Gt, json!(5)));
    }
}
