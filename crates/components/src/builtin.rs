//! Built-in local invokers, one per component kind.
//!
//! These cover self-contained deployments and tests.  Their contract is
//! deliberately small: payloads flow through unchanged except where the
//! node configuration says otherwise.  Deployments that delegate to a
//! remote integration platform register their own invokers instead.

use async_trait::async_trait;
use serde_json::Value;

use crate::{ComponentInvoker, InvocationContext, Outcome};

/// Merge `overlay`'s keys into `base` (overlay wins).  Non-object inputs
/// are replaced wholesale.
fn merge(base: Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (k, v) in overlay_map {
                base_map.insert(k.clone(), v.clone());
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Entry point of a workflow.  Emits the incoming payload, with any
/// `defaults` object from the node configuration filled in underneath it.
pub struct InputInvoker;

#[async_trait]
impl ComponentInvoker for InputInvoker {
    async fn invoke(&self, config: &Value, input: Value, _ctx: &InvocationContext) -> Outcome {
        let output = match config.get("defaults") {
            Some(defaults) => merge(defaults.clone(), &input),
            None => input,
        };
        Outcome::Success(output)
    }
}

/// Transformation step.  Applies the `set` object from the node
/// configuration over the incoming payload.
pub struct ProcessInvoker;

#[async_trait]
impl ComponentInvoker for ProcessInvoker {
    async fn invoke(&self, config: &Value, input: Value, _ctx: &InvocationContext) -> Outcome {
        let output = match config.get("set") {
            Some(patch) => merge(input, patch),
            None => input,
        };
        Outcome::Success(output)
    }
}

/// Terminal sink.  Passes the payload through so it lands in the run's
/// aggregate output.
pub struct OutputInvoker;

#[async_trait]
impl ComponentInvoker for OutputInvoker {
    async fn invoke(&self, _config: &Value, input: Value, _ctx: &InvocationContext) -> Outcome {
        Outcome::Success(input)
    }
}

/// Branch point.  The payload passes through untouched; the conditional
/// edges leaving the node do the actual routing.
pub struct DecisionInvoker;

#[async_trait]
impl ComponentInvoker for DecisionInvoker {
    async fn invoke(&self, _config: &Value, input: Value, _ctx: &InvocationContext) -> Outcome {
        Outcome::Success(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn ctx() -> InvocationContext {
        InvocationContext {
            workflow_id: Uuid::new_v4(),
            run_id: Uuid::new_v4(),
            run_input: json!({}),
            secrets: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn input_merges_defaults_under_payload() {
        let config = json!({ "defaults": { "region": "eu", "x": 0 } });
        let outcome = InputInvoker
            .invoke(&config, json!({ "x": 1 }), &ctx())
            .await;
        assert_eq!(outcome, Outcome::Success(json!({ "region": "eu", "x": 1 })));
    }

    #[tokio::test]
    async fn process_applies_set_patch() {
        let config = json!({ "set": { "stage": "transformed" } });
        let outcome = ProcessInvoker
            .invoke(&config, json!({ "x": 1 }), &ctx())
            .await;
        assert_eq!(
            outcome,
            Outcome::Success(json!({ "x": 1, "stage": "transformed" }))
        );
    }

    #[tokio::test]
    async fn output_passes_payload_through() {
        let outcome = OutputInvoker
            .invoke(&json!({}), json!({ "done": true }), &ctx())
            .await;
        assert_eq!(outcome, Outcome::Success(json!({ "done": true })));
    }
}
