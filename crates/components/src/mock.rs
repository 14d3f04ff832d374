//! `MockInvoker` — a test double for `ComponentInvoker`.
//!
//! Records every input it receives and returns a programmer-specified
//! outcome, so scheduler tests can assert routing without real components.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{ComponentInvoker, InvocationContext, Outcome};

/// Behaviour injected into `MockInvoker` at construction time.
pub enum MockBehaviour {
    /// Succeed with a fixed JSON value.
    Return(Value),
    /// Succeed with the incoming payload unchanged.
    Passthrough,
    /// Fail with an error text.
    Fail(String),
    /// Sleep before succeeding — used to exercise invocation timeouts.
    Delay(Duration, Value),
}

/// A mock invoker that records every call it receives.
pub struct MockInvoker {
    pub behaviour: MockBehaviour,
    /// All inputs seen by this invoker, in call order.
    pub calls: Arc<Mutex<Vec<Value>>>,
}

impl MockInvoker {
    fn with_behaviour(behaviour: MockBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// A mock that always succeeds with the given value.
    pub fn returning(value: Value) -> Arc<Self> {
        Self::with_behaviour(MockBehaviour::Return(value))
    }

    /// A mock that echoes its input.
    pub fn passthrough() -> Arc<Self> {
        Self::with_behaviour(MockBehaviour::Passthrough)
    }

    /// A mock that always fails with the given error text.
    pub fn failing(msg: impl Into<String>) -> Arc<Self> {
        Self::with_behaviour(MockBehaviour::Fail(msg.into()))
    }

    /// A mock that sleeps, then succeeds.
    pub fn delayed(duration: Duration, value: Value) -> Arc<Self> {
        Self::with_behaviour(MockBehaviour::Delay(duration, value))
    }

    /// Number of times this invoker has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock poisoned").len()
    }

    /// The input of the most recent call, if any.
    pub fn last_input(&self) -> Option<Value> {
        self.calls.lock().expect("mock lock poisoned").last().cloned()
    }
}

#[async_trait]
impl ComponentInvoker for MockInvoker {
    async fn invoke(&self, _config: &Value, input: Value, _ctx: &InvocationContext) -> Outcome {
        self.calls.lock().expect("mock lock poisoned").push(input.clone());

        match &self.behaviour {
            MockBehaviour::Return(v) => Outcome::Success(v.clone()),
            MockBehaviour::Passthrough => Outcome::Success(input),
            MockBehaviour::Fail(msg) => Outcome::Failure(msg.clone()),
            MockBehaviour::Delay(duration, v) => {
                tokio::time::sleep(*duration).await;
                Outcome::Success(v.clone())
            }
        }
    }
}
