//! The `ComponentInvoker` trait — the contract every component fulfils —
//! plus the invocation context and the `Outcome` it produces.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// The result of one node invocation.
///
/// Failure is a routed outcome, not a Rust error: the scheduler follows
/// failure edges where they exist and only escalates when none match.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The node produced an output payload.
    Success(Value),
    /// The node failed with an error text.
    Failure(String),
}

/// Shared context passed to every node invocation within one run.
///
/// Defined here (in the components crate) so both the engine and
/// individual invoker implementations can import it without a circular
/// dependency.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// ID of the parent workflow.
    pub workflow_id: Uuid,
    /// ID of the current run.
    pub run_id: Uuid,
    /// Initial input supplied when the run was requested.
    pub run_input: Value,
    /// Secrets resolved for this workflow by the [`SecretResolver`]
    /// collaborator.  The scheduler never sees raw secret material.
    pub secrets: HashMap<String, String>,
}

/// The core invoker trait.
///
/// One implementation per component kind; an invocation may be a remote
/// call to an external integration platform — the engine treats it as an
/// opaque capability and applies a timeout around it.
#[async_trait]
pub trait ComponentInvoker: Send + Sync {
    /// Invoke the component with the node's resolved configuration and the
    /// previous node's output (or the run input for entry nodes).
    async fn invoke(&self, config: &Value, input: Value, ctx: &InvocationContext) -> Outcome;
}

/// Resolves externally-stored secrets for a workflow.  Injected into the
/// scheduler, which queries it once per run and passes the resolved map
/// through the invocation context.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(&self, workflow_id: Uuid) -> HashMap<String, String>;
}

/// Default resolver for deployments without a secret store.
pub struct NoSecrets;

#[async_trait]
impl SecretResolver for NoSecrets {
    async fn resolve(&self, _workflow_id: Uuid) -> HashMap<String, String> {
        HashMap::new()
    }
}
