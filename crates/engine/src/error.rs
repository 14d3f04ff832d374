//! Engine-level error types.

use components::{ComponentKind, ConfigError};
use ledger::LedgerError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::EdgeKind;

/// Errors produced by the workflow engine (graph mutations, validation,
/// and execution).
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Structural errors (rejected before anything is persisted) ------

    /// A node's configuration does not satisfy its component's schema.
    #[error("invalid node configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// An edge's endpoints belong to different workflows.
    #[error("edge endpoints belong to different workflows")]
    CrossWorkflowEdge,

    /// The source node already has an outgoing edge of this kind.
    /// Only conditional edges may fan out from one node.
    #[error("source node already has an outgoing {kind} edge")]
    DuplicateEdgeKind { kind: EdgeKind },

    /// A conditional edge was submitted without a condition.
    #[error("conditional edge requires a condition")]
    MissingCondition,

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(Uuid),

    /// An edge references a node ID that doesn't exist in the workflow.
    #[error("edge references unknown node '{node_id}' ({side} side)")]
    UnknownNodeReference { node_id: Uuid, side: &'static str },

    /// The workflow has no entry nodes, so no run could ever make progress.
    #[error("workflow graph has no entry nodes")]
    EmptyGraph,

    /// The success/failure subgraph contains a cycle.  Cycles are legal
    /// only through conditional edges, where the per-run visited set
    /// bounds them.
    #[error("workflow graph contains a cycle outside conditional edges")]
    CycleDetected,

    // ------ Referential / policy errors ------

    #[error("workflow not found")]
    WorkflowNotFound,

    #[error("component not found")]
    ComponentNotFound,

    /// The catalog entry is deactivated; new nodes may not reference it.
    #[error("component is deactivated")]
    ComponentInactive,

    /// The workflow has a run in `pending`/`running` state; mutating its
    /// graph mid-run is disallowed.
    #[error("workflow has a run in progress")]
    WorkflowBusy,

    #[error("workflow is not active")]
    WorkflowInactive,

    /// Another workflow of the same organization already uses this name.
    #[error("workflow name already used in this organization")]
    NameTaken,

    // ------ Execution errors ------

    /// No invoker is registered for the node's component kind.
    #[error("no invoker registered for component kind '{0}'")]
    InvokerMissing(ComponentKind),

    /// A failure outcome had no matching failure/conditional edge; the
    /// whole run is terminated with the node's error text.
    #[error("unhandled failure at node '{node_id}': {message}")]
    UnhandledFailure { node_id: Uuid, message: String },

    /// A stored row could not be mapped back to a domain value.
    #[error("malformed stored record: {0}")]
    MalformedRecord(String),

    /// Persistence error from the ledger crate.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
