//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Domain types (the graph, edge kinds, conditions) live in the `engine`
//! crate; catalog types (kinds, schemas) live in the `components` crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// components
// ---------------------------------------------------------------------------

/// A catalog entry: a reusable typed unit that workflow nodes reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComponentRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// One of `input` / `process` / `output` / `decision`.
    pub kind: String,
    /// Structural description of permitted configuration keys and types.
    pub configuration_schema: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// workflows
// ---------------------------------------------------------------------------

/// A persisted workflow row.  Nodes and edges live in their own tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkflowRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: String,
    pub version: String,
    pub is_active: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// workflow_nodes
// ---------------------------------------------------------------------------

/// A component instance placed in a workflow's graph.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NodeRow {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub component_id: Uuid,
    /// Canvas coordinates — display-only, opaque to execution.
    pub position_x: f64,
    pub position_y: f64,
    pub configuration: serde_json::Value,
    /// Display/tie-break hint; execution order is graph-driven.
    pub ord: i64,
    pub created_at: DateTime<Utc>,
}

/// `NodeRow` joined with the referenced component's kind, as loaded for
/// execution.
#[derive(Debug, Clone, FromRow)]
pub struct NodeDetailRow {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub component_id: Uuid,
    pub position_x: f64,
    pub position_y: f64,
    pub configuration: serde_json::Value,
    pub ord: i64,
    pub component_kind: String,
}

// ---------------------------------------------------------------------------
// workflow_edges
// ---------------------------------------------------------------------------

/// A directed, typed connection between two nodes of the same workflow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EdgeRow {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub source_node_id: Uuid,
    pub target_node_id: Uuid,
    /// One of `success` / `failure` / `conditional`.
    pub kind: String,
    /// Condition expression, present only on conditional edges.
    pub condition: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// workflow_runs
// ---------------------------------------------------------------------------

/// Possible statuses for a workflow run and its per-node logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown run status: {other}")),
        }
    }
}

/// A persisted workflow run (one invocation of a workflow).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RunRow {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub status: String,
    pub input: serde_json::Value,
    /// Set only when the run completed.
    pub output: Option<serde_json::Value>,
    /// Set only when the run failed.
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// component_run_logs
// ---------------------------------------------------------------------------

/// A persisted per-node execution log within a run.  Append-only: opened
/// at node entry, finalized once at node exit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComponentLogRow {
    pub id: Uuid,
    pub run_id: Uuid,
    pub node_id: Uuid,
    pub status: String,
    pub input: serde_json::Value,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
