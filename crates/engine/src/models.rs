//! Core domain model for workflow graphs.
//!
//! These types are the in-memory source of truth during validation and
//! execution.  They are assembled from the relational rows in the `ledger`
//! crate and serialise cleanly, so a workflow can be exported and
//! re-imported without changing run behaviour.

use chrono::{DateTime, Utc};
use components::ComponentKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::condition::Condition;

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// How an edge is selected after its source node produces an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Followed when the source node succeeds.
    Success,
    /// Followed when the source node fails — catches the failure.
    Failure,
    /// Followed when its condition evaluates true against the source
    /// node's output.  Several conditional edges may leave one node.
    Conditional,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Conditional => write!(f, "conditional"),
        }
    }
}

impl std::str::FromStr for EdgeKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "conditional" => Ok(Self::Conditional),
            other => Err(format!("unknown edge kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Canvas coordinates.  Display-only; execution never reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A component instance placed in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    /// Catalog entry this node instantiates.
    pub component_id: Uuid,
    /// Kind of the referenced component, resolved at load time so the
    /// scheduler can pick an invoker without another catalog lookup.
    pub component_kind: ComponentKind,
    /// Instance configuration, validated against the component's schema
    /// when the node was added.
    pub config: Value,
    pub position: Position,
    /// Display/tie-break hint only — execution order is graph-driven.
    pub order: i64,
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed, typed connection between two nodes of the same workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    pub kind: EdgeKind,
    /// Present exactly when `kind` is [`EdgeKind::Conditional`].
    pub condition: Option<Condition>,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A complete workflow graph as loaded for validation or execution.
///
/// `nodes` is ordered by the `order` hint, then creation order — the
/// deterministic tie-break used for entry-node selection.  `edges` is in
/// creation order, which fixes fan-out enqueue order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: String,
    pub version: String,
    pub is_active: bool,
    pub is_published: bool,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub created_at: DateTime<Utc>,
}

impl Workflow {
    /// Convenience constructor for testing.  Sorts nodes by the order
    /// hint (stable, so insertion order breaks ties) to mirror how the
    /// ledger loads them.
    pub fn new(name: impl Into<String>, mut nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        nodes.sort_by_key(|n| n.order);
        Self {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            version: "1.0".into(),
            is_active: true,
            is_published: false,
            nodes,
            edges,
            created_at: Utc::now(),
        }
    }

    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
