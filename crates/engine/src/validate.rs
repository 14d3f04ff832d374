//! Structural graph validation — run this before a workflow may execute.
//!
//! Rules enforced:
//! 1. Node IDs must be unique within the workflow.
//! 2. Every edge must reference valid node IDs (both source and target).
//! 3. Conditional edges must carry a condition.
//! 4. The workflow must have at least one entry node.
//! 5. The success/failure subgraph must be acyclic.  Cycles through
//!    conditional edges are allowed — the per-run visited set bounds them.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::models::{EdgeKind, Workflow};
use crate::EngineError;

/// Nodes with no incoming edge of any kind, in the order execution will
/// seed the frontier with them.
///
/// `workflow.nodes` is already sorted by the `order` hint and then by
/// creation order, so this is deterministic and stable across calls.
pub fn entry_nodes(workflow: &Workflow) -> Vec<Uuid> {
    let targets: HashSet<Uuid> = workflow.edges.iter().map(|e| e.target).collect();
    workflow
        .nodes
        .iter()
        .filter(|n| !targets.contains(&n.id))
        .map(|n| n.id)
        .collect()
}

/// Validate the workflow's graph structure.
///
/// # Errors
/// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
/// - [`EngineError::UnknownNodeReference`] if an edge references a missing node.
/// - [`EngineError::MissingCondition`] if a conditional edge has no condition.
/// - [`EngineError::EmptyGraph`] if no entry nodes exist.
/// - [`EngineError::CycleDetected`] if success/failure edges form a cycle.
pub fn validate_graph(workflow: &Workflow) -> Result<(), EngineError> {
    // -----------------------------------------------------------------------
    // 1. Ensure node IDs are unique
    // -----------------------------------------------------------------------
    let mut seen_ids: HashSet<Uuid> = HashSet::new();
    for node in &workflow.nodes {
        if !seen_ids.insert(node.id) {
            return Err(EngineError::DuplicateNodeId(node.id));
        }
    }

    // -----------------------------------------------------------------------
    // 2. Validate edge endpoints and conditional edges
    // -----------------------------------------------------------------------
    for edge in &workflow.edges {
        if !seen_ids.contains(&edge.source) {
            return Err(EngineError::UnknownNodeReference {
                node_id: edge.source,
                side: "source",
            });
        }
        if !seen_ids.contains(&edge.target) {
            return Err(EngineError::UnknownNodeReference {
                node_id: edge.target,
                side: "target",
            });
        }
        if edge.kind == EdgeKind::Conditional && edge.condition.is_none() {
            return Err(EngineError::MissingCondition);
        }
    }

    // -----------------------------------------------------------------------
    // 3. At least one entry node, or no run could ever make progress
    // -----------------------------------------------------------------------
    if entry_nodes(workflow).is_empty() {
        return Err(EngineError::EmptyGraph);
    }

    // -----------------------------------------------------------------------
    // 4. Kahn's algorithm over the success/failure subgraph only
    // -----------------------------------------------------------------------
    let mut adjacency: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut in_degree: HashMap<Uuid, usize> = HashMap::new();

    for node in &workflow.nodes {
        adjacency.entry(node.id).or_default();
        in_degree.entry(node.id).or_insert(0);
    }

    for edge in &workflow.edges {
        if edge.kind == EdgeKind::Conditional {
            continue;
        }
        adjacency.entry(edge.source).or_default().push(edge.target);
        *in_degree.entry(edge.target).or_insert(0) += 1;
    }

    let mut queue: VecDeque<Uuid> = in_degree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0usize;

    while let Some(node_id) = queue.pop_front() {
        visited += 1;

        if let Some(neighbours) = adjacency.get(&node_id) {
            for &neighbour in neighbours {
                let deg = in_degree.entry(neighbour).or_insert(0);
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(neighbour);
                }
            }
        }
    }

    // If we didn't visit every node the subgraph contains a cycle.
    if visited != workflow.nodes.len() {
        return Err(EngineError::CycleDetected);
    }

    Ok(())
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{CondOp, Condition};
    use crate::models::{Edge, Node, Position};
    use components::ComponentKind;
    use serde_json::json;

    fn make_node(order: i64) -> Node {
        Node {
            id: Uuid::new_v4(),
            component_id: Uuid::new_v4(),
            component_kind: ComponentKind::Process,
            config: json!({}),
            position: Position::default(),
            order,
        }
    }

    fn make_edge(source: Uuid, target: Uuid, kind: EdgeKind) -> Edge {
        let condition = (kind == EdgeKind::Conditional).then(|| Condition {
            path: "x".into(),
            op: CondOp::Exists,
            value: serde_json::Value::Null,
        });
        Edge { id: Uuid::new_v4(), source, target, kind, condition }
    }

    #[test]
    fn linear_graph_is_valid() {
        let (a, b, c) = (make_node(0), make_node(1), make_node(2));
        let edges = vec![
            make_edge(a.id, b.id, EdgeKind::Success),
            make_edge(b.id, c.id, EdgeKind::Success),
        ];
        let wf = Workflow::new("linear", vec![a, b, c], edges);
        assert!(validate_graph(&wf).is_ok());
    }

    #[test]
    fn entry_nodes_respect_order_hint() {
        let (a, b, c) = (make_node(5), make_node(1), make_node(3));
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);
        // Insert out of order; Workflow::new sorts by the order hint.
        let wf = Workflow::new("ordered", vec![a, c, b], vec![]);

        assert_eq!(entry_nodes(&wf), vec![b_id, c_id, a_id]);
        // Stable across repeated calls.
        assert_eq!(entry_nodes(&wf), entry_nodes(&wf));
    }

    #[test]
    fn nodes_with_incoming_edges_are_not_entries() {
        let (a, b) = (make_node(0), make_node(1));
        let (a_id, b_id) = (a.id, b.id);
        let wf = Workflow::new(
            "fed",
            vec![a, b],
            vec![make_edge(a_id, b_id, EdgeKind::Success)],
        );
        assert_eq!(entry_nodes(&wf), vec![a_id]);
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let a = make_node(0);
        let dup = a.clone();
        let wf = Workflow::new("dup", vec![a, dup], vec![]);
        assert!(matches!(validate_graph(&wf), Err(EngineError::DuplicateNodeId(_))));
    }

    #[test]
    fn edge_referencing_missing_node_is_rejected() {
        let a = make_node(0);
        let ghost = Uuid::new_v4();
        let edge = make_edge(a.id, ghost, EdgeKind::Success);
        let wf = Workflow::new("ghost", vec![a], vec![edge]);
        assert!(matches!(
            validate_graph(&wf),
            Err(EngineError::UnknownNodeReference { node_id, side: "target" }) if node_id == ghost
        ));
    }

    #[test]
    fn conditional_edge_without_condition_is_rejected() {
        let (a, b) = (make_node(0), make_node(1));
        let mut edge = make_edge(a.id, b.id, EdgeKind::Conditional);
        edge.condition = None;
        let wf = Workflow::new("nocond", vec![a, b], vec![edge]);
        assert!(matches!(validate_graph(&wf), Err(EngineError::MissingCondition)));
    }

    #[test]
    fn graph_with_no_entry_nodes_is_rejected() {
        let (a, b) = (make_node(0), make_node(1));
        let edges = vec![
            make_edge(a.id, b.id, EdgeKind::Success),
            make_edge(b.id, a.id, EdgeKind::Failure),
        ];
        let wf = Workflow::new("closed", vec![a, b], edges);
        assert!(matches!(validate_graph(&wf), Err(EngineError::EmptyGraph)));
    }

    #[test]
    fn success_cycle_is_detected() {
        let (a, b, c) = (make_node(0), make_node(1), make_node(2));
        let edges = vec![
            make_edge(a.id, b.id, EdgeKind::Success),
            make_edge(b.id, c.id, EdgeKind::Success),
            make_edge(c.id, b.id, EdgeKind::Success), // back-edge
        ];
        let wf = Workflow::new("cycle", vec![a, b, c], edges);
        assert!(matches!(validate_graph(&wf), Err(EngineError::CycleDetected)));
    }

    #[test]
    fn conditional_back_edge_is_legal() {
        // b → a through a conditional edge: bounded at run time by the
        // visited set, so validation lets it through.
        let (e, a, b) = (make_node(0), make_node(1), make_node(2));
        let edges = vec![
            make_edge(e.id, a.id, EdgeKind::Success),
            make_edge(a.id, b.id, EdgeKind::Success),
            make_edge(b.id, a.id, EdgeKind::Conditional),
        ];
        let wf = Workflow::new("loopback", vec![e, a, b], edges);
        assert!(validate_graph(&wf).is_ok());
    }

    #[test]
    fn single_node_no_edges_is_valid() {
        let solo = make_node(0);
        let wf = Workflow::new("solo", vec![solo], vec![]);
        assert!(validate_graph(&wf).is_ok());
    }
}
