//! Persistence-backed graph mutations.
//!
//! These functions wrap the `ledger` repositories with the structural
//! checks the data layer doesn't know about: component schema validation,
//! cross-workflow edges, duplicate edge kinds, and the
//! no-edits-while-running rule.  A rejected mutation never partially
//! applies — every check runs before the insert.

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use components::{ComponentKind, ConfigSchema};
use ledger::{
    models::{EdgeRow, NodeRow, WorkflowRow},
    repository::{components as catalog_repo, graph as graph_repo, workflows as workflow_repo},
    DbPool, LedgerError,
};

use crate::condition::Condition;
use crate::models::{Edge, EdgeKind, Node, Position, Workflow};
use crate::EngineError;

/// Create a workflow in its draft (unpublished) state.
///
/// `(organization_id, name)` must be unique; a clash maps to
/// [`EngineError::NameTaken`].
pub async fn create_workflow(
    pool: &DbPool,
    organization_id: Uuid,
    name: &str,
    description: &str,
    version: &str,
) -> Result<WorkflowRow, EngineError> {
    match workflow_repo::create_workflow(pool, organization_id, name, description, version).await {
        Ok(row) => {
            info!(workflow_id = %row.id, name, "workflow created");
            Ok(row)
        }
        Err(LedgerError::Conflict(_)) => Err(EngineError::NameTaken),
        Err(e) => Err(e.into()),
    }
}

/// Add a component instance to a workflow's graph.
///
/// # Errors
/// - [`EngineError::WorkflowNotFound`] / [`EngineError::ComponentNotFound`]
/// - [`EngineError::WorkflowBusy`] while a run is pending or running.
/// - [`EngineError::ComponentInactive`] if the catalog entry is deactivated.
/// - [`EngineError::InvalidConfig`] if `config` fails the component's schema.
pub async fn add_node(
    pool: &DbPool,
    workflow_id: Uuid,
    component_id: Uuid,
    config: Value,
    position: Position,
    order: i64,
) -> Result<NodeRow, EngineError> {
    require_workflow(pool, workflow_id).await?;
    require_idle(pool, workflow_id).await?;

    let component = match catalog_repo::get_component(pool, component_id).await {
        Ok(row) => row,
        Err(LedgerError::NotFound) => return Err(EngineError::ComponentNotFound),
        Err(e) => return Err(e.into()),
    };
    if !component.is_active {
        return Err(EngineError::ComponentInactive);
    }

    // Validation happens once, here.  Later edits to the catalog schema
    // never re-validate or invalidate this node.
    let schema = ConfigSchema::from_value(&component.configuration_schema)?;
    schema.validate_config(&config)?;

    let row = graph_repo::insert_node(
        pool,
        workflow_id,
        component_id,
        position.x,
        position.y,
        config,
        order,
    )
    .await?;

    Ok(row)
}

/// Connect two nodes of the same workflow with a typed edge.
///
/// # Errors
/// - [`EngineError::CrossWorkflowEdge`] if either endpoint belongs to a
///   different workflow.
/// - [`EngineError::DuplicateEdgeKind`] if a non-conditional edge of this
///   kind already leaves the source node.
/// - [`EngineError::MissingCondition`] for a conditional edge without one.
/// - [`EngineError::WorkflowBusy`] while a run is pending or running.
pub async fn add_edge(
    pool: &DbPool,
    workflow_id: Uuid,
    source: Uuid,
    target: Uuid,
    kind: EdgeKind,
    condition: Option<Condition>,
) -> Result<EdgeRow, EngineError> {
    require_workflow(pool, workflow_id).await?;
    require_idle(pool, workflow_id).await?;

    let source_node = require_node(pool, source).await?;
    let target_node = require_node(pool, target).await?;
    if source_node.workflow_id != workflow_id || target_node.workflow_id != workflow_id {
        return Err(EngineError::CrossWorkflowEdge);
    }

    match kind {
        EdgeKind::Conditional => {
            if condition.is_none() {
                return Err(EngineError::MissingCondition);
            }
        }
        EdgeKind::Success | EdgeKind::Failure => {
            if graph_repo::edge_exists_from(pool, source, &kind.to_string()).await? {
                return Err(EngineError::DuplicateEdgeKind { kind });
            }
        }
    }

    let condition_json = condition
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| EngineError::MalformedRecord(e.to_string()))?;

    let row = graph_repo::insert_edge(
        pool,
        workflow_id,
        source,
        target,
        &kind.to_string(),
        condition_json,
    )
    .await?;

    Ok(row)
}

/// Assemble the full domain [`Workflow`] — metadata, nodes joined with
/// their component kinds, and edges — as the validator and scheduler
/// consume it.
pub async fn load_workflow(pool: &DbPool, workflow_id: Uuid) -> Result<Workflow, EngineError> {
    let row = match workflow_repo::get_workflow(pool, workflow_id).await {
        Ok(row) => row,
        Err(LedgerError::NotFound) => return Err(EngineError::WorkflowNotFound),
        Err(e) => return Err(e.into()),
    };

    let mut nodes = Vec::new();
    for n in graph_repo::list_nodes_detailed(pool, workflow_id).await? {
        let kind: ComponentKind = n
            .component_kind
            .parse()
            .map_err(EngineError::MalformedRecord)?;
        nodes.push(Node {
            id: n.id,
            component_id: n.component_id,
            component_kind: kind,
            config: n.configuration,
            position: Position { x: n.position_x, y: n.position_y },
            order: n.ord,
        });
    }

    let mut edges = Vec::new();
    for e in graph_repo::list_edges(pool, workflow_id).await? {
        let kind: EdgeKind = e.kind.parse().map_err(EngineError::MalformedRecord)?;
        let condition = e
            .condition
            .as_ref()
            .map(Condition::from_value)
            .transpose()
            .map_err(|err| EngineError::MalformedRecord(err.to_string()))?;
        edges.push(Edge {
            id: e.id,
            source: e.source_node_id,
            target: e.target_node_id,
            kind,
            condition,
        });
    }

    Ok(Workflow {
        id: row.id,
        organization_id: row.organization_id,
        name: row.name,
        description: row.description,
        version: row.version,
        is_active: row.is_active,
        is_published: row.is_published,
        nodes,
        edges,
        created_at: row.created_at,
    })
}

async fn require_workflow(pool: &DbPool, workflow_id: Uuid) -> Result<WorkflowRow, EngineError> {
    match workflow_repo::get_workflow(pool, workflow_id).await {
        Ok(row) => Ok(row),
        Err(LedgerError::NotFound) => Err(EngineError::WorkflowNotFound),
        Err(e) => Err(e.into()),
    }
}

async fn require_node(pool: &DbPool, node_id: Uuid) -> Result<NodeRow, EngineError> {
    match graph_repo::get_node(pool, node_id).await {
        Ok(row) => Ok(row),
        Err(LedgerError::NotFound) => Err(EngineError::UnknownNodeReference {
            node_id,
            side: "endpoint",
        }),
        Err(e) => Err(e.into()),
    }
}

/// The graph of a workflow with a pending/running run is frozen.
async fn require_idle(pool: &DbPool, workflow_id: Uuid) -> Result<(), EngineError> {
    if workflow_repo::has_active_runs(pool, workflow_id).await? {
        return Err(EngineError::WorkflowBusy);
    }
    Ok(())
}

// ============================================================
// Unit tests (in-memory SQLite)
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // A single connection so every query sees the same in-memory database.
    async fn test_pool() -> DbPool {
        let pool = ledger::pool::create_pool("sqlite::memory:", 1)
            .await
            .expect("in-memory pool");
        ledger::pool::run_migrations(&pool).await.expect("migrations");
        pool
    }

    async fn seed_component(pool: &DbPool, kind: &str) -> Uuid {
        let schema = json!({
            "fields": [{ "name": "endpoint", "type": "string", "required": true }]
        });
        catalog_repo::insert_component(pool, "http", "", kind, schema)
            .await
            .expect("insert component")
            .id
    }

    async fn seed_workflow(pool: &DbPool, name: &str) -> Uuid {
        create_workflow(pool, Uuid::new_v4(), name, "", "1.0")
            .await
            .expect("create workflow")
            .id
    }

    #[tokio::test]
    async fn add_node_validates_config_against_schema() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "process").await;
        let workflow = seed_workflow(&pool, "wf").await;

        let bad = add_node(
            &pool,
            workflow,
            component,
            json!({ "wrong_key": 1 }),
            Position::default(),
            0,
        )
        .await;
        assert!(matches!(bad, Err(EngineError::InvalidConfig(_))));

        let ok = add_node(
            &pool,
            workflow,
            component,
            json!({ "endpoint": "https://x" }),
            Position::default(),
            0,
        )
        .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn deactivated_component_rejects_new_nodes() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "process").await;
        let workflow = seed_workflow(&pool, "wf").await;

        catalog_repo::set_component_active(&pool, component, false)
            .await
            .expect("deactivate");

        let result = add_node(
            &pool,
            workflow,
            component,
            json!({ "endpoint": "x" }),
            Position::default(),
            0,
        )
        .await;
        assert!(matches!(result, Err(EngineError::ComponentInactive)));
    }

    #[tokio::test]
    async fn cross_workflow_edge_is_rejected_and_nothing_persists() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "process").await;
        let wf_a = seed_workflow(&pool, "a").await;
        let wf_b = seed_workflow(&pool, "b").await;

        let config = json!({ "endpoint": "x" });
        let node_a = add_node(&pool, wf_a, component, config.clone(), Position::default(), 0)
            .await
            .expect("node a");
        let node_b = add_node(&pool, wf_b, component, config, Position::default(), 0)
            .await
            .expect("node b");

        let result = add_edge(&pool, wf_a, node_a.id, node_b.id, EdgeKind::Success, None).await;
        assert!(matches!(result, Err(EngineError::CrossWorkflowEdge)));

        let edges = graph_repo::list_edges(&pool, wf_a).await.expect("list");
        assert!(edges.is_empty());
    }

    #[tokio::test]
    async fn second_success_edge_from_one_node_is_rejected() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "process").await;
        let workflow = seed_workflow(&pool, "wf").await;

        let config = json!({ "endpoint": "x" });
        let mut ids = Vec::new();
        for i in 0..3 {
            let node = add_node(&pool, workflow, component, config.clone(), Position::default(), i)
                .await
                .expect("node");
            ids.push(node.id);
        }

        add_edge(&pool, workflow, ids[0], ids[1], EdgeKind::Success, None)
            .await
            .expect("first success edge");

        let dup = add_edge(&pool, workflow, ids[0], ids[2], EdgeKind::Success, None).await;
        assert!(matches!(
            dup,
            Err(EngineError::DuplicateEdgeKind { kind: EdgeKind::Success })
        ));

        // A failure edge from the same source is still fine.
        add_edge(&pool, workflow, ids[0], ids[2], EdgeKind::Failure, None)
            .await
            .expect("failure edge");
    }

    #[tokio::test]
    async fn conditional_edge_requires_condition() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "decision").await;
        let workflow = seed_workflow(&pool, "wf").await;

        let config = json!({ "endpoint": "x" });
        let a = add_node(&pool, workflow, component, config.clone(), Position::default(), 0)
            .await
            .expect("a");
        let b = add_node(&pool, workflow, component, config, Position::default(), 1)
            .await
            .expect("b");

        let result = add_edge(&pool, workflow, a.id, b.id, EdgeKind::Conditional, None).await;
        assert!(matches!(result, Err(EngineError::MissingCondition)));
    }

    #[tokio::test]
    async fn graph_mutations_are_refused_while_a_run_is_in_flight() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "process").await;
        let workflow = seed_workflow(&pool, "wf").await;

        // A pending run freezes the graph.
        ledger::repository::runs::create_run(&pool, workflow, json!({}))
            .await
            .expect("create run");

        let result = add_node(
            &pool,
            workflow,
            component,
            json!({ "endpoint": "x" }),
            Position::default(),
            0,
        )
        .await;
        assert!(matches!(result, Err(EngineError::WorkflowBusy)));
    }

    #[tokio::test]
    async fn duplicate_workflow_name_in_org_is_rejected() {
        let pool = test_pool().await;
        let org = Uuid::new_v4();

        create_workflow(&pool, org, "sync", "", "1.0").await.expect("first");
        let dup = create_workflow(&pool, org, "sync", "", "2.0").await;
        assert!(matches!(dup, Err(EngineError::NameTaken)));

        // Same name under another organization is fine.
        create_workflow(&pool, Uuid::new_v4(), "sync", "", "1.0")
            .await
            .expect("other org");
    }

    #[tokio::test]
    async fn loaded_workflow_survives_a_serde_round_trip() {
        let pool = test_pool().await;
        let component = seed_component(&pool, "process").await;
        let workflow = seed_workflow(&pool, "wf").await;

        let config = json!({ "endpoint": "x" });
        let a = add_node(&pool, workflow, component, config.clone(), Position::default(), 0)
            .await
            .expect("a");
        let b = add_node(&pool, workflow, component, config, Position { x: 10.0, y: 20.0 }, 1)
            .await
            .expect("b");
        add_edge(&pool, workflow, a.id, b.id, EdgeKind::Success, None)
            .await
            .expect("edge");

        let loaded = load_workflow(&pool, workflow).await.expect("load");
        let json = serde_json::to_string(&loaded).expect("serialize");
        let restored: Workflow = serde_json::from_str(&json).expect("deserialize");

        // Identical graph state implies identical run outcomes.
        assert_eq!(loaded, restored);
    }
}
