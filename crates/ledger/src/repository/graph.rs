//! Node and edge operations for workflow graphs.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::{EdgeRow, NodeDetailRow, NodeRow},
    DbPool, LedgerError,
};

const NODE_COLUMNS: &str =
    "id, workflow_id, component_id, position_x, position_y, configuration, ord, created_at";
const EDGE_COLUMNS: &str =
    "id, workflow_id, source_node_id, target_node_id, kind, condition, created_at";

// ---------------------------------------------------------------------------
// workflow_nodes
// ---------------------------------------------------------------------------

/// Insert a node into a workflow.
pub async fn insert_node(
    pool: &DbPool,
    workflow_id: Uuid,
    component_id: Uuid,
    position_x: f64,
    position_y: f64,
    configuration: serde_json::Value,
    ord: i64,
) -> Result<NodeRow, LedgerError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, NodeRow>(&format!(
        r#"
        INSERT INTO workflow_nodes
            (id, workflow_id, component_id, position_x, position_y, configuration, ord, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        RETURNING {NODE_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(workflow_id)
    .bind(component_id)
    .bind(position_x)
    .bind(position_y)
    .bind(configuration)
    .bind(ord)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a single node by its primary key.
pub async fn get_node(pool: &DbPool, id: Uuid) -> Result<NodeRow, LedgerError> {
    let row = sqlx::query_as::<_, NodeRow>(&format!(
        r#"SELECT {NODE_COLUMNS} FROM workflow_nodes WHERE id = ?1"#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(LedgerError::NotFound)?;

    Ok(row)
}

/// Return a workflow's nodes joined with their component kind, ordered by
/// the `ord` hint, then creation time, then insertion order.  This ordering
/// is the deterministic tie-break used for entry-node selection.
pub async fn list_nodes_detailed(
    pool: &DbPool,
    workflow_id: Uuid,
) -> Result<Vec<NodeDetailRow>, LedgerError> {
    let rows = sqlx::query_as::<_, NodeDetailRow>(
        r#"
        SELECT n.id, n.workflow_id, n.component_id, n.position_x, n.position_y,
               n.configuration, n.ord, c.kind AS component_kind
        FROM workflow_nodes n
        JOIN components c ON c.id = n.component_id
        WHERE n.workflow_id = ?1
        ORDER BY n.ord ASC, n.created_at ASC, n.rowid ASC
        "#,
    )
    .bind(workflow_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// workflow_edges
// ---------------------------------------------------------------------------

/// Insert an edge between two nodes.  Endpoint/workflow consistency is
/// checked by the engine before this is called.
pub async fn insert_edge(
    pool: &DbPool,
    workflow_id: Uuid,
    source_node_id: Uuid,
    target_node_id: Uuid,
    kind: &str,
    condition: Option<serde_json::Value>,
) -> Result<EdgeRow, LedgerError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, EdgeRow>(&format!(
        r#"
        INSERT INTO workflow_edges
            (id, workflow_id, source_node_id, target_node_id, kind, condition, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING {EDGE_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(workflow_id)
    .bind(source_node_id)
    .bind(target_node_id)
    .bind(kind)
    .bind(condition)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Return a workflow's edges in creation order.
pub async fn list_edges(pool: &DbPool, workflow_id: Uuid) -> Result<Vec<EdgeRow>, LedgerError> {
    let rows = sqlx::query_as::<_, EdgeRow>(&format!(
        r#"
        SELECT {EDGE_COLUMNS} FROM workflow_edges
        WHERE workflow_id = ?1
        ORDER BY created_at ASC, rowid ASC
        "#,
    ))
    .bind(workflow_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Whether an outgoing edge of the given kind already exists from a node.
pub async fn edge_exists_from(
    pool: &DbPool,
    source_node_id: Uuid,
    kind: &str,
) -> Result<bool, LedgerError> {
    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM workflow_edges WHERE source_node_id = ?1 AND kind = ?2"#,
    )
    .bind(source_node_id)
    .bind(kind)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
