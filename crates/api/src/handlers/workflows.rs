//! Workflow graph endpoints: workflow CRUD plus node and edge mutations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use engine::{graph, Condition, EdgeKind, Position, Workflow};
use ledger::models::{EdgeRow, NodeRow, WorkflowRow};
use ledger::repository::workflows as workflow_repo;

use super::{engine_reject, ledger_reject, Reject};
use crate::AppState;

fn default_version() -> String {
    "1.0".to_string()
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(serde::Deserialize)]
pub struct CreateWorkflowDto {
    pub organization_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
}

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub organization_id: Uuid,
}

#[derive(serde::Deserialize)]
pub struct AddNodeDto {
    pub component_id: Uuid,
    #[serde(default = "empty_object")]
    pub configuration: Value,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub order: i64,
}

#[derive(serde::Deserialize)]
pub struct AddEdgeDto {
    pub source: Uuid,
    pub target: Uuid,
    pub kind: EdgeKind,
    #[serde(default)]
    pub condition: Option<Condition>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkflowDto>,
) -> Result<(StatusCode, Json<WorkflowRow>), Reject> {
    let row = graph::create_workflow(
        &state.pool,
        payload.organization_id,
        &payload.name,
        &payload.description,
        &payload.version,
    )
    .await
    .map_err(engine_reject)?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn list(
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkflowRow>>, Reject> {
    let rows = workflow_repo::list_workflows(&state.pool, query.organization_id)
        .await
        .map_err(ledger_reject)?;
    Ok(Json(rows))
}

/// Returns the assembled graph — metadata, nodes, and edges.
pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Workflow>, Reject> {
    let workflow = graph::load_workflow(&state.pool, id)
        .await
        .map_err(engine_reject)?;
    Ok(Json(workflow))
}

/// Deletes the workflow; nodes, edges, runs and logs cascade.
pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, Reject> {
    workflow_repo::delete_workflow(&state.pool, id)
        .await
        .map_err(ledger_reject)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_node(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<AddNodeDto>,
) -> Result<(StatusCode, Json<NodeRow>), Reject> {
    let row = graph::add_node(
        &state.pool,
        id,
        payload.component_id,
        payload.configuration,
        payload.position,
        payload.order,
    )
    .await
    .map_err(engine_reject)?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn add_edge(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<AddEdgeDto>,
) -> Result<(StatusCode, Json<EdgeRow>), Reject> {
    let row = graph::add_edge(
        &state.pool,
        id,
        payload.source,
        payload.target,
        payload.kind,
        payload.condition,
    )
    .await
    .map_err(engine_reject)?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn publish(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, Reject> {
    workflow_repo::set_published(&state.pool, id, true)
        .await
        .map_err(ledger_reject)?;
    Ok(StatusCode::NO_CONTENT)
}
