//! Component catalog endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use components::{ComponentKind, ConfigSchema};
use ledger::models::ComponentRow;
use ledger::repository::components as catalog_repo;

use super::{ledger_reject, reject, Reject};
use crate::AppState;

#[derive(serde::Deserialize)]
pub struct CreateComponentDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: ComponentKind,
    pub configuration_schema: Value,
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateComponentDto>,
) -> Result<(StatusCode, Json<ComponentRow>), Reject> {
    // The schema must parse before it is stored; nodes validate against
    // it at add time.
    ConfigSchema::from_value(&payload.configuration_schema)
        .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, e))?;

    let row = catalog_repo::insert_component(
        &state.pool,
        &payload.name,
        &payload.description,
        &payload.kind.to_string(),
        payload.configuration_schema,
    )
    .await
    .map_err(ledger_reject)?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ComponentRow>>, Reject> {
    let rows = catalog_repo::list_components(&state.pool)
        .await
        .map_err(ledger_reject)?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ComponentRow>, Reject> {
    let row = catalog_repo::get_component(&state.pool, id)
        .await
        .map_err(ledger_reject)?;
    Ok(Json(row))
}

/// Soft-deactivate: blocks new node references, leaves existing nodes alone.
pub async fn deactivate(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, Reject> {
    catalog_repo::set_component_active(&state.pool, id, false)
        .await
        .map_err(ledger_reject)?;
    Ok(StatusCode::NO_CONTENT)
}
