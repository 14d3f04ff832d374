//! Run submission and run-ledger queries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use ledger::models::{ComponentLogRow, RunRow};
use ledger::repository::runs as run_repo;

use super::{engine_reject, ledger_reject, Reject};
use crate::AppState;

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(serde::Deserialize)]
pub struct SubmitRunDto {
    #[serde(default = "empty_object")]
    pub input: Value,
}

/// Submit a run.  Returns `202 Accepted` with the pending run record;
/// callers poll `GET /api/v1/runs/{id}` for the terminal state.
pub async fn submit(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<SubmitRunDto>,
) -> Result<(StatusCode, Json<RunRow>), Reject> {
    let run = state
        .scheduler
        .submit(id, payload.input)
        .await
        .map_err(engine_reject)?;

    Ok((StatusCode::ACCEPTED, Json(run)))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<RunRow>, Reject> {
    let run = run_repo::get_run(&state.pool, id)
        .await
        .map_err(ledger_reject)?;
    Ok(Json(run))
}

pub async fn list_for_workflow(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RunRow>>, Reject> {
    let runs = run_repo::runs_for_workflow(&state.pool, id)
        .await
        .map_err(ledger_reject)?;
    Ok(Json(runs))
}

pub async fn logs(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ComponentLogRow>>, Reject> {
    let logs = run_repo::logs_for_run(&state.pool, id)
        .await
        .map_err(ledger_reject)?;
    Ok(Json(logs))
}
