//! Run and component-log operations.
//!
//! Writes come from the scheduler only.  Log rows are append-only: opened
//! once at node entry, finalized once at node exit, never touched again.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::{ComponentLogRow, RunRow, RunStatus},
    DbPool, LedgerError,
};

const RUN_COLUMNS: &str =
    "id, workflow_id, status, input, output, error, started_at, completed_at";
const LOG_COLUMNS: &str =
    "id, run_id, node_id, status, input, output, error, started_at, completed_at";

// ---------------------------------------------------------------------------
// workflow_runs
// ---------------------------------------------------------------------------

/// Create a new run record in `pending` status.
pub async fn create_run(
    pool: &DbPool,
    workflow_id: Uuid,
    input: serde_json::Value,
) -> Result<RunRow, LedgerError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, RunRow>(&format!(
        r#"
        INSERT INTO workflow_runs (id, workflow_id, status, input, started_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING {RUN_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(workflow_id)
    .bind(RunStatus::Pending.to_string())
    .bind(input)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Transition a run to `running`.
pub async fn mark_run_running(pool: &DbPool, run_id: Uuid) -> Result<(), LedgerError> {
    sqlx::query(r#"UPDATE workflow_runs SET status = ?1 WHERE id = ?2"#)
        .bind(RunStatus::Running.to_string())
        .bind(run_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Move a run to a terminal status, recording the aggregate output
/// (completed) or the error text (failed).  Terminal states are final.
pub async fn finalize_run(
    pool: &DbPool,
    run_id: Uuid,
    status: RunStatus,
    output: Option<serde_json::Value>,
    error: Option<&str>,
) -> Result<(), LedgerError> {
    sqlx::query(
        r#"
        UPDATE workflow_runs
        SET status = ?1, output = ?2, error = ?3, completed_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(status.to_string())
    .bind(output)
    .bind(error)
    .bind(Utc::now())
    .bind(run_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch a single run by its primary key.
pub async fn get_run(pool: &DbPool, run_id: Uuid) -> Result<RunRow, LedgerError> {
    let row = sqlx::query_as::<_, RunRow>(&format!(
        r#"SELECT {RUN_COLUMNS} FROM workflow_runs WHERE id = ?1"#,
    ))
    .bind(run_id)
    .fetch_optional(pool)
    .await?
    .ok_or(LedgerError::NotFound)?;

    Ok(row)
}

/// Return a workflow's runs, newest first.
pub async fn runs_for_workflow(
    pool: &DbPool,
    workflow_id: Uuid,
) -> Result<Vec<RunRow>, LedgerError> {
    let rows = sqlx::query_as::<_, RunRow>(&format!(
        r#"
        SELECT {RUN_COLUMNS} FROM workflow_runs
        WHERE workflow_id = ?1
        ORDER BY started_at DESC, rowid DESC
        "#,
    ))
    .bind(workflow_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// component_run_logs
// ---------------------------------------------------------------------------

/// Open a log row at node entry, in `running` status.
pub async fn open_log(
    pool: &DbPool,
    run_id: Uuid,
    node_id: Uuid,
    input: serde_json::Value,
) -> Result<ComponentLogRow, LedgerError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, ComponentLogRow>(&format!(
        r#"
        INSERT INTO component_run_logs (id, run_id, node_id, status, input, started_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING {LOG_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(run_id)
    .bind(node_id)
    .bind(RunStatus::Running.to_string())
    .bind(input)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Finalize a log row at node exit with the outcome.
pub async fn finalize_log(
    pool: &DbPool,
    log_id: Uuid,
    status: RunStatus,
    output: Option<serde_json::Value>,
    error: Option<&str>,
) -> Result<(), LedgerError> {
    sqlx::query(
        r#"
        UPDATE component_run_logs
        SET status = ?1, output = ?2, error = ?3, completed_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(status.to_string())
    .bind(output)
    .bind(error)
    .bind(Utc::now())
    .bind(log_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Return a run's logs ordered by start time.
pub async fn logs_for_run(pool: &DbPool, run_id: Uuid) -> Result<Vec<ComponentLogRow>, LedgerError> {
    let rows = sqlx::query_as::<_, ComponentLogRow>(&format!(
        r#"
        SELECT {LOG_COLUMNS} FROM component_run_logs
        WHERE run_id = ?1
        ORDER BY started_at ASC, rowid ASC
        "#,
    ))
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
