//! Workflow CRUD operations.

use chrono::Utc;
use uuid::Uuid;

use crate::{models::WorkflowRow, DbPool, LedgerError};

const WORKFLOW_COLUMNS: &str =
    "id, organization_id, name, description, version, is_active, is_published, created_at, updated_at";

/// Insert a new workflow in its draft (unpublished) state.
///
/// `(organization_id, name)` is unique; a clash maps to
/// [`LedgerError::Conflict`].
pub async fn create_workflow(
    pool: &DbPool,
    organization_id: Uuid,
    name: &str,
    description: &str,
    version: &str,
) -> Result<WorkflowRow, LedgerError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let result = sqlx::query_as::<_, WorkflowRow>(&format!(
        r#"
        INSERT INTO workflows
            (id, organization_id, name, description, version, is_active, is_published, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, 1, 0, ?6, ?6)
        RETURNING {WORKFLOW_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(organization_id)
    .bind(name)
    .bind(description)
    .bind(version)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(LedgerError::Conflict("workflows(organization_id, name)"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fetch a single workflow by its primary key.
pub async fn get_workflow(pool: &DbPool, id: Uuid) -> Result<WorkflowRow, LedgerError> {
    let row = sqlx::query_as::<_, WorkflowRow>(&format!(
        r#"SELECT {WORKFLOW_COLUMNS} FROM workflows WHERE id = ?1"#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(LedgerError::NotFound)?;

    Ok(row)
}

/// Return all workflows of an organization, newest first.
pub async fn list_workflows(
    pool: &DbPool,
    organization_id: Uuid,
) -> Result<Vec<WorkflowRow>, LedgerError> {
    let rows = sqlx::query_as::<_, WorkflowRow>(&format!(
        r#"SELECT {WORKFLOW_COLUMNS} FROM workflows WHERE organization_id = ?1 ORDER BY created_at DESC"#,
    ))
    .bind(organization_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mark a workflow as published.
pub async fn set_published(pool: &DbPool, id: Uuid, published: bool) -> Result<(), LedgerError> {
    let result = sqlx::query(
        r#"UPDATE workflows SET is_published = ?1, updated_at = ?2 WHERE id = ?3"#,
    )
    .bind(published)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::NotFound);
    }

    Ok(())
}

/// Permanently delete a workflow.  Nodes, edges, runs and logs cascade.
///
/// Returns `LedgerError::NotFound` if no row was deleted.
pub async fn delete_workflow(pool: &DbPool, id: Uuid) -> Result<(), LedgerError> {
    let result = sqlx::query("DELETE FROM workflows WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::NotFound);
    }

    Ok(())
}

/// Whether the workflow currently has a run in `pending` or `running` state.
/// Used to enforce the no-edits-while-running rule.
pub async fn has_active_runs(pool: &DbPool, workflow_id: Uuid) -> Result<bool, LedgerError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM workflow_runs
        WHERE workflow_id = ?1 AND status IN ('pending', 'running')
        "#,
    )
    .bind(workflow_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
