//! Component catalog operations.

use chrono::Utc;
use uuid::Uuid;

use crate::{models::ComponentRow, DbPool, LedgerError};

/// Insert a new catalog component.
pub async fn insert_component(
    pool: &DbPool,
    name: &str,
    description: &str,
    kind: &str,
    configuration_schema: serde_json::Value,
) -> Result<ComponentRow, LedgerError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, ComponentRow>(
        r#"
        INSERT INTO components
            (id, name, description, kind, configuration_schema, is_active, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
        RETURNING id, name, description, kind, configuration_schema, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(kind)
    .bind(configuration_schema)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a single component by its primary key.
pub async fn get_component(pool: &DbPool, id: Uuid) -> Result<ComponentRow, LedgerError> {
    let row = sqlx::query_as::<_, ComponentRow>(
        r#"
        SELECT id, name, description, kind, configuration_schema, is_active, created_at, updated_at
        FROM components WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(LedgerError::NotFound)?;

    Ok(row)
}

/// Return all components, newest first.
pub async fn list_components(pool: &DbPool) -> Result<Vec<ComponentRow>, LedgerError> {
    let rows = sqlx::query_as::<_, ComponentRow>(
        r#"
        SELECT id, name, description, kind, configuration_schema, is_active, created_at, updated_at
        FROM components ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Soft-deactivate (or re-activate) a component.  Deactivation only blocks
/// *new* node references; existing nodes keep running.
pub async fn set_component_active(
    pool: &DbPool,
    id: Uuid,
    is_active: bool,
) -> Result<(), LedgerError> {
    let result = sqlx::query(
        r#"UPDATE components SET is_active = ?1, updated_at = ?2 WHERE id = ?3"#,
    )
    .bind(is_active)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::NotFound);
    }

    Ok(())
}
