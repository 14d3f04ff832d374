//! Typed error type for the ledger crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    #[error("unique constraint violated on {0}")]
    Conflict(&'static str),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
