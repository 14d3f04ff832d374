//! `ledger` crate — pure persistence layer.
//!
//! Provides a connection pool, typed row structs, and repository functions
//! for every table in the flowgrid schema.  No business logic lives here;
//! graph validation and run semantics belong to the `engine` crate.

pub mod error;
pub mod models;
pub mod pool;
pub mod repository;

pub use error::LedgerError;
pub use pool::DbPool;
