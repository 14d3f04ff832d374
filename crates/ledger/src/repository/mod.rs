//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, LedgerError>`.
//! No business logic, no domain types — pure SQL.

pub mod components;
pub mod graph;
pub mod runs;
pub mod workflows;
