//! `engine` crate — the workflow graph domain model, structural
//! validation, persistence-backed graph mutations, and the execution
//! scheduler.

pub mod condition;
pub mod error;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod validate;

pub use condition::{CondOp, Condition};
pub use error::EngineError;
pub use models::{Edge, EdgeKind, Node, Position, Workflow};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use validate::{entry_nodes, validate_graph};
