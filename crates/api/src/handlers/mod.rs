//! Handler modules, one per resource.

pub mod components;
pub mod runs;
pub mod workflows;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use engine::EngineError;
use ledger::LedgerError;

/// The rejection type every handler returns: a status plus an error body.
pub(crate) type Reject = (StatusCode, Json<Value>);

pub(crate) fn reject(status: StatusCode, message: impl std::fmt::Display) -> Reject {
    (status, Json(json!({ "error": message.to_string() })))
}

/// Map engine errors onto HTTP statuses.  Structural rejections are the
/// caller's fault; ledger and record problems are ours.
pub(crate) fn engine_reject(e: EngineError) -> Reject {
    let status = match &e {
        EngineError::WorkflowNotFound | EngineError::ComponentNotFound => StatusCode::NOT_FOUND,
        EngineError::NameTaken | EngineError::WorkflowBusy => StatusCode::CONFLICT,
        EngineError::InvalidConfig(_)
        | EngineError::CrossWorkflowEdge
        | EngineError::DuplicateEdgeKind { .. }
        | EngineError::MissingCondition
        | EngineError::DuplicateNodeId(_)
        | EngineError::UnknownNodeReference { .. }
        | EngineError::EmptyGraph
        | EngineError::CycleDetected
        | EngineError::ComponentInactive
        | EngineError::WorkflowInactive => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    reject(status, e)
}

pub(crate) fn ledger_reject(e: LedgerError) -> Reject {
    let status = match &e {
        LedgerError::NotFound => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    reject(status, e)
}
