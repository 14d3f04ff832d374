//! Component kinds — the four typed unit categories of the catalog.

use serde::{Deserialize, Serialize};

/// What role a component plays in a workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Source of data entering the workflow.
    Input,
    /// Transformation step.
    Process,
    /// Sink delivering data out of the workflow.
    Output,
    /// Branch point whose outgoing conditional edges pick the next path.
    Decision,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Process => write!(f, "process"),
            Self::Output => write!(f, "output"),
            Self::Decision => write!(f, "decision"),
        }
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "process" => Ok(Self::Process),
            "output" => Ok(Self::Output),
            "decision" => Ok(Self::Decision),
            other => Err(format!("unknown component kind: {other}")),
        }
    }
}
