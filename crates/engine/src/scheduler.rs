//! The execution scheduler — the run state machine.
//!
//! A run walks the graph in a single pass, no backtracking:
//! 1. Create the run record (`pending`), transition to `running`, seed an
//!    ordered frontier with the workflow's entry nodes.
//! 2. For each frontier node: open its log row (`running`), invoke the
//!    component for the node's kind, finalize the log from the outcome.
//! 3. Follow the outgoing edges whose kind matches the outcome, plus any
//!    conditional edge whose condition holds against the output.
//! 4. A failure with no matching edge fails the whole run with the node's
//!    error text.  A success with no matching edge just ends that branch.
//! 5. The run completes when the frontier is exhausted; its output is the
//!    aggregate of all terminal (no-outgoing-edge) nodes' outputs, keyed
//!    by node id.
//!
//! Nodes execute strictly sequentially within one run; a per-run visited
//! set keeps a node from running twice even when it is reachable over
//! several paths.  The scheduler never retries a node — a retry is a new
//! run submitted by the caller.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use components::{InvocationContext, InvokerRegistry, Outcome, SecretResolver};
use ledger::{
    models::{RunRow, RunStatus},
    repository::runs as run_repo,
    DbPool,
};

use crate::graph::load_workflow;
use crate::models::{Edge, EdgeKind, Workflow};
use crate::validate::{entry_nodes, validate_graph};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Deadline for a single component invocation.  An elapsed deadline
    /// becomes a `Failure` outcome so failure routing applies uniformly.
    pub node_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { node_timeout: Duration::from_secs(30) }
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Drives workflow runs against the ledger.
///
/// Cheap to clone; every clone shares the pool, the invoker registry and
/// the secret resolver.
#[derive(Clone)]
pub struct Scheduler {
    pool: DbPool,
    registry: Arc<InvokerRegistry>,
    secrets: Arc<dyn SecretResolver>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        pool: DbPool,
        registry: Arc<InvokerRegistry>,
        secrets: Arc<dyn SecretResolver>,
        config: SchedulerConfig,
    ) -> Self {
        Self { pool, registry, secrets, config }
    }

    /// Submit a run and return immediately with its `pending` record.
    ///
    /// The graph is loaded and validated synchronously, so structural
    /// errors ([`EngineError::EmptyGraph`], cycles, …) reach the caller
    /// before any run record exists.  Execution itself happens on a
    /// spawned task; callers poll the run ledger for the terminal state.
    pub async fn submit(&self, workflow_id: Uuid, input: Value) -> Result<RunRow, EngineError> {
        let workflow = self.prepare(workflow_id).await?;
        let run = run_repo::create_run(&self.pool, workflow_id, input.clone()).await?;

        let scheduler = self.clone();
        let run_id = run.id;
        tokio::spawn(async move {
            if let Err(e) = scheduler.drive(&workflow, run_id, input).await {
                error!(%run_id, "run could not be finalized: {e}");
            }
        });

        Ok(run)
    }

    /// Run a workflow and block until the run reaches a terminal state.
    /// Used by tests and the CLI; the API goes through [`Scheduler::submit`].
    pub async fn run_to_completion(
        &self,
        workflow_id: Uuid,
        input: Value,
    ) -> Result<RunRow, EngineError> {
        let workflow = self.prepare(workflow_id).await?;
        let run = run_repo::create_run(&self.pool, workflow_id, input.clone()).await?;
        self.drive(&workflow, run.id, input).await?;
        Ok(run_repo::get_run(&self.pool, run.id).await?)
    }

    /// Load and validate the workflow; all run-start preconditions live here.
    async fn prepare(&self, workflow_id: Uuid) -> Result<Workflow, EngineError> {
        let workflow = load_workflow(&self.pool, workflow_id).await?;
        if !workflow.is_active {
            return Err(EngineError::WorkflowInactive);
        }
        validate_graph(&workflow)?;
        Ok(workflow)
    }

    /// Execute the graph and move the run to its terminal state.  The
    /// returned error covers ledger failures only — node failures are
    /// absorbed into the run record.
    #[instrument(skip(self, workflow, input), fields(workflow_id = %workflow.id, %run_id))]
    async fn drive(
        &self,
        workflow: &Workflow,
        run_id: Uuid,
        input: Value,
    ) -> Result<(), EngineError> {
        run_repo::mark_run_running(&self.pool, run_id).await?;

        match self.execute_graph(workflow, run_id, input).await {
            Ok(output) => {
                info!("run completed");
                run_repo::finalize_run(&self.pool, run_id, RunStatus::Completed, Some(output), None)
                    .await?;
            }
            Err(e) => {
                // An unhandled node failure carries the node's own error
                // text into the run record, undecorated.
                let text = match &e {
                    EngineError::UnhandledFailure { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                error!("run failed: {text}");
                run_repo::finalize_run(&self.pool, run_id, RunStatus::Failed, None, Some(&text))
                    .await?;
            }
        }

        Ok(())
    }

    async fn execute_graph(
        &self,
        workflow: &Workflow,
        run_id: Uuid,
        input: Value,
    ) -> Result<Value, EngineError> {
        // Outgoing-edge lookup, preserving edge creation order so fan-out
        // enqueues deterministically.
        let mut outgoing: HashMap<Uuid, Vec<&Edge>> = HashMap::new();
        for edge in &workflow.edges {
            outgoing.entry(edge.source).or_default().push(edge);
        }

        let ctx = InvocationContext {
            workflow_id: workflow.id,
            run_id,
            run_input: input.clone(),
            secrets: self.secrets.resolve(workflow.id).await,
        };

        let mut frontier: VecDeque<(Uuid, Value)> = entry_nodes(workflow)
            .into_iter()
            .map(|id| (id, input.clone()))
            .collect();
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut aggregate = Map::new();

        while let Some((node_id, node_input)) = frontier.pop_front() {
            if !visited.insert(node_id) {
                continue;
            }

            let node = workflow
                .node(node_id)
                .ok_or(EngineError::UnknownNodeReference { node_id, side: "frontier" })?;

            let log = run_repo::open_log(&self.pool, run_id, node_id, node_input.clone()).await?;

            let invoker = self
                .registry
                .get(node.component_kind)
                .ok_or(EngineError::InvokerMissing(node.component_kind))?;

            let outcome = match tokio::time::timeout(
                self.config.node_timeout,
                invoker.invoke(&node.config, node_input, &ctx),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Outcome::Failure(format!(
                    "component invocation timed out after {:?}",
                    self.config.node_timeout
                )),
            };

            let edges = outgoing.get(&node_id).map(Vec::as_slice).unwrap_or(&[]);

            match outcome {
                Outcome::Success(output) => {
                    run_repo::finalize_log(
                        &self.pool,
                        log.id,
                        RunStatus::Completed,
                        Some(output.clone()),
                        None,
                    )
                    .await?;
                    info!(%node_id, "node succeeded");

                    if edges.is_empty() {
                        // Terminal node: its output joins the aggregate.
                        aggregate.insert(node_id.to_string(), output);
                        continue;
                    }

                    // No matching edge after a success just ends the branch.
                    for edge in matching_edges(edges, EdgeKind::Success, &output) {
                        frontier.push_back((edge.target, output.clone()));
                    }
                }
                Outcome::Failure(message) => {
                    run_repo::finalize_log(
                        &self.pool,
                        log.id,
                        RunStatus::Failed,
                        None,
                        Some(&message),
                    )
                    .await?;
                    warn!(%node_id, "node failed: {message}");

                    // Downstream of a caught failure, the payload is the
                    // error itself; conditions evaluate against it too.
                    let error_payload = json!({ "error": message });
                    let matched = matching_edges(edges, EdgeKind::Failure, &error_payload);
                    if matched.is_empty() {
                        return Err(EngineError::UnhandledFailure { node_id, message });
                    }
                    for edge in matched {
                        frontier.push_back((edge.target, error_payload.clone()));
                    }
                }
            }
        }

        Ok(Value::Object(aggregate))
    }
}

/// Edges selected after an outcome: every edge of the matching kind plus
/// every conditional edge whose condition holds against the payload.
fn matching_edges<'a>(edges: &[&'a Edge], kind: EdgeKind, payload: &Value) -> Vec<&'a Edge> {
    edges
        .iter()
        .filter(|e| match e.kind {
            k if k == kind => true,
            EdgeKind::Conditional => e
                .condition
                .as_ref()
                .is_some_and(|c| c.evaluate(payload)),
            _ => false,
        })
        .copied()
        .collect()
}
