//! Parallel agent pool: bounded, request-scoped structured concurrency.
//!
//! One request's task set is spawned together, runs under a semaphore
//! bound, and is joined as a unit; there is no long-lived worker
//! identity. Each task carries an independent timeout and output budget;
//! a task's failure or timeout never cancels its siblings, and nothing is
//! retried (fast-fail keeps tail latency bounded).
//!
//! If the request's aggregate ceiling lapses first, a cooperative stop
//! signal is broadcast over a watch channel and the pool joins whatever is
//! outstanding; cancelled tasks report [`TaskError::Cancelled`] and the
//! configured timeout policy decides what happens to the fragments that
//! did complete.

use futures_util::future::join_all;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Semaphore, watch};

use crate::catalog::AgentTask;
use crate::error::TaskError;
use crate::payload::Fragment;
use crate::providers::{GenerationRequest, GenerativeBackend, MediaSearchProvider};
use crate::section::{TaskId, TaskKind};

/// Result of one task: a typed fragment or an isolated failure, plus how
/// long the task actually ran.
#[derive(Debug)]
pub struct TaskOutcome {
    pub result: Result<Fragment, TaskError>,
    pub elapsed: Duration,
}

/// Joined results of one fan-out.
#[derive(Debug, Default)]
pub struct FanOutReport {
    pub outcomes: FxHashMap<TaskId, TaskOutcome>,
    /// Whether the aggregate ceiling fired and cancelled stragglers.
    pub ceiling_hit: bool,
}

impl FanOutReport {
    /// Latency of the slowest task: the fan-out's wall-clock cost, since
    /// siblings run in parallel.
    #[must_use]
    pub fn max_latency(&self) -> Duration {
        self.outcomes
            .values()
            .map(|o| o.elapsed)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Fragment for a task, if it completed successfully.
    pub fn fragment(&self, id: &TaskId) -> Option<&Fragment> {
        self.outcomes.get(id).and_then(|o| o.result.as_ref().ok())
    }
}

/// Executes the task set for one request concurrently.
#[derive(Clone)]
pub struct AgentPool {
    backend: Arc<dyn GenerativeBackend>,
    media: Option<Arc<dyn MediaSearchProvider>>,
    semaphore: Arc<Semaphore>,
}

impl AgentPool {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        media: Option<Arc<dyn MediaSearchProvider>>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            backend,
            media,
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Spawn, run, join-all. Returns a mapping from task identity to its
    /// outcome; completion order never influences the mapping.
    pub async fn run(
        &self,
        word: &str,
        tasks: Vec<AgentTask>,
        ceiling: Duration,
    ) -> FanOutReport {
        let (stop_tx, stop_rx) = watch::channel(false);

        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let backend = Arc::clone(&self.backend);
                let media = self.media.clone();
                let semaphore = Arc::clone(&self.semaphore);
                let mut stop = stop_rx.clone();
                let word = word.to_string();
                tokio::spawn(async move {
                    let id = task.id;
                    let started = Instant::now();
                    let result = tokio::select! {
                        res = execute(task, &word, backend, media, semaphore) => res,
                        _ = stop.wait_for(|cancelled| *cancelled) => {
                            Err(TaskError::Cancelled { kind: id.kind })
                        }
                    };
                    (
                        id,
                        TaskOutcome {
                            result,
                            elapsed: started.elapsed(),
                        },
                    )
                })
            })
            .collect();

        let mut joined = join_all(handles);
        let (results, ceiling_hit) = match tokio::time::timeout(ceiling, &mut joined).await {
            Ok(results) => (results, false),
            Err(_) => {
                // Signal-and-join, not forceful termination: tasks observe
                // the watch channel and resolve as cancelled.
                let _ = stop_tx.send(true);
                (joined.await, true)
            }
        };

        let mut outcomes = FxHashMap::default();
        for joined_task in results {
            match joined_task {
                Ok((id, outcome)) => {
                    outcomes.insert(id, outcome);
                }
                Err(e) => {
                    tracing::error!(error = %e, "fan-out task panicked");
                }
            }
        }
        FanOutReport {
            outcomes,
            ceiling_hit,
        }
    }
}

async fn execute(
    task: AgentTask,
    word: &str,
    backend: Arc<dyn GenerativeBackend>,
    media: Option<Arc<dyn MediaSearchProvider>>,
    semaphore: Arc<Semaphore>,
) -> Result<Fragment, TaskError> {
    let kind = task.id.kind;
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| TaskError::Backend {
            kind,
            message: "agent pool closed".to_string(),
        })?;
    let budget_ms = task.budget.timeout.as_millis() as u64;

    if kind == TaskKind::MediaClips {
        let Some(media) = media else {
            return Err(TaskError::Backend {
                kind,
                message: "no media search provider configured".to_string(),
            });
        };
        return match tokio::time::timeout(task.budget.timeout, media.search(word)).await {
            Ok(Ok(clips)) => Ok(Fragment::MediaClips(clips)),
            Ok(Err(e)) => Err(TaskError::Backend {
                kind,
                message: e.to_string(),
            }),
            Err(_) => Err(TaskError::Timeout { kind, budget_ms }),
        };
    }

    let request = GenerationRequest {
        instruction: task.instruction,
        schema: task.schema,
        max_tokens: task.budget.max_tokens,
        timeout: task.budget.timeout,
    };
    match tokio::time::timeout(task.budget.timeout, backend.generate(request)).await {
        Ok(Ok(value)) => Fragment::parse(kind, value),
        Ok(Err(e)) => Err(TaskError::Backend {
            kind,
            message: e.to_string(),
        }),
        Err(_) => Err(TaskError::Timeout { kind, budget_ms }),
    }
}
