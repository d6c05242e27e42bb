//! Fan-out/join scheduling.

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use splitflow_job::{Branch, Job, JobRun, RunResult, RunStatus};
use splitflow_task::TaskError;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::state::RunState;

/// Runs a job's master branch, then its siblings concurrently, then joins.
///
/// The master and the join wait run on the caller's task. Each sibling gets
/// its own spawned task; siblings are never cancelled once launched.
pub struct Scheduler {
  config: SchedulerConfig,
  notifier: Arc<dyn ExecutionNotifier>,
}

impl Scheduler {
  pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
    Self::with_notifier(config, Arc::new(NoopNotifier))
  }

  pub fn with_notifier(
    config: SchedulerConfig,
    notifier: Arc<dyn ExecutionNotifier>,
  ) -> Result<Self, SchedulerError> {
    config.validate()?;
    Ok(Self { config, notifier })
  }

  pub fn config(&self) -> &SchedulerConfig {
    &self.config
  }

  /// Execute one run of `job` under the identifier `run_id`.
  ///
  /// If the master fails no sibling is started. Otherwise every sibling runs
  /// to completion (or past the deadline) regardless of how the others fare.
  #[instrument(
    name = "job_run",
    skip(self, run_id, job),
    fields(job = %job.name, job_id = %run_id)
  )]
  pub async fn run_job(&self, run_id: &str, job: &Job) -> JobRun {
    let started_at = Utc::now();
    let mut state = RunState::NotStarted;

    info!(siblings = job.siblings.len(), "job_started");
    self.notifier.notify(ExecutionEvent::JobStarted {
      job_id: run_id.to_string(),
      job_name: job.name.clone(),
    });

    self.transition(&mut state, RunState::MasterRunning);
    self.notifier.notify(ExecutionEvent::BranchStarted {
      job_id: run_id.to_string(),
      branch: job.master.name().to_string(),
    });
    let master_result = job.master.run().await;
    self.notify_branch_result(run_id, &master_result);

    let run = if master_result.is_success() {
      self.transition(&mut state, RunState::SiblingsRunning);
      let branch_results = self.fan_out(run_id, &job.siblings).await;
      self.transition(&mut state, RunState::Joined);
      JobRun::new(run_id, &job.name, master_result, branch_results, started_at)
    } else {
      self.transition(&mut state, RunState::MasterFailed);
      warn!(branch = %job.master.name(), "master branch failed, siblings not started");
      JobRun::new(run_id, &job.name, master_result, Vec::new(), started_at)
    };

    if run.is_success() {
      info!("job_completed");
      self.notifier.notify(ExecutionEvent::JobCompleted {
        job_id: run_id.to_string(),
      });
    } else {
      let failed_branches: Vec<String> = run
        .failures()
        .into_iter()
        .map(|(branch, _)| branch.to_string())
        .collect();
      error!(failed_branches = ?failed_branches, "job_failed");
      self.notifier.notify(ExecutionEvent::JobFailed {
        job_id: run_id.to_string(),
        failed_branches,
      });
    }

    run
  }

  /// Spawn every sibling and wait for all of them, or for the deadline.
  ///
  /// Results come back in declaration order. Siblings still running when the
  /// deadline expires are reported as timed out and left to finish on their
  /// own; their join handles are dropped, which detaches them.
  async fn fan_out(&self, run_id: &str, siblings: &[Branch]) -> Vec<RunResult> {
    let started_at = Utc::now();
    let semaphore = self
      .config
      .max_concurrent_branches
      .map(|max| Arc::new(Semaphore::new(max)));

    info!(
      siblings = siblings.len(),
      max_concurrent = ?self.config.max_concurrent_branches,
      "launching sibling branches"
    );

    let mut pending: FuturesUnordered<_> = siblings
      .iter()
      .enumerate()
      .map(|(index, branch)| {
        let name = branch.name().to_string();
        let handle = self.spawn_sibling(run_id, branch.clone(), semaphore.clone());
        async move { (index, name, handle.await) }
      })
      .collect();

    let deadline = self
      .config
      .deadline
      .map(|deadline| tokio::time::Instant::now() + deadline);

    let mut results: Vec<Option<RunResult>> = vec![None; siblings.len()];

    loop {
      let next = match deadline {
        Some(deadline) => {
          let outcome = tokio::time::timeout_at(deadline, pending.next()).await;
          match outcome {
            Ok(next) => next,
            Err(_) => {
              warn!(outstanding = pending.len(), "join deadline expired");
              break;
            }
          }
        }
        None => pending.next().await,
      };

      let Some((index, name, joined)) = next else {
        break;
      };

      let result = joined.unwrap_or_else(|e| join_failure(&name, e, started_at));
      self.notify_branch_result(run_id, &result);
      results[index] = Some(result);
    }

    // Dropping the remaining futures detaches the straggling tasks.
    drop(pending);

    siblings
      .iter()
      .zip(results)
      .map(|(branch, result)| {
        result.unwrap_or_else(|| {
          let timed_out = RunResult::timed_out(branch.name(), started_at);
          self.notify_branch_result(run_id, &timed_out);
          timed_out
        })
      })
      .collect()
  }

  fn spawn_sibling(
    &self,
    run_id: &str,
    branch: Branch,
    semaphore: Option<Arc<Semaphore>>,
  ) -> tokio::task::JoinHandle<RunResult> {
    let notifier = Arc::clone(&self.notifier);
    let job_id = run_id.to_string();

    // Sibling spans nest under the run's span so their logs carry job_id.
    tokio::spawn(
      async move {
        // Held until the branch finishes; released on drop.
        let _permit = match semaphore {
          Some(semaphore) => semaphore.acquire_owned().await.ok(),
          None => None,
        };

        notifier.notify(ExecutionEvent::BranchStarted {
          job_id,
          branch: branch.name().to_string(),
        });
        branch.run().await
      }
      .in_current_span(),
    )
  }

  fn notify_branch_result(&self, run_id: &str, result: &RunResult) {
    let job_id = run_id.to_string();
    let branch = result.branch_name.clone();

    let event = match result.status {
      RunStatus::Success => ExecutionEvent::BranchCompleted { job_id, branch },
      RunStatus::Failed => ExecutionEvent::BranchFailed {
        job_id,
        branch,
        error: result
          .error
          .as_ref()
          .map(ToString::to_string)
          .unwrap_or_default(),
      },
      RunStatus::TimedOut => ExecutionEvent::BranchTimedOut { job_id, branch },
    };

    self.notifier.notify(event);
  }

  fn transition(&self, state: &mut RunState, next: RunState) {
    match state.advance(next) {
      Ok(next) => {
        debug!(from = ?*state, to = ?next, "run_state_changed");
        *state = next;
      }
      Err(e) => error!(error = %e, "run state machine rejected transition"),
    }
  }
}

/// A sibling task that ended without producing a result.
fn join_failure(branch: &str, e: JoinError, started_at: chrono::DateTime<Utc>) -> RunResult {
  let cause = if e.is_panic() {
    TaskError::panicked(branch, e.into_panic())
  } else {
    TaskError::failed(branch, format!("branch task aborted: {}", e))
  };
  RunResult::failed(branch, cause, 0, started_at)
}
