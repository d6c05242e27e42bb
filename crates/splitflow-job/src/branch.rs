//! Branch execution.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use splitflow_task::{Task, TaskError};
use tracing::{debug, error, info, instrument};

use crate::result::RunResult;

/// An ordered sequence of tasks run one after another.
///
/// Cloning a branch is cheap; tasks are shared, so one definition can be run
/// any number of times.
#[derive(Clone)]
pub struct Branch {
  name: String,
  tasks: Vec<Arc<dyn Task>>,
}

impl std::fmt::Debug for Branch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Branch")
      .field("name", &self.name)
      .field(
        "tasks",
        &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
      )
      .finish()
  }
}

impl Branch {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      tasks: Vec::new(),
    }
  }

  pub fn with_tasks(name: impl Into<String>, tasks: Vec<Arc<dyn Task>>) -> Self {
    Self {
      name: name.into(),
      tasks,
    }
  }

  /// Append a task.
  pub fn task(mut self, task: impl Task + 'static) -> Self {
    self.tasks.push(Arc::new(task));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn tasks(&self) -> &[Arc<dyn Task>] {
    &self.tasks
  }

  /// Run every task in order.
  ///
  /// Stops at the first task that fails or panics and reports it; tasks
  /// after it are never invoked. Never returns an error and never unwinds.
  #[instrument(name = "branch_run", skip(self), fields(branch = %self.name))]
  pub async fn run(&self) -> RunResult {
    let started_at = Utc::now();
    info!(tasks = self.tasks.len(), "branch_started");

    for (completed, task) in self.tasks.iter().enumerate() {
      debug!(task = %task.name(), "task_started");

      let outcome = match AssertUnwindSafe(task.execute()).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => Err(TaskError::panicked(task.name(), payload)),
      };

      match outcome {
        Ok(()) => debug!(task = %task.name(), "task_completed"),
        Err(e) => {
          error!(task = %task.name(), error = %e, "task_failed");
          return RunResult::failed(&self.name, e, completed, started_at);
        }
      }
    }

    info!("branch_completed");
    RunResult::success(&self.name, self.tasks.len(), started_at)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::result::RunStatus;
  use splitflow_task::FnTask;

  #[tokio::test]
  async fn test_empty_branch_succeeds() {
    let result = Branch::new("empty").run().await;
    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.tasks_completed, 0);
    assert!(result.error.is_none());
  }

  #[tokio::test]
  async fn test_panicking_task_is_contained() {
    let branch = Branch::new("risky")
      .task(FnTask::new("ok", || Ok(())))
      .task(FnTask::new("explode", || panic!("kaboom")));

    let result = branch.run().await;

    assert_eq!(result.status, RunStatus::Failed);
    assert_eq!(result.tasks_completed, 1);
    assert_eq!(
      result.error,
      Some(TaskError::Panicked {
        task: "explode".to_string(),
        message: "kaboom".to_string(),
      })
    );
  }

  #[test]
  fn test_debug_lists_task_names() {
    let branch = Branch::new("b")
      .task(FnTask::new("one", || Ok(())))
      .task(FnTask::new("two", || Ok(())));
    let debug = format!("{:?}", branch);
    assert!(debug.contains("one"));
    assert!(debug.contains("two"));
  }
}
