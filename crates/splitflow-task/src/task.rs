use async_trait::async_trait;

use crate::error::TaskError;

/// A named unit of work, invoked exactly once per run.
///
/// Implementations must not share mutable state with tasks in other branches;
/// siblings run concurrently with no synchronization between them.
#[async_trait]
pub trait Task: Send + Sync {
  /// Name used in run results and log fields.
  fn name(&self) -> &str;

  /// Run the task's action.
  async fn execute(&self) -> Result<(), TaskError>;
}

/// A task backed by a synchronous closure.
///
/// An `Err(message)` from the closure becomes [`TaskError::Failed`].
pub struct FnTask<F> {
  name: String,
  action: F,
}

impl<F> FnTask<F>
where
  F: Fn() -> Result<(), String> + Send + Sync,
{
  pub fn new(name: impl Into<String>, action: F) -> Self {
    Self {
      name: name.into(),
      action,
    }
  }
}

#[async_trait]
impl<F> Task for FnTask<F>
where
  F: Fn() -> Result<(), String> + Send + Sync,
{
  fn name(&self) -> &str {
    &self.name
  }

  async fn execute(&self) -> Result<(), TaskError> {
    (self.action)().map_err(|message| TaskError::failed(&self.name, message))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[tokio::test]
  async fn test_fn_task_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let task = FnTask::new("count", move || {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(())
    });

    assert_eq!(task.name(), "count");
    assert!(task.execute().await.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_fn_task_failure_names_task() {
    let task = FnTask::new("broken", || Err("disk full".to_string()));

    let err = task.execute().await.unwrap_err();
    assert_eq!(err, TaskError::failed("broken", "disk full"));
  }
}
