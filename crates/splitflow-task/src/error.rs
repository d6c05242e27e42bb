//! Task errors.

use std::any::Any;

use serde::{Deserialize, Serialize};

/// Why a task, and therefore its branch, did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskError {
  /// The task's action returned an error.
  #[error("task '{task}' failed: {message}")]
  Failed { task: String, message: String },

  /// The task's action panicked.
  #[error("task '{task}' panicked: {message}")]
  Panicked { task: String, message: String },

  /// The branch had not reported when the scheduler's deadline expired.
  #[error("branch '{branch}' did not finish before the deadline")]
  TimedOut { branch: String },
}

impl TaskError {
  pub fn failed(task: impl Into<String>, message: impl Into<String>) -> Self {
    TaskError::Failed {
      task: task.into(),
      message: message.into(),
    }
  }

  /// Build a `Panicked` error from a caught panic payload.
  pub fn panicked(task: impl Into<String>, payload: Box<dyn Any + Send>) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
      (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "unknown panic payload".to_string()
    };

    TaskError::Panicked {
      task: task.into(),
      message,
    }
  }

  pub fn timed_out(branch: impl Into<String>) -> Self {
    TaskError::TimedOut {
      branch: branch.into(),
    }
  }
}
