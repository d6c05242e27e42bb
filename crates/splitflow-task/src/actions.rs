//! Built-in actions that job definitions can reference by name.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use splitflow_config::{ActionDef, TaskDef};
use tracing::info;

use crate::error::TaskError;
use crate::task::Task;

/// Build a runnable task from its definition.
pub fn build_task(def: &TaskDef) -> Arc<dyn Task> {
  match &def.action {
    ActionDef::Log { message, count } => Arc::new(LogTask::new(&def.name, message, *count)),
    ActionDef::Fail { message } => Arc::new(FailTask::new(&def.name, message)),
    ActionDef::Sleep { ms } => Arc::new(SleepTask::new(&def.name, Duration::from_millis(*ms))),
  }
}

/// Logs a run of numbered tokens, one line per token.
#[derive(Debug, Clone)]
pub struct LogTask {
  name: String,
  message: String,
  count: u32,
}

impl LogTask {
  pub fn new(name: impl Into<String>, message: impl Into<String>, count: u32) -> Self {
    Self {
      name: name.into(),
      message: message.into(),
      count,
    }
  }

  /// The lines this task emits, tokens `1..count`.
  pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
    (1..self.count).map(move |token| format!("{} token:{}", self.message, token))
  }
}

#[async_trait]
impl Task for LogTask {
  fn name(&self) -> &str {
    &self.name
  }

  async fn execute(&self) -> Result<(), TaskError> {
    for line in self.lines() {
      info!(task = %self.name, "{}", line);
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct FailTask {
  name: String,
  message: String,
}

impl FailTask {
  pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      message: message.into(),
    }
  }
}

#[async_trait]
impl Task for FailTask {
  fn name(&self) -> &str {
    &self.name
  }

  async fn execute(&self) -> Result<(), TaskError> {
    Err(TaskError::failed(&self.name, &self.message))
  }
}

#[derive(Debug, Clone)]
pub struct SleepTask {
  name: String,
  duration: Duration,
}

impl SleepTask {
  pub fn new(name: impl Into<String>, duration: Duration) -> Self {
    Self {
      name: name.into(),
      duration,
    }
  }
}

#[async_trait]
impl Task for SleepTask {
  fn name(&self) -> &str {
    &self.name
  }

  async fn execute(&self) -> Result<(), TaskError> {
    tokio::time::sleep(self.duration).await;
    Ok(())
  }
}
