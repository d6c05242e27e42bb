//! Scheduler errors.

use crate::state::RunState;

/// Errors from configuring or driving the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
  /// Scheduler configuration is unusable.
  #[error("invalid scheduler configuration: {message}")]
  InvalidConfig { message: String },

  /// The job definition could not be turned into a runnable job.
  #[error("invalid job definition")]
  InvalidJob(#[from] splitflow_config::ConfigError),

  /// The runner's trigger channel is closed.
  #[error("job runner channel closed")]
  RunnerClosed,
}

/// A run tried to move between states in a way the lifecycle does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid run state transition: {from:?} -> {to:?}")]
pub struct StateError {
  pub from: RunState,
  pub to: RunState,
}
