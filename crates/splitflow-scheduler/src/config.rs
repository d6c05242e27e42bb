//! Scheduler configuration.

use std::time::Duration;

use splitflow_config::SchedulerSettings;
use tokio::sync::Semaphore;

use crate::error::SchedulerError;

/// Configuration for the scheduler.
///
/// The default runs one execution context per sibling with no bound and waits
/// for every sibling to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
  /// Upper bound on siblings running at the same time. Siblings over the
  /// bound wait for a slot; none is skipped.
  pub max_concurrent_branches: Option<usize>,

  /// How long the join waits for siblings before reporting the stragglers
  /// as timed out. Stragglers are left running.
  pub deadline: Option<Duration>,
}

impl SchedulerConfig {
  pub fn from_settings(settings: &SchedulerSettings) -> Result<Self, SchedulerError> {
    let config = Self {
      max_concurrent_branches: settings.max_concurrent_branches,
      deadline: settings.deadline_ms.map(Duration::from_millis),
    };
    config.validate()?;
    Ok(config)
  }

  pub fn with_max_concurrent_branches(mut self, max: usize) -> Self {
    self.max_concurrent_branches = Some(max);
    self
  }

  pub fn with_deadline(mut self, deadline: Duration) -> Self {
    self.deadline = Some(deadline);
    self
  }

  pub fn validate(&self) -> Result<(), SchedulerError> {
    if self.max_concurrent_branches == Some(0) {
      return Err(SchedulerError::InvalidConfig {
        message: "max_concurrent_branches must be greater than 0".to_string(),
      });
    }

    if self
      .max_concurrent_branches
      .is_some_and(|max| max > Semaphore::MAX_PERMITS)
    {
      return Err(SchedulerError::InvalidConfig {
        message: format!(
          "max_concurrent_branches must be at most {}",
          Semaphore::MAX_PERMITS
        ),
      });
    }

    if self.deadline == Some(Duration::ZERO) {
      return Err(SchedulerError::InvalidConfig {
        message: "deadline must be greater than 0".to_string(),
      });
    }

    Ok(())
  }
}
