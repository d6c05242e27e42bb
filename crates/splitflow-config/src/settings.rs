use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Scheduler knobs that can travel with a job file.
///
/// Both fields are optional: an absent `max_concurrent_branches` means one
/// execution context per sibling with no bound, and an absent `deadline_ms`
/// means the join waits for every sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSettings {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_concurrent_branches: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deadline_ms: Option<u64>,
}

impl SchedulerSettings {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_concurrent_branches == Some(0) {
      return Err(ConfigError::InvalidSettings(
        "max_concurrent_branches must be greater than 0".to_string(),
      ));
    }
    if self.deadline_ms == Some(0) {
      return Err(ConfigError::InvalidSettings(
        "deadline_ms must be greater than 0".to_string(),
      ));
    }
    Ok(())
  }

  /// Layer `other` on top of `self`; fields set in `other` win.
  pub fn merge(&self, other: &SchedulerSettings) -> SchedulerSettings {
    SchedulerSettings {
      max_concurrent_branches: other
        .max_concurrent_branches
        .or(self.max_concurrent_branches),
      deadline_ms: other.deadline_ms.or(self.deadline_ms),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_settings_are_valid() {
    assert!(SchedulerSettings::default().validate().is_ok());
  }

  #[test]
  fn test_zero_bound_rejected() {
    let settings = SchedulerSettings {
      max_concurrent_branches: Some(0),
      deadline_ms: None,
    };
    assert!(matches!(
      settings.validate(),
      Err(ConfigError::InvalidSettings(_))
    ));
  }

  #[test]
  fn test_zero_deadline_rejected() {
    let settings = SchedulerSettings {
      max_concurrent_branches: None,
      deadline_ms: Some(0),
    };
    assert!(settings.validate().is_err());
  }

  #[test]
  fn test_merge_prefers_override() {
    let base = SchedulerSettings {
      max_concurrent_branches: Some(4),
      deadline_ms: Some(1_000),
    };
    let cli = SchedulerSettings {
      max_concurrent_branches: Some(1),
      deadline_ms: None,
    };

    let merged = base.merge(&cli);
    assert_eq!(merged.max_concurrent_branches, Some(1));
    assert_eq!(merged.deadline_ms, Some(1_000));
  }
}
