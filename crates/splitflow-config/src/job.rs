use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::SchedulerSettings;
use crate::task::TaskDef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDef {
  pub name: String,
  #[serde(default)]
  pub tasks: Vec<TaskDef>,
}

impl BranchDef {
  pub fn new(name: impl Into<String>, tasks: Vec<TaskDef>) -> Self {
    Self {
      name: name.into(),
      tasks,
    }
  }
}

/// A job definition: one master branch, then sibling branches run in parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDef {
  pub name: String,
  #[serde(default, skip_serializing_if = "is_default_settings")]
  pub scheduler: SchedulerSettings,
  pub master: BranchDef,
  #[serde(default)]
  pub branches: Vec<BranchDef>,
}

fn is_default_settings(settings: &SchedulerSettings) -> bool {
  *settings == SchedulerSettings::default()
}

impl JobDef {
  /// Parse and validate a job definition from a JSON string.
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let def: JobDef = serde_json::from_str(json)?;
    def.validate()?;
    Ok(def)
  }

  /// Read, parse and validate a job definition from a JSON file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }

  /// Check naming rules and scheduler settings.
  ///
  /// Branch names (master included) must be non-empty and unique, since run
  /// results are reported per branch name.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.name.trim().is_empty() {
      return Err(ConfigError::EmptyJobName);
    }

    let mut seen = HashSet::new();
    for branch in std::iter::once(&self.master).chain(self.branches.iter()) {
      if branch.name.trim().is_empty() {
        return Err(ConfigError::EmptyBranchName);
      }
      if !seen.insert(branch.name.as_str()) {
        return Err(ConfigError::DuplicateBranch(branch.name.clone()));
      }
    }

    self.scheduler.validate()
  }

  /// The parallel-steps job: `step1` on the master flow, then `step2`,
  /// `step3` and `step4` split across three concurrent flows.
  pub fn parallel_steps() -> Self {
    let step = |name: &str| TaskDef::log(name, format!("Step:{}", name), 100);

    JobDef {
      name: "parallelFlowJob".to_string(),
      scheduler: SchedulerSettings::default(),
      master: BranchDef::new("masterFlow", vec![step("step1")]),
      branches: vec![
        BranchDef::new("flow1", vec![step("step2")]),
        BranchDef::new("flow2", vec![step("step3")]),
        BranchDef::new("flow3", vec![step("step4")]),
      ],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::task::ActionDef;

  #[test]
  fn test_parallel_steps_shape() {
    let def = JobDef::parallel_steps();
    assert!(def.validate().is_ok());
    assert_eq!(def.master.tasks.len(), 1);
    assert_eq!(def.master.tasks[0].name, "step1");
    assert_eq!(def.branches.len(), 3);

    let sibling_steps: Vec<_> = def
      .branches
      .iter()
      .map(|b| b.tasks[0].name.as_str())
      .collect();
    assert_eq!(sibling_steps, vec!["step2", "step3", "step4"]);
  }

  #[test]
  fn test_duplicate_branch_rejected() {
    let mut def = JobDef::parallel_steps();
    def.branches[1].name = "flow1".to_string();

    match def.validate() {
      Err(ConfigError::DuplicateBranch(name)) => assert_eq!(name, "flow1"),
      other => panic!("expected duplicate branch error, got {:?}", other),
    }
  }

  #[test]
  fn test_sibling_may_not_reuse_master_name() {
    let mut def = JobDef::parallel_steps();
    def.branches[0].name = "masterFlow".to_string();
    assert!(matches!(
      def.validate(),
      Err(ConfigError::DuplicateBranch(_))
    ));
  }

  #[test]
  fn test_empty_names_rejected() {
    let mut def = JobDef::parallel_steps();
    def.name = "  ".to_string();
    assert!(matches!(def.validate(), Err(ConfigError::EmptyJobName)));

    let mut def = JobDef::parallel_steps();
    def.branches[2].name = String::new();
    assert!(matches!(def.validate(), Err(ConfigError::EmptyBranchName)));
  }

  #[test]
  fn test_log_count_defaults_to_100() {
    let json = r#"{
      "name": "job",
      "master": { "name": "m", "tasks": [
        { "name": "t", "action": { "type": "log", "message": "hello" } }
      ]}
    }"#;

    let def = JobDef::from_json(json).unwrap();
    assert!(def.branches.is_empty());
    assert_eq!(
      def.master.tasks[0].action,
      ActionDef::Log {
        message: "hello".to_string(),
        count: 100
      }
    );
  }
}
