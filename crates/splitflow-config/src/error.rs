use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read job file {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse job definition: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("job name must not be empty")]
  EmptyJobName,

  #[error("branch name must not be empty")]
  EmptyBranchName,

  #[error("duplicate branch name: {0}")]
  DuplicateBranch(String),

  #[error("invalid scheduler settings: {0}")]
  InvalidSettings(String),
}
