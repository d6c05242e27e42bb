//! Job-level failures.

use serde::{Deserialize, Serialize};
use splitflow_task::TaskError;
use thiserror::Error;

/// A sibling branch that did not succeed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchFailure {
  pub branch: String,
  pub cause: TaskError,
}

/// Why a job run as a whole was marked failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobFailure {
  /// The master branch failed, so no sibling was started.
  #[error("job run '{job_id}' failed in master branch '{branch}': {cause}")]
  MasterFailed {
    job_id: String,
    branch: String,
    #[source]
    cause: TaskError,
  },

  /// One or more sibling branches failed or timed out.
  #[error("job run '{job_id}' failed: {} sibling branch(es) did not succeed", failures.len())]
  BranchesFailed {
    job_id: String,
    failures: Vec<BranchFailure>,
  },
}
