//! Run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitflow_task::TaskError;

use crate::error::{BranchFailure, JobFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
  Success,
  Failed,
  TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
  Success,
  Failed,
}

/// Outcome of running one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
  pub branch_name: String,
  pub status: RunStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<TaskError>,
  /// Tasks that finished successfully before the branch stopped.
  pub tasks_completed: usize,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
}

impl RunResult {
  pub fn success(
    branch_name: impl Into<String>,
    tasks_completed: usize,
    started_at: DateTime<Utc>,
  ) -> Self {
    Self {
      branch_name: branch_name.into(),
      status: RunStatus::Success,
      error: None,
      tasks_completed,
      started_at,
      finished_at: Utc::now(),
    }
  }

  pub fn failed(
    branch_name: impl Into<String>,
    error: TaskError,
    tasks_completed: usize,
    started_at: DateTime<Utc>,
  ) -> Self {
    Self {
      branch_name: branch_name.into(),
      status: RunStatus::Failed,
      error: Some(error),
      tasks_completed,
      started_at,
      finished_at: Utc::now(),
    }
  }

  /// Result for a branch that had not reported when the deadline expired.
  pub fn timed_out(branch_name: impl Into<String>, started_at: DateTime<Utc>) -> Self {
    let branch_name = branch_name.into();
    Self {
      error: Some(TaskError::timed_out(&branch_name)),
      branch_name,
      status: RunStatus::TimedOut,
      tasks_completed: 0,
      started_at,
      finished_at: Utc::now(),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == RunStatus::Success
  }
}

/// The record of one job execution.
///
/// Built once by the scheduler when the run reaches a terminal state; the
/// overall status is derived from the branch results at construction and the
/// record is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRun {
  id: String,
  job_name: String,
  master_result: RunResult,
  branch_results: Vec<RunResult>,
  overall_status: JobStatus,
  started_at: DateTime<Utc>,
  finished_at: DateTime<Utc>,
}

impl JobRun {
  pub fn new(
    id: impl Into<String>,
    job_name: impl Into<String>,
    master_result: RunResult,
    branch_results: Vec<RunResult>,
    started_at: DateTime<Utc>,
  ) -> Self {
    let overall_status =
      if master_result.is_success() && branch_results.iter().all(RunResult::is_success) {
        JobStatus::Success
      } else {
        JobStatus::Failed
      };

    Self {
      id: id.into(),
      job_name: job_name.into(),
      master_result,
      branch_results,
      overall_status,
      started_at,
      finished_at: Utc::now(),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn job_name(&self) -> &str {
    &self.job_name
  }

  pub fn master_result(&self) -> &RunResult {
    &self.master_result
  }

  /// Sibling results in declaration order. Empty when the master failed.
  pub fn branch_results(&self) -> &[RunResult] {
    &self.branch_results
  }

  pub fn branch_result(&self, branch_name: &str) -> Option<&RunResult> {
    self
      .branch_results
      .iter()
      .find(|r| r.branch_name == branch_name)
  }

  pub fn overall_status(&self) -> JobStatus {
    self.overall_status
  }

  pub fn is_success(&self) -> bool {
    self.overall_status == JobStatus::Success
  }

  pub fn started_at(&self) -> DateTime<Utc> {
    self.started_at
  }

  pub fn finished_at(&self) -> DateTime<Utc> {
    self.finished_at
  }

  /// Names and causes of every branch that did not succeed, master first.
  pub fn failures(&self) -> Vec<(&str, &TaskError)> {
    std::iter::once(&self.master_result)
      .chain(self.branch_results.iter())
      .filter_map(|r| r.error.as_ref().map(|e| (r.branch_name.as_str(), e)))
      .collect()
  }

  /// `Ok(self)` for a successful run, otherwise the aggregated failure.
  pub fn into_result(self) -> Result<JobRun, JobFailure> {
    if self.is_success() {
      return Ok(self);
    }

    if let Some(cause) = self.master_result.error.clone() {
      return Err(JobFailure::MasterFailed {
        job_id: self.id,
        branch: self.master_result.branch_name,
        cause,
      });
    }

    let failures = self
      .branch_results
      .iter()
      .filter_map(|r| {
        r.error.as_ref().map(|cause| BranchFailure {
          branch: r.branch_name.clone(),
          cause: cause.clone(),
        })
      })
      .collect();

    Err(JobFailure::BranchesFailed {
      job_id: self.id,
      failures,
    })
  }
}
