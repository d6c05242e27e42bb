//! Reporting sinks for completed runs.

use std::sync::Mutex;

use splitflow_job::JobRun;
use tracing::{error, info};

/// Receives each completed [`JobRun`] exactly once.
pub trait ReportSink: Send + Sync {
  fn report(&self, run: &JobRun);
}

/// Discards reports.
#[derive(Debug, Clone, Default)]
pub struct NoopSink;

impl ReportSink for NoopSink {
  fn report(&self, _run: &JobRun) {}
}

/// Writes a summary of each run to the tracing subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
  fn report(&self, run: &JobRun) {
    let elapsed_ms = (run.finished_at() - run.started_at()).num_milliseconds();

    if run.is_success() {
      info!(
        job_id = %run.id(),
        job = %run.job_name(),
        branches = run.branch_results().len(),
        elapsed_ms,
        "job run succeeded"
      );
      return;
    }

    for (branch, cause) in run.failures() {
      error!(job_id = %run.id(), branch = %branch, error = %cause, "branch did not succeed");
    }
    error!(
      job_id = %run.id(),
      job = %run.job_name(),
      elapsed_ms,
      "job run failed"
    );
  }
}

/// Keeps every reported run in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
  runs: Mutex<Vec<JobRun>>,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of the runs reported so far, oldest first.
  pub fn runs(&self) -> Vec<JobRun> {
    self
      .runs
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .clone()
  }

  pub fn len(&self) -> usize {
    self
      .runs
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl ReportSink for MemorySink {
  fn report(&self, run: &JobRun) {
    self
      .runs
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .push(run.clone());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use splitflow_job::RunResult;

  #[test]
  fn test_memory_sink_keeps_order() {
    let sink = MemorySink::new();
    assert!(sink.is_empty());

    for id in ["a", "b"] {
      let master = RunResult::success("m", 0, Utc::now());
      sink.report(&JobRun::new(id, "job", master, vec![], Utc::now()));
    }

    let ids: Vec<_> = sink.runs().iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(sink.len(), 2);
  }
}
