use splitflow_config::{BranchDef, JobDef};
use splitflow_task::build_task;

use crate::branch::Branch;

/// A runnable job: a master branch and the siblings that fan out after it.
#[derive(Debug, Clone)]
pub struct Job {
  pub name: String,
  pub master: Branch,
  pub siblings: Vec<Branch>,
}

impl Job {
  pub fn new(name: impl Into<String>, master: Branch, siblings: Vec<Branch>) -> Self {
    Self {
      name: name.into(),
      master,
      siblings,
    }
  }

  pub fn builder(name: impl Into<String>, master: Branch) -> JobBuilder {
    JobBuilder {
      job: Job::new(name, master, Vec::new()),
    }
  }

  /// Build live branches from a job definition.
  ///
  /// The definition is expected to have been validated already
  /// (see [`JobDef::validate`]).
  pub fn from_def(def: &JobDef) -> Self {
    Job::new(
      &def.name,
      branch_from_def(&def.master),
      def.branches.iter().map(branch_from_def).collect(),
    )
  }
}

fn branch_from_def(def: &BranchDef) -> Branch {
  Branch::with_tasks(&def.name, def.tasks.iter().map(build_task).collect())
}

/// Sugar for assembling a [`Job`] one sibling at a time.
pub struct JobBuilder {
  job: Job,
}

impl JobBuilder {
  pub fn sibling(mut self, branch: Branch) -> Self {
    self.job.siblings.push(branch);
    self
  }

  pub fn build(self) -> Job {
    self.job
  }
}
