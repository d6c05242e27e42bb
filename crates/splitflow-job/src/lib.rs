//! Splitflow Job
//!
//! This crate provides the runnable job representation for splitflow.
//!
//! ```text
//! Job
//! ├── master: Branch        - runs first, on the caller's task
//! └── siblings: Vec<Branch> - fan out once the master succeeds
//!
//! Branch
//! └── run() -> RunResult    - tasks in order, stop at the first failure
//!
//! JobRun
//! └── master result + one RunResult per sibling + overall status
//! ```
//!
//! Key differences from `splitflow-config`:
//! - Tasks are live [`splitflow_task::Task`] objects, not definitions
//! - Branches can be run and report a [`RunResult`]
//! - A [`JobRun`] records the outcome of one execution

mod branch;
mod error;
mod job;
mod result;

pub use branch::Branch;
pub use error::{BranchFailure, JobFailure};
pub use job::{Job, JobBuilder};
pub use result::{JobRun, JobStatus, RunResult, RunStatus};
