//! Splitflow Config
//!
//! This crate contains the serializable job configuration types for splitflow.
//! These types describe a job before it is built into runnable branches and
//! handed to the scheduler.
//!
//! Configuration can be loaded from:
//! - JSON files (via CLI with `splitflow run job.json`)
//! - Any string holding a JSON job definition
//!
//! A job is one master branch followed by a set of sibling branches that run
//! concurrently once the master has succeeded.

mod error;
mod job;
mod settings;
mod task;

pub use error::ConfigError;
pub use job::{BranchDef, JobDef};
pub use settings::SchedulerSettings;
pub use task::{ActionDef, TaskDef};
