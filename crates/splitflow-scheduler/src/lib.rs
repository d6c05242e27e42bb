//! Splitflow Scheduler
//!
//! This crate runs jobs: the master branch first, then every sibling branch
//! concurrently, then a join that waits for all of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         JobRunner                           │
//! │  - owns the Job, a RunIdSource and a ReportSink             │
//! │  - run() draws an id, schedules, reports once               │
//! │  - start(cancel) runs once per trigger on its channel       │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Scheduler                           │
//! │  - run_job(id, job) → JobRun                                │
//! │  - master on the caller's task, siblings on spawned tasks   │
//! │  - optional admission bound and join deadline               │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Branch                             │
//! │  - tasks in order, stop at the first failure                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use splitflow_scheduler::{JobRunner, Scheduler, SchedulerConfig};
//!
//! let scheduler = Arc::new(Scheduler::new(SchedulerConfig::default())?);
//! let runner = JobRunner::new(job, scheduler);
//!
//! let run = runner.run().await;
//! assert!(run.is_success());
//! ```

mod config;
mod error;
mod events;
mod ids;
mod runner;
mod scheduler;
mod sink;
mod state;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, StateError};
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use ids::{IncrementingRunIds, RunIdSource, UuidRunIds};
pub use runner::JobRunner;
pub use scheduler::Scheduler;
pub use sink::{LogSink, MemorySink, NoopSink, ReportSink};
pub use state::RunState;

pub use splitflow_job::{Branch, Job, JobFailure, JobRun, JobStatus, RunResult, RunStatus};
