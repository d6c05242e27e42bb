//! Tasks for splitflow.
//!
//! A [`Task`] is one opaque unit of work. The scheduler only ever calls
//! [`Task::execute`] once per run and looks at whether it returned an error;
//! it never inspects or retries what happens inside.
//!
//! Tasks can be implemented directly, wrapped from closures with [`FnTask`],
//! or built from a [`splitflow_config::TaskDef`] with [`build_task`].

mod actions;
mod error;
mod task;

pub use actions::{FailTask, LogTask, SleepTask, build_task};
pub use error::TaskError;
pub use task::{FnTask, Task};
