//! Job runner with channel-based triggering.
//!
//! The `JobRunner` owns one job and executes it through a [`Scheduler`],
//! either directly with [`JobRunner::run`] or once per trigger received on
//! its channel.

use std::sync::Arc;

use splitflow_config::JobDef;
use splitflow_job::{Job, JobRun};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::ids::{RunIdSource, UuidRunIds};
use crate::scheduler::Scheduler;
use crate::sink::{LogSink, ReportSink};

/// Runs one job, reporting every completed run to a sink.
///
/// Every run is fresh: a new identifier, independent results, nothing
/// carried over from earlier runs. Failed runs are not retried.
///
/// # Usage
///
/// ```ignore
/// let runner = JobRunner::from_def(&JobDef::parallel_steps())?;
///
/// // One-shot
/// let run = runner.run().await;
///
/// // Or triggered
/// let sender = runner.sender();
/// let cancel = CancellationToken::new();
/// tokio::spawn(runner.start(cancel.clone()));
/// sender.send(()).await?;
/// ```
pub struct JobRunner {
  context: RunContext,
  sender: mpsc::Sender<()>,
  receiver: mpsc::Receiver<()>,
}

/// Everything needed to execute one run.
struct RunContext {
  job: Job,
  scheduler: Arc<Scheduler>,
  run_ids: Arc<dyn RunIdSource>,
  sink: Arc<dyn ReportSink>,
}

impl RunContext {
  async fn run(&self) -> JobRun {
    let run_id = self.run_ids.next_id();
    let run = self.scheduler.run_job(&run_id, &self.job).await;
    self.sink.report(&run);
    run
  }
}

impl JobRunner {
  /// Create a runner with uuid run ids that reports to the log.
  pub fn new(job: Job, scheduler: Arc<Scheduler>) -> Self {
    Self::with_buffer_size(job, scheduler, 100)
  }

  /// Create a runner with a custom trigger buffer size.
  pub fn with_buffer_size(job: Job, scheduler: Arc<Scheduler>, buffer_size: usize) -> Self {
    let (sender, receiver) = mpsc::channel(buffer_size);
    Self {
      context: RunContext {
        job,
        scheduler,
        run_ids: Arc::new(UuidRunIds),
        sink: Arc::new(LogSink),
      },
      sender,
      receiver,
    }
  }

  /// Build the job and its scheduler from a static definition.
  pub fn from_def(def: &JobDef) -> Result<Self, SchedulerError> {
    def.validate()?;
    let config = SchedulerConfig::from_settings(&def.scheduler)?;
    let scheduler = Arc::new(Scheduler::new(config)?);
    Ok(Self::new(Job::from_def(def), scheduler))
  }

  pub fn with_run_ids(mut self, run_ids: Arc<dyn RunIdSource>) -> Self {
    self.context.run_ids = run_ids;
    self
  }

  pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
    self.context.sink = sink;
    self
  }

  pub fn job(&self) -> &Job {
    &self.context.job
  }

  /// Execute one run and report it.
  pub async fn run(&self) -> JobRun {
    self.context.run().await
  }

  /// Get a sender handle for triggering runs.
  pub fn sender(&self) -> mpsc::Sender<()> {
    self.sender.clone()
  }

  /// Queue one run through the channel.
  pub async fn trigger(&self) -> Result<(), SchedulerError> {
    self
      .sender
      .send(())
      .await
      .map_err(|_| SchedulerError::RunnerClosed)
  }

  /// Start the trigger loop.
  ///
  /// Runs the job once per trigger until the cancellation token fires or
  /// every sender handed out by [`JobRunner::sender`] is gone. Cancellation
  /// is only observed between runs; a run in progress always finishes.
  /// Returns the number of runs executed.
  pub async fn start(self, cancel: CancellationToken) -> usize {
    let Self {
      context,
      sender,
      mut receiver,
    } = self;
    // The loop only listens to external senders.
    drop(sender);

    let job_name = context.job.name.clone();
    info!(job = %job_name, "starting job runner");

    let mut runs = 0;
    loop {
      tokio::select! {
        biased;
        _ = cancel.cancelled() => {
          info!(job = %job_name, "job runner cancelled");
          break;
        }
        trigger = receiver.recv() => {
          match trigger {
            Some(()) => {
              let run = context.run().await;
              runs += 1;
              info!(
                job = %job_name,
                job_id = %run.id(),
                status = ?run.overall_status(),
                "triggered run finished"
              );
            }
            None => {
              info!(job = %job_name, "job runner channel closed");
              break;
            }
          }
        }
      }
    }

    runs
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ids::IncrementingRunIds;
  use crate::sink::MemorySink;
  use splitflow_job::Branch;
  use std::time::Duration;

  fn create_test_runner() -> JobRunner {
    let job = Job::builder("test-job", Branch::new("master"))
      .sibling(Branch::new("a"))
      .build();
    let scheduler = Arc::new(Scheduler::new(SchedulerConfig::default()).unwrap());
    JobRunner::new(job, scheduler)
  }

  #[tokio::test]
  async fn test_runner_creation() {
    let runner = create_test_runner();
    assert_eq!(runner.job().name, "test-job");
  }

  #[tokio::test]
  async fn test_trigger_sends_to_channel() {
    let mut runner = create_test_runner();

    runner.trigger().await.unwrap();

    assert_eq!(runner.receiver.recv().await, Some(()));
  }

  #[tokio::test]
  async fn test_run_reports_once() {
    let sink = Arc::new(MemorySink::new());
    let runner = create_test_runner()
      .with_run_ids(Arc::new(IncrementingRunIds::new("run")))
      .with_sink(sink.clone());

    let run = runner.run().await;

    assert_eq!(run.id(), "run-1");
    assert_eq!(sink.runs(), vec![run]);
  }

  #[tokio::test]
  async fn test_cancellation() {
    let runner = create_test_runner();
    let _sender = runner.sender();

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    let handle = tokio::spawn(async move { runner.start(cancel_clone).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    cancel.cancel();

    assert_eq!(handle.await.unwrap(), 0);
  }

  #[tokio::test]
  async fn test_loop_ends_without_external_senders() {
    let sink = Arc::new(MemorySink::new());
    let runner = create_test_runner().with_sink(sink.clone());

    let runs = tokio::time::timeout(
      Duration::from_secs(5),
      runner.start(CancellationToken::new()),
    )
    .await
    .expect("loop should end once no sender remains");

    assert_eq!(runs, 0);
    assert!(sink.is_empty());
  }

  #[tokio::test]
  async fn test_loop_runs_per_trigger_until_senders_drop() {
    let sink = Arc::new(MemorySink::new());
    let runner = create_test_runner().with_sink(sink.clone());
    let sender = runner.sender();

    sender.send(()).await.unwrap();
    sender.send(()).await.unwrap();
    drop(sender);

    let runs = runner.start(CancellationToken::new()).await;

    assert_eq!(runs, 2);
    assert_eq!(sink.len(), 2);
  }
}
