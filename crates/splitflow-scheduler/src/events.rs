//! Execution events and notifiers for observability.
//!
//! Events are emitted while a job runs so consumers can observe progress,
//! stream it to a UI, or assert on it in tests.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a job run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
  /// The run has started; the master branch is next.
  JobStarted { job_id: String, job_name: String },

  /// A branch (master or sibling) has started executing.
  BranchStarted { job_id: String, branch: String },

  /// A branch finished with every task successful.
  BranchCompleted { job_id: String, branch: String },

  /// A branch stopped at a failing task.
  BranchFailed {
    job_id: String,
    branch: String,
    error: String,
  },

  /// A sibling had not reported when the join deadline expired.
  BranchTimedOut { job_id: String, branch: String },

  /// The run finished and every branch succeeded.
  JobCompleted { job_id: String },

  /// The run finished with at least one unsuccessful branch.
  JobFailed {
    job_id: String,
    failed_branches: Vec<String>,
  },
}

/// Trait for receiving execution events.
///
/// The scheduler calls `notify` for each event, from whichever task produced
/// it - implementations decide what to do with them.
pub trait ExecutionNotifier: Send + Sync {
  fn notify(&self, event: ExecutionEvent);
}

/// A notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // Unbounded so a slow consumer never stalls a branch. Volume is a handful
  // of events per branch.
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier along with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExecutionEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_channel_notifier_delivers_in_order() {
    let (notifier, mut receiver) = ChannelNotifier::channel();

    notifier.notify(ExecutionEvent::JobStarted {
      job_id: "r1".to_string(),
      job_name: "job".to_string(),
    });
    notifier.notify(ExecutionEvent::JobCompleted {
      job_id: "r1".to_string(),
    });

    assert!(matches!(
      receiver.try_recv(),
      Ok(ExecutionEvent::JobStarted { .. })
    ));
    assert!(matches!(
      receiver.try_recv(),
      Ok(ExecutionEvent::JobCompleted { .. })
    ));
    assert!(receiver.try_recv().is_err());
  }

  #[test]
  fn test_channel_notifier_survives_dropped_receiver() {
    let (notifier, receiver) = ChannelNotifier::channel();
    drop(receiver);

    notifier.notify(ExecutionEvent::JobCompleted {
      job_id: "r1".to_string(),
    });
  }
}
