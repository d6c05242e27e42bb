//! Run identifier sources.

use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies a unique identifier for each job run.
pub trait RunIdSource: Send + Sync {
  fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Default)]
pub struct UuidRunIds;

impl RunIdSource for UuidRunIds {
  fn next_id(&self) -> String {
    uuid::Uuid::new_v4().to_string()
  }
}

/// `"<prefix>-<n>"` with `n` increasing by one per run.
#[derive(Debug)]
pub struct IncrementingRunIds {
  prefix: String,
  next: AtomicU64,
}

impl IncrementingRunIds {
  /// Start counting at 1.
  pub fn new(prefix: impl Into<String>) -> Self {
    Self::starting_at(prefix, 1)
  }

  /// Continue from a known run number, e.g. one past the last persisted run.
  pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
    Self {
      prefix: prefix.into(),
      next: AtomicU64::new(first),
    }
  }
}

impl RunIdSource for IncrementingRunIds {
  fn next_id(&self) -> String {
    let n = self.next.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", self.prefix, n)
  }
}
