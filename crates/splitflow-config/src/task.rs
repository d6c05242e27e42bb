use serde::{Deserialize, Serialize};

/// A single named step inside a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
  pub name: String,
  pub action: ActionDef,
}

impl TaskDef {
  pub fn new(name: impl Into<String>, action: ActionDef) -> Self {
    Self {
      name: name.into(),
      action,
    }
  }

  /// A task that logs `count - 1` numbered tokens under `message`.
  pub fn log(name: impl Into<String>, message: impl Into<String>, count: u32) -> Self {
    Self::new(
      name,
      ActionDef::Log {
        message: message.into(),
        count,
      },
    )
  }
}

/// The built-in actions a task definition can name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDef {
  /// Emit `"<message> token:<n>"` for every `n` in `1..count`.
  Log {
    message: String,
    #[serde(default = "default_log_count")]
    count: u32,
  },
  /// Fail unconditionally.
  Fail { message: String },
  /// Sleep, then succeed.
  Sleep { ms: u64 },
}

fn default_log_count() -> u32 {
  100
}
