//! Per-run lifecycle.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Where a single job run is in its lifecycle.
///
/// ```text
/// NotStarted -> MasterRunning -> MasterFailed
///                             -> SiblingsRunning -> Joined
/// ```
///
/// `MasterFailed` and `Joined` are terminal. No state is entered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
  NotStarted,
  MasterRunning,
  MasterFailed,
  SiblingsRunning,
  Joined,
}

impl RunState {
  pub fn is_terminal(self) -> bool {
    matches!(self, RunState::MasterFailed | RunState::Joined)
  }

  pub fn can_advance_to(self, next: RunState) -> bool {
    matches!(
      (self, next),
      (RunState::NotStarted, RunState::MasterRunning)
        | (RunState::MasterRunning, RunState::MasterFailed)
        | (RunState::MasterRunning, RunState::SiblingsRunning)
        | (RunState::SiblingsRunning, RunState::Joined)
    )
  }

  pub fn advance(self, next: RunState) -> Result<RunState, StateError> {
    if self.can_advance_to(next) {
      Ok(next)
    } else {
      Err(StateError {
        from: self,
        to: next,
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [RunState; 5] = [
    RunState::NotStarted,
    RunState::MasterRunning,
    RunState::MasterFailed,
    RunState::SiblingsRunning,
    RunState::Joined,
  ];

  #[test]
  fn test_happy_path() {
    let state = RunState::NotStarted
      .advance(RunState::MasterRunning)
      .and_then(|s| s.advance(RunState::SiblingsRunning))
      .and_then(|s| s.advance(RunState::Joined))
      .unwrap();
    assert!(state.is_terminal());
  }

  #[test]
  fn test_master_failure_path() {
    let state = RunState::NotStarted
      .advance(RunState::MasterRunning)
      .and_then(|s| s.advance(RunState::MasterFailed))
      .unwrap();
    assert!(state.is_terminal());
  }

  #[test]
  fn test_terminal_states_go_nowhere() {
    for terminal in [RunState::MasterFailed, RunState::Joined] {
      for next in ALL {
        assert!(terminal.advance(next).is_err(), "{:?} -> {:?}", terminal, next);
      }
    }
  }

  #[test]
  fn test_no_state_is_reentered() {
    for state in ALL {
      assert!(!state.can_advance_to(state));
    }
  }

  #[test]
  fn test_siblings_cannot_start_before_master() {
    let err = RunState::NotStarted
      .advance(RunState::SiblingsRunning)
      .unwrap_err();
    assert_eq!(err.from, RunState::NotStarted);
    assert_eq!(err.to, RunState::SiblingsRunning);
  }
}
