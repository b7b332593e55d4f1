//! Moderation state machine
//!
//! A submission moves Pending -> Approved or Pending -> Rejected, both
//! terminal. The state is derived from the stored flags so the three
//! columns can never disagree with the workflow's view of them.

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived review state of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Pending,
    Approved,
    Rejected,
}

impl ReviewState {
    /// Derive the state from the stored flags.
    ///
    /// A reviewed row that carries neither flag is treated as rejected;
    /// rows written before the rejected flag existed look like that.
    pub fn of(reviewed: bool, approved: bool, rejected: bool) -> Self {
        match (reviewed, approved, rejected) {
            (false, _, _) => ReviewState::Pending,
            (true, true, _) => ReviewState::Approved,
            (true, false, _) => ReviewState::Rejected,
        }
    }

    /// Check whether this state accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReviewState::Approved | ReviewState::Rejected)
    }

    /// Require that a decision is still possible for this submission
    pub fn ensure_pending(&self, submission_id: Uuid) -> Result<()> {
        if self.is_terminal() {
            Err(AppError::AlreadyReviewed {
                id: submission_id.to_string(),
            })
        } else {
            Ok(())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_derivation() {
        assert_eq!(ReviewState::of(false, false, false), ReviewState::Pending);
        assert_eq!(ReviewState::of(true, true, false), ReviewState::Approved);
        assert_eq!(ReviewState::of(true, false, true), ReviewState::Rejected);
    }

    #[test]
    fn test_unreviewed_flags_ignored() {
        // reviewed=false dominates whatever the other flags claim
        assert_eq!(ReviewState::of(false, true, false), ReviewState::Pending);
        assert_eq!(ReviewState::of(false, false, true), ReviewState::Pending);
    }

    #[test]
    fn test_reviewed_without_flags_is_rejected() {
        assert_eq!(ReviewState::of(true, false, false), ReviewState::Rejected);
    }

    #[test]
    fn test_terminal_states_refuse_further_review() {
        let id = Uuid::new_v4();
        assert!(ReviewState::Pending.ensure_pending(id).is_ok());

        for state in [ReviewState::Approved, ReviewState::Rejected] {
            let err = state.ensure_pending(id).unwrap_err();
            assert!(matches!(err, AppError::AlreadyReviewed { .. }));
        }
    }

    #[test]
    fn test_pending_is_not_terminal() {
        assert!(!ReviewState::Pending.is_terminal());
        assert!(ReviewState::Approved.is_terminal());
        assert!(ReviewState::Rejected.is_terminal());
    }
}
