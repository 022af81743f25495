//! Status transition rules.
//!
//! The deployed behaviour is [`TransitionPolicy::Permissive`]: any status may
//! move to any status, including itself, and every such update is audited.
//! [`TransitionPolicy::Lifecycle`] restricts updates to the adjacency below.
//!
//! ```text
//! open        -> in_progress | resolved | closed | rejected
//! in_progress -> open | resolved | closed | rejected
//! resolved    -> in_progress | closed
//! rejected    -> open
//! closed      -> (terminal)
//! ```

use super::ComplaintStatus;

/// Transition rejected by the active policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move a complaint from {from} to {to}")]
pub struct TransitionRejected {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
}

/// Which status updates the workflow accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Accept every target status.
    #[default]
    Permissive,
    /// Accept only the lifecycle adjacency documented on this module.
    Lifecycle,
}

impl TransitionPolicy {
    /// Check a transition from the current status to the requested one.
    ///
    /// # Examples
    /// ```
    /// use complaint_desk::domain::{ComplaintStatus, TransitionPolicy};
    ///
    /// let policy = TransitionPolicy::Lifecycle;
    /// assert!(policy.check(ComplaintStatus::Open, ComplaintStatus::InProgress).is_ok());
    /// assert!(policy.check(ComplaintStatus::Closed, ComplaintStatus::Open).is_err());
    /// assert!(TransitionPolicy::Permissive
    ///     .check(ComplaintStatus::Closed, ComplaintStatus::Open)
    ///     .is_ok());
    /// ```
    pub fn check(self, from: ComplaintStatus, to: ComplaintStatus) -> Result<(), TransitionRejected> {
        let allowed = match self {
            Self::Permissive => true,
            Self::Lifecycle => lifecycle_allows(from, to),
        };
        if allowed {
            Ok(())
        } else {
            Err(TransitionRejected { from, to })
        }
    }
}

fn lifecycle_allows(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    use ComplaintStatus::{Closed, InProgress, Open, Rejected, Resolved};

    matches!(
        (from, to),
        (Open, InProgress | Resolved | Closed | Rejected)
            | (InProgress, Open | Resolved | Closed | Rejected)
            | (Resolved, InProgress | Closed)
            | (Rejected, Open)
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn permissive_accepts_every_pair() {
        for from in ComplaintStatus::ALL {
            for to in ComplaintStatus::ALL {
                assert!(TransitionPolicy::Permissive.check(from, to).is_ok());
            }
        }
    }

    #[rstest]
    fn lifecycle_rejects_self_transitions() {
        for status in ComplaintStatus::ALL {
            assert_eq!(
                TransitionPolicy::Lifecycle.check(status, status),
                Err(TransitionRejected {
                    from: status,
                    to: status
                })
            );
        }
    }

    #[rstest]
    fn closed_is_terminal_under_lifecycle() {
        for to in ComplaintStatus::ALL {
            assert!(TransitionPolicy::Lifecycle
                .check(ComplaintStatus::Closed, to)
                .is_err());
        }
    }

    #[rstest]
    #[case(ComplaintStatus::Resolved, ComplaintStatus::Open)]
    #[case(ComplaintStatus::Rejected, ComplaintStatus::Resolved)]
    fn lifecycle_rejects_skips(#[case] from: ComplaintStatus, #[case] to: ComplaintStatus) {
        assert!(TransitionPolicy::Lifecycle.check(from, to).is_err());
    }

    #[rstest]
    fn rejection_message_names_both_statuses() {
        let err = TransitionRejected {
            from: ComplaintStatus::Closed,
            to: ComplaintStatus::Open,
        };
        assert_eq!(err.to_string(), "cannot move a complaint from closed to open");
    }
}
