//! The work-item lifecycle transition table.
//!
//! ```text
//! Draft --submit--> Submitted --begin_review--> UnderReview
//! UnderReview --approve--> Approved --start--> InProgress --complete--> Completed
//! UnderReview --reject--> Rejected
//! any non-terminal --cancel--> Cancelled
//! Submitted | UnderReview | Approved | InProgress --assign--> (same state)
//! ```
//!
//! This module answers only "is this action structurally valid from this
//! state". Who may perform it is decided by [`crate::policy`].

use crate::work_item::{WorkItemAction, WorkItemStatus};

/// One forward edge of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: WorkItemStatus,
    pub action: WorkItemAction,
    pub to: WorkItemStatus,
}

const fn rule(from: WorkItemStatus, action: WorkItemAction, to: WorkItemStatus) -> TransitionRule {
    TransitionRule { from, action, to }
}

/// Forward edges. `cancel` and `assign` apply to whole groups of states and
/// are handled in [`next_status`].
pub const FORWARD_TRANSITIONS: &[TransitionRule] = &[
    rule(WorkItemStatus::Draft, WorkItemAction::Submit, WorkItemStatus::Submitted),
    rule(WorkItemStatus::Submitted, WorkItemAction::BeginReview, WorkItemStatus::UnderReview),
    rule(WorkItemStatus::UnderReview, WorkItemAction::Approve, WorkItemStatus::Approved),
    rule(WorkItemStatus::UnderReview, WorkItemAction::Reject, WorkItemStatus::Rejected),
    rule(WorkItemStatus::Approved, WorkItemAction::Start, WorkItemStatus::InProgress),
    rule(WorkItemStatus::InProgress, WorkItemAction::Complete, WorkItemStatus::Completed),
];

/// The status `action` leads to from `current`, or `None` if the action does
/// not apply in that state.
pub fn next_status(current: WorkItemStatus, action: WorkItemAction) -> Option<WorkItemStatus> {
    match action {
        WorkItemAction::Cancel => (!current.is_terminal()).then_some(WorkItemStatus::Cancelled),
        WorkItemAction::Assign => {
            (!current.is_terminal() && current != WorkItemStatus::Draft).then_some(current)
        }
        _ => FORWARD_TRANSITIONS
            .iter()
            .find(|r| r.from == current && r.action == action)
            .map(|r| r.to),
    }
}

/// Actions that are structurally valid from `current`, in declaration order.
pub fn available_actions(current: WorkItemStatus) -> Vec<WorkItemAction> {
    WorkItemAction::ALL
        .iter()
        .copied()
        .filter(|a| next_status(current, *a).is_some())
        .collect()
}

/// Statuses that can edit location, severity and payload.
pub fn is_editable(status: WorkItemStatus) -> bool {
    matches!(status, WorkItemStatus::Draft | WorkItemStatus::Submitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_completed() {
        let mut status = WorkItemStatus::Draft;
        for action in [
            WorkItemAction::Submit,
            WorkItemAction::BeginReview,
            WorkItemAction::Approve,
            WorkItemAction::Start,
            WorkItemAction::Complete,
        ] {
            status = next_status(status, action).expect("happy path step should be valid");
        }
        assert_eq!(status, WorkItemStatus::Completed);
    }

    #[test]
    fn reject_only_from_under_review() {
        for from in WorkItemStatus::ALL {
            let expected = (*from == WorkItemStatus::UnderReview).then_some(WorkItemStatus::Rejected);
            assert_eq!(next_status(*from, WorkItemAction::Reject), expected, "from {from}");
        }
    }

    #[test]
    fn cancel_from_every_non_terminal_state() {
        for from in WorkItemStatus::ALL {
            let result = next_status(*from, WorkItemAction::Cancel);
            if from.is_terminal() {
                assert_eq!(result, None, "cancel must not apply to terminal {from}");
            } else {
                assert_eq!(result, Some(WorkItemStatus::Cancelled));
            }
        }
    }

    #[test]
    fn assign_keeps_the_current_state() {
        assert_eq!(
            next_status(WorkItemStatus::Approved, WorkItemAction::Assign),
            Some(WorkItemStatus::Approved)
        );
        assert_eq!(next_status(WorkItemStatus::Draft, WorkItemAction::Assign), None);
        assert_eq!(next_status(WorkItemStatus::Completed, WorkItemAction::Assign), None);
    }

    #[test]
    fn terminal_states_have_no_actions() {
        for status in [
            WorkItemStatus::Rejected,
            WorkItemStatus::Completed,
            WorkItemStatus::Cancelled,
        ] {
            assert!(available_actions(status).is_empty(), "{status} should be final");
        }
    }

    #[test]
    fn draft_can_only_be_submitted_or_cancelled() {
        assert_eq!(
            available_actions(WorkItemStatus::Draft),
            vec![WorkItemAction::Submit, WorkItemAction::Cancel]
        );
    }

    #[test]
    fn forward_edges_are_unique_per_state_and_action() {
        for (i, a) in FORWARD_TRANSITIONS.iter().enumerate() {
            for b in &FORWARD_TRANSITIONS[i + 1..] {
                assert!(!(a.from == b.from && a.action == b.action));
            }
        }
    }

    #[test]
    fn only_draft_and_submitted_are_editable() {
        let editable: Vec<_> = WorkItemStatus::ALL
            .iter()
            .copied()
            .filter(|s| is_editable(*s))
            .collect();
        assert_eq!(editable, vec![WorkItemStatus::Draft, WorkItemStatus::Submitted]);
    }
}
