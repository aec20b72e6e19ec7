//! Role-based access policy for work items.
//!
//! [`authorize`] is a pure decision over the actor and the already-loaded
//! target. It never fetches anything and has no side effects. Whether an
//! action is valid in the target's current state is a separate question
//! answered by [`crate::transitions`]; callers check that first.
//!
//! Rules:
//! - no actor: denied, authentication required
//! - account not verified: denied
//! - admin: everything
//! - create: any verified actor for damage reports, staff for other kinds
//! - read / update: staff, the owner, or (read only) the assignee
//! - submit: owner
//! - begin_review, approve, reject, assign: staff
//! - start, complete: LGU officers and the assignee
//! - cancel: the owner while the item is still `submitted`
//! - audit trail: admin only

use serde::Serialize;

use crate::account::AccountStatus;
use crate::actor::Actor;
use crate::roles::Role;
use crate::transitions::next_status;
use crate::work_item::{WorkItem, WorkItemAction, WorkItemKind, WorkItemStatus};

pub const REASON_AUTHENTICATION_REQUIRED: &str = "authentication required";
pub const REASON_ACCOUNT_NOT_VERIFIED: &str = "account not verified";
pub const REASON_INSUFFICIENT_ROLE: &str = "insufficient role";
pub const REASON_NOT_OWNER: &str = "not the owner";
pub const REASON_NOT_ASSIGNEE: &str = "not the assignee";
pub const REASON_CANCEL_AFTER_SUBMIT: &str = "owners may only cancel while submitted";
pub const REASON_ADMIN_ONLY: &str = "admin only";
pub const REASON_NO_TARGET: &str = "no target work item";

/// What the caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Create(WorkItemKind),
    Read,
    Update,
    Transition(WorkItemAction),
    ViewAuditTrail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Decision {
    Allowed,
    Denied(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Decide whether `actor` may perform `access` on `target`.
///
/// `target` is required for everything except [`Access::Create`].
pub fn authorize(actor: Option<&Actor>, access: Access, target: Option<&WorkItem>) -> Decision {
    let Some(actor) = actor else {
        return Decision::Denied(REASON_AUTHENTICATION_REQUIRED);
    };
    if actor.account_status != AccountStatus::Verified {
        return Decision::Denied(REASON_ACCOUNT_NOT_VERIFIED);
    }
    if actor.is_admin() {
        return Decision::Allowed;
    }

    match access {
        Access::Create(kind) => allow_if(
            kind.citizen_creatable() || actor.role.is_staff(),
            REASON_INSUFFICIENT_ROLE,
        ),
        Access::ViewAuditTrail => Decision::Denied(REASON_ADMIN_ONLY),
        Access::Read => with_target(target, |item| {
            allow_if(
                actor.role.is_staff()
                    || item.is_owned_by(actor.id)
                    || item.is_assigned_to(actor.id),
                REASON_NOT_OWNER,
            )
        }),
        Access::Update => with_target(target, |item| {
            allow_if(
                actor.role.is_staff() || item.is_owned_by(actor.id),
                REASON_NOT_OWNER,
            )
        }),
        Access::Transition(action) => {
            with_target(target, |item| authorize_transition(actor, action, item))
        }
    }
}

fn authorize_transition(actor: &Actor, action: WorkItemAction, item: &WorkItem) -> Decision {
    match action {
        WorkItemAction::Submit => allow_if(item.is_owned_by(actor.id), REASON_NOT_OWNER),
        WorkItemAction::BeginReview
        | WorkItemAction::Approve
        | WorkItemAction::Reject
        | WorkItemAction::Assign => allow_if(actor.role.is_staff(), REASON_INSUFFICIENT_ROLE),
        WorkItemAction::Start | WorkItemAction::Complete => {
            if actor.role == Role::LguOfficer || item.is_assigned_to(actor.id) {
                Decision::Allowed
            } else if actor.role.is_staff() {
                Decision::Denied(REASON_NOT_ASSIGNEE)
            } else {
                Decision::Denied(REASON_INSUFFICIENT_ROLE)
            }
        }
        WorkItemAction::Cancel => {
            if !item.is_owned_by(actor.id) {
                Decision::Denied(REASON_INSUFFICIENT_ROLE)
            } else if item.status == WorkItemStatus::Submitted {
                Decision::Allowed
            } else {
                Decision::Denied(REASON_CANCEL_AFTER_SUBMIT)
            }
        }
    }
}

/// Whether `candidate` may be made the assignee of a work item: verified
/// engineers and LGU officers only.
pub fn is_assignable(candidate: &Actor) -> bool {
    candidate.account_status == AccountStatus::Verified && candidate.role.is_staff()
}

/// Actions that are both valid in the item's current state and permitted for
/// the actor. Used to drive which buttons a client shows.
pub fn permitted_actions(actor: &Actor, item: &WorkItem) -> Vec<WorkItemAction> {
    WorkItemAction::ALL
        .iter()
        .copied()
        .filter(|a| next_status(item.status, *a).is_some())
        .filter(|a| authorize(Some(actor), Access::Transition(*a), Some(item)).is_allowed())
        .collect()
}

fn allow_if(condition: bool, reason: &'static str) -> Decision {
    if condition {
        Decision::Allowed
    } else {
        Decision::Denied(reason)
    }
}

fn with_target(target: Option<&WorkItem>, decide: impl FnOnce(&WorkItem) -> Decision) -> Decision {
    match target {
        Some(item) => decide(item),
        None => Decision::Denied(REASON_NO_TARGET),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::work_item::{Location, Severity};

    const OWNER: i64 = 10;
    const ASSIGNEE: i64 = 20;
    const STRANGER: i64 = 30;

    fn item(status: WorkItemStatus) -> WorkItem {
        WorkItem {
            id: 1,
            external_code: "DR-2026-001".into(),
            kind: WorkItemKind::DamageReport,
            location: Location {
                address: "Mabini St.".into(),
                latitude: None,
                longitude: None,
            },
            severity: Severity::Medium,
            status,
            owner_id: OWNER,
            assignee_id: Some(ASSIGNEE),
            parent_id: None,
            payload: serde_json::json!({"description": "pothole"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        }
    }

    fn actor(id: i64, role: Role) -> Actor {
        Actor::verified(id, role)
    }

    #[test]
    fn unauthenticated_is_always_denied() {
        let target = item(WorkItemStatus::Draft);
        assert_eq!(
            authorize(None, Access::Read, Some(&target)),
            Decision::Denied(REASON_AUTHENTICATION_REQUIRED)
        );
        assert_eq!(
            authorize(None, Access::Create(WorkItemKind::DamageReport), None),
            Decision::Denied(REASON_AUTHENTICATION_REQUIRED)
        );
    }

    #[test]
    fn admin_is_allowed_everything() {
        let admin = actor(99, Role::Admin);
        let target = item(WorkItemStatus::InProgress);
        for action in WorkItemAction::ALL {
            assert!(authorize(Some(&admin), Access::Transition(*action), Some(&target)).is_allowed());
        }
        assert!(authorize(Some(&admin), Access::ViewAuditTrail, Some(&target)).is_allowed());
        assert!(authorize(Some(&admin), Access::Create(WorkItemKind::Maintenance), None).is_allowed());
    }

    #[test]
    fn unverified_accounts_are_denied() {
        let pending = Actor::new(OWNER, Role::Citizen, AccountStatus::Pending);
        let target = item(WorkItemStatus::Draft);
        assert_eq!(
            authorize(Some(&pending), Access::Read, Some(&target)),
            Decision::Denied(REASON_ACCOUNT_NOT_VERIFIED)
        );
        let deactivated = Actor::new(99, Role::Admin, AccountStatus::Deactivated);
        assert!(!authorize(Some(&deactivated), Access::Read, Some(&target)).is_allowed());
    }

    #[test]
    fn citizens_create_only_damage_reports() {
        let citizen = actor(OWNER, Role::Citizen);
        assert!(authorize(Some(&citizen), Access::Create(WorkItemKind::DamageReport), None).is_allowed());
        for kind in [
            WorkItemKind::Inspection,
            WorkItemKind::CostAssessment,
            WorkItemKind::Maintenance,
        ] {
            assert_eq!(
                authorize(Some(&citizen), Access::Create(kind), None),
                Decision::Denied(REASON_INSUFFICIENT_ROLE)
            );
        }
        let engineer = actor(ASSIGNEE, Role::Engineer);
        assert!(authorize(Some(&engineer), Access::Create(WorkItemKind::Inspection), None).is_allowed());
    }

    #[test]
    fn citizens_read_and_update_only_their_own() {
        let target = item(WorkItemStatus::Draft);
        let owner = actor(OWNER, Role::Citizen);
        let stranger = actor(STRANGER, Role::Citizen);
        assert!(authorize(Some(&owner), Access::Read, Some(&target)).is_allowed());
        assert!(authorize(Some(&owner), Access::Update, Some(&target)).is_allowed());
        assert_eq!(
            authorize(Some(&stranger), Access::Read, Some(&target)),
            Decision::Denied(REASON_NOT_OWNER)
        );
        assert_eq!(
            authorize(Some(&stranger), Access::Update, Some(&target)),
            Decision::Denied(REASON_NOT_OWNER)
        );
    }

    #[test]
    fn elevated_actions_deny_citizens() {
        let target = item(WorkItemStatus::UnderReview);
        let owner = actor(OWNER, Role::Citizen);
        for action in [
            WorkItemAction::BeginReview,
            WorkItemAction::Approve,
            WorkItemAction::Reject,
            WorkItemAction::Assign,
        ] {
            assert_eq!(
                authorize(Some(&owner), Access::Transition(action), Some(&target)),
                Decision::Denied(REASON_INSUFFICIENT_ROLE),
                "{action}"
            );
            for role in [Role::Engineer, Role::LguOfficer] {
                let staff = actor(STRANGER, role);
                assert!(authorize(Some(&staff), Access::Transition(action), Some(&target)).is_allowed());
            }
        }
    }

    #[test]
    fn submit_requires_ownership() {
        let target = item(WorkItemStatus::Draft);
        assert!(authorize(
            Some(&actor(OWNER, Role::Citizen)),
            Access::Transition(WorkItemAction::Submit),
            Some(&target)
        )
        .is_allowed());
        assert_eq!(
            authorize(
                Some(&actor(STRANGER, Role::LguOfficer)),
                Access::Transition(WorkItemAction::Submit),
                Some(&target)
            ),
            Decision::Denied(REASON_NOT_OWNER)
        );
    }

    #[test]
    fn start_and_complete_need_assignee_or_officer() {
        let target = item(WorkItemStatus::Approved);
        let start = Access::Transition(WorkItemAction::Start);
        assert!(authorize(Some(&actor(ASSIGNEE, Role::Engineer)), start, Some(&target)).is_allowed());
        assert!(authorize(Some(&actor(STRANGER, Role::LguOfficer)), start, Some(&target)).is_allowed());
        assert_eq!(
            authorize(Some(&actor(STRANGER, Role::Engineer)), start, Some(&target)),
            Decision::Denied(REASON_NOT_ASSIGNEE)
        );
        assert_eq!(
            authorize(Some(&actor(OWNER, Role::Citizen)), start, Some(&target)),
            Decision::Denied(REASON_INSUFFICIENT_ROLE)
        );
    }

    #[test]
    fn owner_cancels_only_while_submitted() {
        let owner = actor(OWNER, Role::Citizen);
        let cancel = Access::Transition(WorkItemAction::Cancel);
        assert!(authorize(Some(&owner), cancel, Some(&item(WorkItemStatus::Submitted))).is_allowed());
        assert_eq!(
            authorize(Some(&owner), cancel, Some(&item(WorkItemStatus::Draft))),
            Decision::Denied(REASON_CANCEL_AFTER_SUBMIT)
        );
        assert_eq!(
            authorize(Some(&actor(STRANGER, Role::LguOfficer)), cancel, Some(&item(WorkItemStatus::Submitted))),
            Decision::Denied(REASON_INSUFFICIENT_ROLE)
        );
    }

    #[test]
    fn audit_trail_is_admin_only() {
        let target = item(WorkItemStatus::Completed);
        assert_eq!(
            authorize(Some(&actor(OWNER, Role::Citizen)), Access::ViewAuditTrail, Some(&target)),
            Decision::Denied(REASON_ADMIN_ONLY)
        );
        assert_eq!(
            authorize(Some(&actor(STRANGER, Role::LguOfficer)), Access::ViewAuditTrail, Some(&target)),
            Decision::Denied(REASON_ADMIN_ONLY)
        );
    }

    #[test]
    fn permitted_actions_intersect_state_and_role() {
        let under_review = item(WorkItemStatus::UnderReview);
        assert!(permitted_actions(&actor(OWNER, Role::Citizen), &under_review).is_empty());
        assert_eq!(
            permitted_actions(&actor(STRANGER, Role::Engineer), &under_review),
            vec![WorkItemAction::Approve, WorkItemAction::Reject, WorkItemAction::Assign]
        );
        assert_eq!(
            permitted_actions(&actor(OWNER, Role::Citizen), &item(WorkItemStatus::Submitted)),
            vec![WorkItemAction::Cancel]
        );
    }

    #[test]
    fn only_verified_staff_are_assignable() {
        assert!(is_assignable(&actor(STRANGER, Role::Engineer)));
        assert!(is_assignable(&actor(STRANGER, Role::LguOfficer)));
        assert!(!is_assignable(&actor(OWNER, Role::Citizen)));
        assert!(!is_assignable(&actor(STRANGER, Role::Admin)));

        let pending = Actor::new(STRANGER, Role::Engineer, AccountStatus::Pending);
        assert!(!is_assignable(&pending));
    }
}
