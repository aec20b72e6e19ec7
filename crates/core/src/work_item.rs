//! The generic work item: damage reports, inspections, cost assessments and
//! maintenance tasks share one record shape and one lifecycle, tagged by
//! [`WorkItemKind`].

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

string_enum! {
    /// Which sub-type of work a record tracks.
    WorkItemKind("work item kind") {
        DamageReport = "damage_report",
        Inspection = "inspection",
        CostAssessment = "cost_assessment",
        Maintenance = "maintenance",
    }
}

impl WorkItemKind {
    /// Ticket prefix used in the external code (`DR-2026-001`).
    pub fn code_prefix(self) -> &'static str {
        match self {
            WorkItemKind::DamageReport => "DR",
            WorkItemKind::Inspection => "INSP",
            WorkItemKind::CostAssessment => "CA",
            WorkItemKind::Maintenance => "MT",
        }
    }

    /// Whether a citizen may open this kind of work item.
    ///
    /// Only damage reports come from the public; the other kinds are staff
    /// paperwork.
    pub fn citizen_creatable(self) -> bool {
        self == WorkItemKind::DamageReport
    }
}

string_enum! {
    /// Severity for reports, priority for tasks. Ordered low to urgent.
    Severity("severity") {
        Low = "low",
        Medium = "medium",
        High = "high",
        Urgent = "urgent",
    }
}

string_enum! {
    /// Lifecycle state of a work item.
    WorkItemStatus("work item status") {
        Draft = "draft",
        Submitted = "submitted",
        UnderReview = "under_review",
        Approved = "approved",
        Rejected = "rejected",
        InProgress = "in_progress",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

impl WorkItemStatus {
    /// No further lifecycle actions apply.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkItemStatus::Rejected | WorkItemStatus::Completed | WorkItemStatus::Cancelled
        )
    }

    /// Visible on the public transparency listing.
    pub fn is_published(self) -> bool {
        matches!(
            self,
            WorkItemStatus::Approved | WorkItemStatus::InProgress | WorkItemStatus::Completed
        )
    }

    /// All statuses shown on the public listing.
    pub fn published() -> Vec<WorkItemStatus> {
        Self::ALL.iter().copied().filter(|s| s.is_published()).collect()
    }
}

string_enum! {
    /// A lifecycle action requested against an existing work item.
    WorkItemAction("action") {
        Submit = "submit",
        BeginReview = "begin_review",
        Approve = "approve",
        Reject = "reject",
        Assign = "assign",
        Start = "start",
        Complete = "complete",
        Cancel = "cancel",
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Where the damage or work is. Coordinates are optional but come in pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A stored work item.
///
/// `external_code`, `kind`, `owner_id` and `created_at` never change after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: DbId,
    pub external_code: String,
    pub kind: WorkItemKind,
    pub location: Location,
    pub severity: Severity,
    pub status: WorkItemStatus,
    pub owner_id: DbId,
    pub assignee_id: Option<DbId>,
    /// The inspection a maintenance item was spawned from.
    pub parent_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Starts at 1 and is bumped by every committed change.
    pub version: i64,
}

impl WorkItem {
    pub fn is_owned_by(&self, actor_id: DbId) -> bool {
        self.owner_id == actor_id
    }

    pub fn is_assigned_to(&self, actor_id: DbId) -> bool {
        self.assignee_id == Some(actor_id)
    }
}

/// Caller-supplied fields for a new work item.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemInput {
    pub location: Location,
    pub severity: Severity,
    #[serde(default = "empty_object")]
    pub payload: serde_json::Value,
}

/// Partial edit of a draft or submitted work item. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkItemChanges {
    pub location: Option<Location>,
    pub severity: Option<Severity>,
    pub payload: Option<serde_json::Value>,
}

impl WorkItemChanges {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.severity.is_none() && self.payload.is_none()
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_prefixes_are_distinct() {
        let mut prefixes: Vec<_> = WorkItemKind::ALL.iter().map(|k| k.code_prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), WorkItemKind::ALL.len());
    }

    #[test]
    fn only_damage_reports_are_citizen_creatable() {
        assert!(WorkItemKind::DamageReport.citizen_creatable());
        assert!(!WorkItemKind::Inspection.citizen_creatable());
        assert!(!WorkItemKind::CostAssessment.citizen_creatable());
        assert!(!WorkItemKind::Maintenance.citizen_creatable());
    }

    #[test]
    fn terminal_statuses() {
        let terminal: Vec<_> = WorkItemStatus::ALL
            .iter()
            .copied()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![
                WorkItemStatus::Rejected,
                WorkItemStatus::Completed,
                WorkItemStatus::Cancelled
            ]
        );
    }

    #[test]
    fn published_statuses_follow_approval() {
        assert_eq!(
            WorkItemStatus::published(),
            vec![
                WorkItemStatus::Approved,
                WorkItemStatus::InProgress,
                WorkItemStatus::Completed
            ]
        );
        assert!(!WorkItemStatus::Draft.is_published());
        assert!(!WorkItemStatus::Rejected.is_published());
    }

    #[test]
    fn enum_strings_match_serde() {
        let json = serde_json::to_value(WorkItemStatus::UnderReview).unwrap();
        assert_eq!(json, "under_review");
        let action: WorkItemAction = serde_json::from_value(serde_json::json!("begin_review")).unwrap();
        assert_eq!(action, WorkItemAction::BeginReview);
        assert_eq!("cost_assessment".parse::<WorkItemKind>().unwrap(), WorkItemKind::CostAssessment);
        assert!("pothole".parse::<WorkItemKind>().is_err());
    }

    #[test]
    fn input_payload_defaults_to_empty_object() {
        let input: WorkItemInput = serde_json::from_value(serde_json::json!({
            "location": {"address": "Rizal Ave", "latitude": null, "longitude": null},
            "severity": "high"
        }))
        .unwrap();
        assert!(input.payload.as_object().unwrap().is_empty());
        assert_eq!(input.severity, Severity::High);
    }
}
