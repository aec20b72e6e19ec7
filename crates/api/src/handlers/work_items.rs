//! Handlers for the `/work-items` resource.
//!
//! Every operation goes through the workflow engine with the caller's
//! [`Actor`](lgu_core::actor::Actor) passed explicitly.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use lgu_core::audit::AuditEntry;
use lgu_core::policy::permitted_actions;
use lgu_core::search::Page;
use lgu_core::store::WorkItemFilter;
use lgu_core::types::DbId;
use lgu_core::work_item::{
    Location, Severity, WorkItem, WorkItemAction, WorkItemChanges, WorkItemInput, WorkItemKind,
    WorkItemStatus,
};
use lgu_workflow::TransitionRequest;

use crate::error::AppResult;
use crate::handlers::public::PublicWorkItem;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /work-items`.
#[derive(Debug, Deserialize)]
pub struct CreateWorkItemRequest {
    pub kind: WorkItemKind,
    pub location: Location,
    pub severity: Severity,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Request body for `PUT /work-items/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkItemRequest {
    pub location: Option<Location>,
    pub severity: Option<Severity>,
    pub payload: Option<serde_json::Value>,
    pub expected_status: Option<WorkItemStatus>,
}

/// Request body for `POST /work-items/{id}/transitions`.
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub action: WorkItemAction,
    pub expected_status: Option<WorkItemStatus>,
    pub reason: Option<String>,
    /// Free-text remark recorded in the audit entry when no `reason` is given.
    pub note: Option<String>,
    pub assignee_id: Option<DbId>,
}

impl From<TransitionBody> for TransitionRequest {
    fn from(body: TransitionBody) -> Self {
        TransitionRequest {
            action: body.action,
            expected_status: body.expected_status,
            reason: body.reason.or(body.note),
            assignee_id: body.assignee_id,
        }
    }
}

/// Query parameters for `GET /work-items`.
#[derive(Debug, Default, Deserialize)]
pub struct WorkItemListQuery {
    pub kind: Option<WorkItemKind>,
    pub status: Option<WorkItemStatus>,
    pub assignee_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    /// Restrict to approved, in-progress and completed items.
    #[serde(default)]
    pub published: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl WorkItemListQuery {
    fn filter(&self) -> WorkItemFilter {
        WorkItemFilter {
            kind: self.kind,
            status: self.status,
            owner_id: self.owner_id,
            assignee_id: self.assignee_id,
            published_only: self.published,
        }
    }

    fn page(&self) -> Page {
        Page::from_params(self.limit, self.offset)
    }
}

/// A work item plus the actions the caller may take on it right now.
#[derive(Debug, Serialize)]
pub struct WorkItemDetail {
    #[serde(flatten)]
    pub item: WorkItem,
    pub available_actions: Vec<WorkItemAction>,
}

/// A listed work item. Citizens browsing published items get the public
/// projection, without owner or assignee ids.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListedWorkItem {
    Full(WorkItem),
    Public(PublicWorkItem),
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub item: WorkItem,
    /// The maintenance task opened by approving an inspection.
    pub spawned: Option<WorkItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/work-items
pub async fn create_work_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkItemRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkItem>>)> {
    let actor = auth.actor();
    let item = state
        .engine
        .create_work_item(
            &actor,
            input.kind,
            WorkItemInput {
                location: input.location,
                severity: input.severity,
                payload: input
                    .payload
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/work-items
///
/// Citizens only ever see their own items unless `published=true`.
pub async fn list_work_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WorkItemListQuery>,
) -> AppResult<Json<DataResponse<Vec<ListedWorkItem>>>> {
    let actor = auth.actor();
    let items = state
        .engine
        .list_work_items(&actor, params.filter(), params.page())
        .await?;

    let public_view = params.published && !actor.role.is_elevated();
    let data = items
        .into_iter()
        .map(|item| {
            if public_view {
                ListedWorkItem::Public(item.into())
            } else {
                ListedWorkItem::Full(item)
            }
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/work-items/{id}
pub async fn get_work_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkItemDetail>>> {
    let actor = auth.actor();
    let item = state.engine.get_work_item(&actor, id).await?;
    let available_actions = permitted_actions(&actor, &item);

    Ok(Json(DataResponse {
        data: WorkItemDetail {
            item,
            available_actions,
        },
    }))
}

/// PUT /api/v1/work-items/{id}
///
/// Edit location, severity or payload while the item is draft or submitted.
pub async fn update_work_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkItemRequest>,
) -> AppResult<Json<DataResponse<WorkItem>>> {
    let changes = WorkItemChanges {
        location: input.location,
        severity: input.severity,
        payload: input.payload,
    };
    let item = state
        .engine
        .update_details(&auth.actor(), id, changes, input.expected_status)
        .await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/work-items/{id}/transitions
pub async fn transition_work_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<TransitionBody>,
) -> AppResult<Json<DataResponse<TransitionResponse>>> {
    let outcome = state
        .engine
        .transition(&auth.actor(), id, body.into())
        .await?;

    Ok(Json(DataResponse {
        data: TransitionResponse {
            item: outcome.item,
            spawned: outcome.spawned,
        },
    }))
}

/// GET /api/v1/work-items/{id}/audit
///
/// Oldest entry first. Admin only.
pub async fn get_audit_trail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AuditEntry>>>> {
    let entries = state.engine.audit_trail(&auth.actor(), id).await?;
    Ok(Json(DataResponse { data: entries }))
}
