//! Unauthenticated transparency listing.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use lgu_core::search::Page;
use lgu_core::store::WorkItemFilter;
use lgu_core::types::{DbId, Timestamp};
use lgu_core::work_item::{Location, Severity, WorkItem, WorkItemKind, WorkItemStatus};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /public/work-items`.
#[derive(Debug, Default, Deserialize)]
pub struct PublicListQuery {
    pub kind: Option<WorkItemKind>,
    pub status: Option<WorkItemStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A published work item with the people involved left out.
#[derive(Debug, Serialize)]
pub struct PublicWorkItem {
    pub id: DbId,
    pub external_code: String,
    pub kind: WorkItemKind,
    pub location: Location,
    pub severity: Severity,
    pub status: WorkItemStatus,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<WorkItem> for PublicWorkItem {
    fn from(item: WorkItem) -> Self {
        Self {
            id: item.id,
            external_code: item.external_code,
            kind: item.kind,
            location: item.location,
            severity: item.severity,
            status: item.status,
            payload: item.payload,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// GET /api/v1/public/work-items
pub async fn list_published(
    State(state): State<AppState>,
    Query(params): Query<PublicListQuery>,
) -> AppResult<Json<DataResponse<Vec<PublicWorkItem>>>> {
    let filter = WorkItemFilter {
        kind: params.kind,
        status: params.status,
        ..WorkItemFilter::default()
    };
    let items = state
        .engine
        .list_published(filter, Page::from_params(params.limit, params.offset))
        .await?;

    Ok(Json(DataResponse {
        data: items.into_iter().map(PublicWorkItem::from).collect(),
    }))
}
