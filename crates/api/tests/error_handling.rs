//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router or database involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use lgu_api::error::AppError;
use lgu_core::error::CoreError;
use lgu_core::work_item::{WorkItemAction, WorkItemStatus};
use lgu_workflow::WorkflowError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Workflow errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn denied_returns_403_with_the_reason() {
    let (status, json) =
        error_to_response(WorkflowError::Denied("insufficient role").into()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "DENIED");
    assert_eq!(json["error"], "insufficient role");
}

#[tokio::test]
async fn invalid_transition_returns_422() {
    let err = WorkflowError::InvalidTransition {
        current: WorkItemStatus::Approved,
        action: WorkItemAction::Approve,
    };

    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(json["error"], "Cannot approve a work item that is approved");
}

#[tokio::test]
async fn not_editable_returns_422() {
    let (status, json) =
        error_to_response(WorkflowError::NotEditable(WorkItemStatus::UnderReview).into()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "NOT_EDITABLE");
}

#[tokio::test]
async fn workflow_not_found_and_conflict() {
    let (status, json) = error_to_response(WorkflowError::NotFound(7).into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Work item 7 not found");

    let (status, json) = error_to_response(WorkflowError::Conflict(7).into()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn workflow_validation_returns_400() {
    let (status, json) =
        error_to_response(WorkflowError::Validation("A rejection requires a reason".into()).into())
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "A rejection requires a reason");
}

#[tokio::test]
async fn store_unavailable_is_sanitized() {
    let err = WorkflowError::StoreUnavailable("connection refused to db-primary:5432".into());

    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("db-primary"));
}

// ---------------------------------------------------------------------------
// Core and HTTP errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "User",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "User with id 42 not found");
}

#[tokio::test]
async fn unknown_value_returns_400() {
    let err = AppError::Core(CoreError::UnknownValue {
        field: "role",
        value: "mayor".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Unknown role 'mayor'");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let (status, json) =
        error_to_response(CoreError::Unauthorized("no token provided".into()).into()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid field value".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    for err in [
        AppError::InternalError("secret database credentials leaked".into()),
        AppError::Core(CoreError::Internal("secret stack trace".into())),
    ] {
        let (status, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "An internal error occurred");
        assert!(!json.to_string().contains("secret"));
    }
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
