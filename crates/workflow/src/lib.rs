//! The work-item workflow engine.
//!
//! [`engine::WorkflowEngine`] loads a work item, checks the requested action
//! against the lifecycle table and the access policy, commits the new state
//! together with its audit entry, then hands the result to
//! [`dispatch::Dispatcher`] for best-effort notifications.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod memory;

pub use engine::{TransitionOutcome, TransitionRequest, WorkflowEngine};
pub use error::WorkflowError;
