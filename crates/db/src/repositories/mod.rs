//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async functions that
//! accept `&PgPool`, or `&mut PgConnection` when they take part in a caller's
//! transaction.

pub mod audit_repo;
pub mod code_sequence_repo;
pub mod notification_repo;
pub mod user_repo;
pub mod work_item_repo;

pub use audit_repo::AuditRepo;
pub use code_sequence_repo::CodeSequenceRepo;
pub use notification_repo::NotificationRepo;
pub use user_repo::UserRepo;
pub use work_item_repo::WorkItemRepo;
