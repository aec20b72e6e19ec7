//! Row structs and DTOs.
//!
//! Rows store enum values as TEXT; conversion into the domain types in
//! `lgu-core` parses them and fails on values the CHECK constraints would
//! have refused.

pub mod audit;
pub mod notification;
pub mod user;
pub mod work_item;
