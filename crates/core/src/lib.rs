//! Domain core for the LGU infrastructure-damage portal.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! workflow engine, the persistence layer and the HTTP server. Everything in
//! here is pure: enums, validation, the transition table, the access policy,
//! and the collaborator traits the engine is written against.

#[macro_use]
mod macros;

pub mod account;
pub mod actor;
pub mod audit;
pub mod error;
pub mod external_code;
pub mod notification;
pub mod payload;
pub mod policy;
pub mod roles;
pub mod search;
pub mod store;
pub mod transitions;
pub mod types;
pub mod work_item;
