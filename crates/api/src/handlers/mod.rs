//! Request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod notification;
pub mod public;
pub mod work_items;
