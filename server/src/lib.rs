//! UserPanel server
//!
//! Debug-only user impersonation panel: log in as any stored user by email,
//! username or id and inspect the current session's user.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
