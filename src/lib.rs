//! Task List API Library
//!
//! HTTP service for tasks and their todos. Every `/api` request runs inside
//! one database transaction that commits when the response succeeds and
//! rolls back otherwise.

pub mod api;
pub mod domain;
pub mod infrastructure;
