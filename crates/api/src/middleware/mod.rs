//! Request extractors for authentication and role-based access.

pub mod auth;
pub mod rbac;
