//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs for inserts where the column list is non-trivial
//! - Joined/aggregated row shapes used by single queries
//!
//! Entity rows that are returned verbatim to clients (sessions,
//! bottles, enrollments) also derive `Serialize` with their column
//! names; shaped API payloads live in the `api` crate instead.

pub mod bottle;
pub mod enrollment;
pub mod password_reset;
pub mod stats;
pub mod tasting;
pub mod tasting_session;
pub mod user;
