//! Domain types shared across the cuvee workspace.
//!
//! This crate is dependency-light by design: no database or HTTP
//! imports, only the types, constants, and pure rules the `db` and
//! `api` crates build on.

pub mod error;
pub mod roles;
pub mod scoring;
pub mod session;
pub mod types;
