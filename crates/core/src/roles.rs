//! Well-known role name constants.
//!
//! These must match the default in `20260601000001_create_users.sql`
//! and the arbiter account seeded at startup.

pub const ROLE_ARBITER: &str = "arbiter";
pub const ROLE_PARTICIPANT: &str = "participant";
