//! Authentication primitives: JWT access tokens, Argon2id password
//! hashing, and opaque reset/setup tokens.

pub mod jwt;
pub mod password;
pub mod token;
