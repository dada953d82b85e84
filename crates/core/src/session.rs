//! Tasting-session lifecycle types and validation.
//!
//! Status and type values are stored as TEXT in the database; the
//! enums here are the single source of truth for the accepted strings.
//! Pure validation only; the single-active-session invariant itself
//! is enforced transactionally in the `db` crate.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a session name.
pub const MAX_SESSION_NAME_LENGTH: usize = 200;

pub const STATUS_SETUP: &str = "setup";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ARCHIVED: &str = "archived";

/// All valid session status strings.
pub const VALID_SESSION_STATUSES: &[&str] =
    &[STATUS_SETUP, STATUS_ACTIVE, STATUS_COMPLETED, STATUS_ARCHIVED];

pub const TYPE_STANDARD: &str = "standard";
pub const TYPE_BLIND: &str = "blind";

/// All valid session type strings.
pub const VALID_SESSION_TYPES: &[&str] = &[TYPE_STANDARD, TYPE_BLIND];

pub const ENROLLMENT_WAITING: &str = "waiting";
pub const ENROLLMENT_IN_PROGRESS: &str = "in_progress";
pub const ENROLLMENT_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a tasting session.
///
/// At most one session may be `Active` at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Setup,
    Active,
    Completed,
    Archived,
}

impl SessionStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_SETUP => Ok(Self::Setup),
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_ARCHIVED => Ok(Self::Archived),
            _ => Err(format!(
                "Invalid session status '{s}'. Must be one of: {}",
                VALID_SESSION_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => STATUS_SETUP,
            Self::Active => STATUS_ACTIVE,
            Self::Completed => STATUS_COMPLETED,
            Self::Archived => STATUS_ARCHIVED,
        }
    }
}

/// Kind of tasting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Standard,
    Blind,
}

impl SessionType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            TYPE_STANDARD => Ok(Self::Standard),
            TYPE_BLIND => Ok(Self::Blind),
            _ => Err(format!(
                "Invalid session type '{s}'. Must be one of: {}",
                VALID_SESSION_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => TYPE_STANDARD,
            Self::Blind => TYPE_BLIND,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a session name: non-empty after trimming, bounded length.
pub fn validate_session_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Session name is required".to_string());
    }
    if name.len() > MAX_SESSION_NAME_LENGTH {
        return Err(format!(
            "Session name must not exceed {MAX_SESSION_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in VALID_SESSION_STATUSES {
            let status = SessionStatus::from_str_value(s).expect("valid status should parse");
            assert_eq!(status.as_str(), *s);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = SessionStatus::from_str_value("paused").unwrap_err();
        assert!(err.contains("Invalid session status"));
    }

    #[test]
    fn test_type_round_trip() {
        assert_eq!(
            SessionType::from_str_value("blind").unwrap(),
            SessionType::Blind
        );
        assert!(SessionType::from_str_value("vertical").is_err());
    }

    #[test]
    fn test_session_name_rules() {
        assert!(validate_session_name("Friday Reds").is_ok());
        assert!(validate_session_name("").is_err());
        assert!(validate_session_name("   ").is_err());
        assert!(validate_session_name(&"x".repeat(MAX_SESSION_NAME_LENGTH)).is_ok());
        assert!(validate_session_name(&"x".repeat(MAX_SESSION_NAME_LENGTH + 1)).is_err());
    }
}
