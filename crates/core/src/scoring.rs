//! Scoring rules for tastings.
//!
//! Final scores live on a 0-20 scale. The four sub-scores (appearance,
//! aroma, taste, finish) are informational 1-5 inputs; missing values
//! default to the midpoint and are never cross-checked against the
//! submitted final score.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Inclusive bounds of the final score scale.
pub const MIN_FINAL_SCORE: f64 = 0.0;
pub const MAX_FINAL_SCORE: f64 = 20.0;

/// Inclusive bounds of the 1-5 sub-score scale.
pub const MIN_SUB_SCORE: i16 = 1;
pub const MAX_SUB_SCORE: i16 = 5;

/// Default applied when a sub-score is omitted (scale midpoint).
pub const DEFAULT_SUB_SCORE: i16 = 3;

/// Distribution bucket thresholds.
pub const EXCELLENT_THRESHOLD: f64 = 16.0;
pub const GOOD_THRESHOLD: f64 = 14.0;
pub const AVERAGE_THRESHOLD: f64 = 12.0;

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// Four-bucket classification of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBucket {
    /// `final_score >= 16`
    Excellent,
    /// `14 <= final_score < 16`
    Good,
    /// `12 <= final_score < 14`
    Average,
    /// `final_score < 12`
    Poor,
}

/// Classify a final score into its distribution bucket.
pub fn bucket_for(score: f64) -> ScoreBucket {
    if score >= EXCELLENT_THRESHOLD {
        ScoreBucket::Excellent
    } else if score >= GOOD_THRESHOLD {
        ScoreBucket::Good
    } else if score >= AVERAGE_THRESHOLD {
        ScoreBucket::Average
    } else {
        ScoreBucket::Poor
    }
}

// ---------------------------------------------------------------------------
// Validation / formatting
// ---------------------------------------------------------------------------

/// Validate that a final score lies in the closed range [0, 20].
///
/// Both boundaries are accepted.
pub fn validate_final_score(score: f64) -> Result<(), String> {
    if !score.is_finite() || score < MIN_FINAL_SCORE || score > MAX_FINAL_SCORE {
        return Err(format!(
            "Final score must be between {MIN_FINAL_SCORE} and {MAX_FINAL_SCORE}"
        ));
    }
    Ok(())
}

/// Render a score with exactly one decimal digit (`15.25` -> `"15.3"`).
///
/// Every externally reported score statistic uses this format.
pub fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

/// [`format_score`] lifted over `Option`; `None` stays `None` so that
/// zero-row aggregates serialize as JSON `null`.
pub fn format_optional_score(score: Option<f64>) -> Option<String> {
    score.map(format_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_score_boundaries() {
        assert!(validate_final_score(0.0).is_ok());
        assert!(validate_final_score(20.0).is_ok());
        assert!(validate_final_score(17.5).is_ok());
        assert!(validate_final_score(-0.1).is_err());
        assert!(validate_final_score(20.1).is_err());
        assert!(validate_final_score(f64::NAN).is_err());
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket_for(17.5), ScoreBucket::Excellent);
        assert_eq!(bucket_for(16.0), ScoreBucket::Excellent);
        assert_eq!(bucket_for(15.9), ScoreBucket::Good);
        assert_eq!(bucket_for(14.0), ScoreBucket::Good);
        assert_eq!(bucket_for(13.9), ScoreBucket::Average);
        assert_eq!(bucket_for(12.0), ScoreBucket::Average);
        assert_eq!(bucket_for(11.9), ScoreBucket::Poor);
        assert_eq!(bucket_for(0.0), ScoreBucket::Poor);
    }

    #[test]
    fn test_one_decimal_rendering() {
        assert_eq!(format_score(15.24), "15.2");
        assert_eq!(format_score(15.26), "15.3");
        assert_eq!(format_score(15.0), "15.0");
        assert_eq!(format_score(20.0), "20.0");
        assert_eq!(format_optional_score(None), None);
        assert_eq!(format_optional_score(Some(8.04)), Some("8.0".to_string()));
    }
}
