//! Change summary for a rewrite.
//!
//! This is a length heuristic, not a diff: the character delta decides whether
//! the rewrite is described as expanded or condensed, and the rest is fixed text.

/// Character delta above which a rewrite counts as expanded (and below the
/// negative of which it counts as condensed).
pub const LENGTH_DELTA_THRESHOLD: i64 = 50;

const PREFIX: &str = "Optimized resume with the following improvements: ";
const EXPANDED: &str = "expanded content with relevant details, ";
const CONDENSED: &str = "condensed content for better readability, ";
const FIXED_IMPROVEMENTS: &str = "enhanced keywords for ATS compatibility, \
improved formatting and professional language, \
tailored experience descriptions to match job requirements.";

pub fn summarize_changes(base_resume: &str, optimized_resume: &str) -> String {
    let delta = optimized_resume.chars().count() as i64 - base_resume.chars().count() as i64;

    let mut summary = String::from(PREFIX);
    if delta > LENGTH_DELTA_THRESHOLD {
        summary.push_str(EXPANDED);
    } else if delta < -LENGTH_DELTA_THRESHOLD {
        summary.push_str(CONDENSED);
    }
    summary.push_str(FIXED_IMPROVEMENTS);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_delta_has_only_fixed_phrases() {
        let base = "a".repeat(100);
        let summary = summarize_changes(&base, &"b".repeat(140));
        assert_eq!(
            summary,
            "Optimized resume with the following improvements: \
             enhanced keywords for ATS compatibility, \
             improved formatting and professional language, \
             tailored experience descriptions to match job requirements."
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let base = "a".repeat(100);
        assert!(!summarize_changes(&base, &"a".repeat(150)).contains("expanded"));
        assert!(summarize_changes(&base, &"a".repeat(151)).contains(EXPANDED));
        assert!(!summarize_changes(&base, &"a".repeat(50)).contains("condensed"));
        assert!(summarize_changes(&base, &"a".repeat(49)).contains(CONDENSED));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 60 two-byte characters: 120 bytes but only 60 characters longer.
        let optimized = "é".repeat(60);
        assert!(summarize_changes("", &optimized).contains(EXPANDED));
        let optimized = "é".repeat(30);
        assert!(!summarize_changes("", &optimized).contains("expanded"));
    }

    #[test]
    fn test_always_mentions_ats_keywords() {
        for len in [0, 10, 500] {
            assert!(summarize_changes("base", &"x".repeat(len))
                .contains("enhanced keywords for ATS compatibility"));
        }
    }
}
