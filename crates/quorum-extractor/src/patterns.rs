//! Keyword heuristics over a transcript

use crate::ExtractorConfig;
use quorum_domain::DecisionStatus;
use regex::Regex;
use std::sync::LazyLock;

/// Decision phrasings, tried in order; the first that matches wins
static DECISION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)decide to ([^.]+)").expect("decision pattern is valid"),
        Regex::new(r"(?i)we will ([^.]+)").expect("decision pattern is valid"),
        Regex::new(r"(?i)we should ([^.]+)").expect("decision pattern is valid"),
    ]
});

static OWNER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)owner is ([^.]+)").expect("owner pattern is valid"));

/// Extract the decision phrase
///
/// Returns the trimmed text following "decide to", "we will" or "we should"
/// up to the next period. Without any of those, returns the text before the
/// first period, or the whole transcript if that is empty.
pub fn extract_decision(transcript: &str) -> String {
    for pattern in DECISION_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(transcript) {
            return caps[1].trim().to_string();
        }
    }

    match transcript.split('.').next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => transcript.to_string(),
    }
}

/// Extract the owner named after "owner is", or an empty string
pub fn extract_owner(transcript: &str) -> String {
    OWNER_PATTERN
        .captures(transcript)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// Infer the status from keywords
///
/// Checked in order: "approved", "pending", "review". The first keyword
/// present decides; with none present the status is Proposed.
pub fn extract_status(transcript: &str) -> DecisionStatus {
    let lower = transcript.to_lowercase();
    if lower.contains("approved") {
        DecisionStatus::Approved
    } else if lower.contains("pending") {
        DecisionStatus::Pending
    } else if lower.contains("review") {
        DecisionStatus::NeedsReview
    } else {
        DecisionStatus::Proposed
    }
}

/// Score a transcript with the default band: `clamp(0.5 + words / 50, 0.4, 0.9)`
pub fn estimate_confidence(transcript: &str) -> f64 {
    ExtractorConfig::default().estimate(transcript)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: confidence always lies in [0.4, 0.9]
        #[test]
        fn test_confidence_in_band(text in ".*") {
            let c = estimate_confidence(&text);
            prop_assert!((0.4..=0.9).contains(&c), "confidence {} out of band", c);
        }

        /// Property: adding words never lowers confidence
        #[test]
        fn test_confidence_monotonic(a in 0usize..80, b in 0usize..80) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let fewer = "word ".repeat(lo);
            let more = "word ".repeat(hi);
            prop_assert!(estimate_confidence(&fewer) <= estimate_confidence(&more));
        }

        /// Property: a "decide to" sentence is recovered from any surrounding text
        #[test]
        fn test_decision_recovered(prefix in "[a-z ]{0,20}") {
            let text = format!("{}We decide to ship the beta. Then lunch.", prefix);
            // a prefix can itself contain an earlier match only if it spells the phrase
            prop_assume!(!prefix.contains("decide to"));
            prop_assert_eq!(extract_decision(&text), "ship the beta");
        }
    }
}
