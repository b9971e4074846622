//! Compatibility: overlap between required standard codes and a holder's codes.
//!
//! Used both ways round: job openings scored against a learner's enrollments, and
//! candidates scored against the codes a business searches for.

use std::collections::HashSet;

use serde::Serialize;

use crate::progress::calculator::ratio_percent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compatibility {
    pub percent: u32,
    /// Required codes the holder has, in required-list order.
    pub matched_codes: Vec<String>,
}

/// An item paired with its compatibility score.
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    pub compatibility: Compatibility,
    pub match_label: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring
// ────────────────────────────────────────────────────────────────────────────

/// `round(|required ∩ held| / |required| * 100)`. Nothing required means a full match.
pub fn job_compatibility<R, H>(required_codes: &[R], held_codes: &[H]) -> Compatibility
where
    R: AsRef<str>,
    H: AsRef<str>,
{
    if required_codes.is_empty() {
        return Compatibility {
            percent: 100,
            matched_codes: vec![],
        };
    }

    let held: HashSet<&str> = held_codes.iter().map(|c| c.as_ref()).collect();
    let matched_codes: Vec<String> = required_codes
        .iter()
        .map(|c| c.as_ref())
        .filter(|code| held.contains(code))
        .map(str::to_string)
        .collect();

    let percent = ratio_percent(matched_codes.len(), required_codes.len()).unwrap_or(100);

    Compatibility {
        percent,
        matched_codes,
    }
}

/// Scores every item and sorts by percent, highest first. Equal scores keep input order.
pub fn rank_by_compatibility<T, F>(items: Vec<T>, mut score: F) -> Vec<Ranked<T>>
where
    F: FnMut(&T) -> Compatibility,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let compatibility = score(&item);
            Ranked {
                match_label: match_label(compatibility.percent),
                item,
                compatibility,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.compatibility.percent.cmp(&a.compatibility.percent));
    ranked
}

/// Short human-readable band for a score.
pub fn match_label(percent: u32) -> &'static str {
    if percent >= 80 {
        "excellent"
    } else if percent >= 50 {
        "good"
    } else if percent > 0 {
        "partial"
    } else {
        "none"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_empty_requirements_is_full_match() {
        let c = job_compatibility(&NONE, &["EC0217"]);
        assert_eq!(
            c,
            Compatibility {
                percent: 100,
                matched_codes: vec![]
            }
        );
        assert_eq!(job_compatibility(&NONE, &NONE).percent, 100);
    }

    #[test]
    fn test_half_match() {
        let c = job_compatibility(&["EC0217", "EC0301"], &["EC0217"]);
        assert_eq!(c.percent, 50);
        assert_eq!(c.matched_codes, vec!["EC0217".to_string()]);
    }

    #[test]
    fn test_no_overlap() {
        let c = job_compatibility(&["EC0217"], &["EC0301"]);
        assert_eq!(c.percent, 0);
        assert!(c.matched_codes.is_empty());
    }

    #[test]
    fn test_matched_codes_follow_required_order() {
        let c = job_compatibility(&["EC0301", "EC0076", "EC0217"], &["EC0217", "EC0301"]);
        assert_eq!(c.matched_codes, vec!["EC0301", "EC0217"]);
        assert_eq!(c.percent, 67);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let jobs = vec![
            ("a", vec!["EC1"]),
            ("b", vec!["EC1", "EC2"]),
            ("c", vec!["EC3"]),
            ("d", vec!["EC2"]),
        ];
        let held = ["EC1", "EC2"];
        let ranked =
            rank_by_compatibility(jobs, |(_, req)| job_compatibility(req.as_slice(), &held));
        let order: Vec<_> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(order, vec!["a", "b", "d", "c"]);
        assert_eq!(ranked[3].match_label, "none");
    }

    #[test]
    fn test_match_label_bands() {
        assert_eq!(match_label(100), "excellent");
        assert_eq!(match_label(50), "good");
        assert_eq!(match_label(33), "partial");
        assert_eq!(match_label(0), "none");
    }
}
