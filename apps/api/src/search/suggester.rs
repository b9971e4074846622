use serde::Serialize;

use crate::models::catalog::Standard;

/// Queries shorter than this (after trimming) produce no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub code: String,
    pub title: String,
    pub category: String,
}

impl From<&Standard> for Suggestion {
    fn from(s: &Standard) -> Self {
        Suggestion {
            code: s.code.clone(),
            title: s.title.clone(),
            category: s.category.clone(),
        }
    }
}

/// `EC` followed by exactly four digits, any case.
pub fn is_exact_code_query(query: &str) -> bool {
    let bytes = query.as_bytes();
    bytes.len() == 6
        && bytes[..2].eq_ignore_ascii_case(b"EC")
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

/// Case-insensitive substring match on code or title, first `MAX_SUGGESTIONS` in catalog order.
/// Exact-code queries list code-prefix matches ahead of the rest.
pub fn suggest(standards: &[Standard], query: &str) -> Vec<Suggestion> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return vec![];
    }

    let needle = query.to_lowercase();
    let code_prefix = |s: &Standard| s.code.to_lowercase().starts_with(&needle);
    let contains = |s: &Standard| {
        s.code.to_lowercase().contains(&needle) || s.title.to_lowercase().contains(&needle)
    };

    let ordered: Vec<&Standard> = if is_exact_code_query(query) {
        standards
            .iter()
            .filter(|s| code_prefix(s))
            .chain(standards.iter().filter(|s| !code_prefix(s) && contains(s)))
            .collect()
    } else {
        standards.iter().filter(|s| contains(s)).collect()
    };

    ordered
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(Suggestion::from)
        .collect()
}
