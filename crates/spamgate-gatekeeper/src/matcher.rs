//! Keyword matching

use serde::{Deserialize, Serialize};
use spamgate_domain::KeywordSet;

/// Outcome of a keyword check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Whether any keyword matched
    pub is_spam: bool,

    /// Matched keywords in configured order
    pub matched_keywords: Vec<String>,
}

/// Find every keyword that occurs in `content`
///
/// Both sides are lowercased with Unicode rules and each keyword is tested
/// as a plain substring of the whole content.
///
/// # Examples
///
/// ```
/// use spamgate_gatekeeper::match_keywords;
/// use spamgate_domain::KeywordSet;
///
/// let result = match_keywords("Please BUY NOW!", &KeywordSet::parse("buy now, casino"));
/// assert!(result.is_spam);
/// assert_eq!(result.matched_keywords, vec!["buy now"]);
/// ```
pub fn match_keywords(content: &str, keywords: &KeywordSet) -> KeywordMatch {
    let haystack = content.to_lowercase();

    let matched_keywords: Vec<String> = keywords
        .iter()
        .filter(|keyword| !keyword.is_empty() && haystack.contains(&keyword.to_lowercase()))
        .cloned()
        .collect();

    KeywordMatch {
        is_spam: !matched_keywords.is_empty(),
        matched_keywords,
    }
}
