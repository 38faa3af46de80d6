//! Keyword module - spam keywords parsed from configuration

use serde::{Deserialize, Serialize};

/// Ordered list of spam keywords
///
/// Parsed from a raw configuration string where keywords are separated by
/// `,` or `;`. Entries are trimmed, empty entries are dropped and the
/// configured order is kept, so matching and reporting are deterministic.
///
/// # Examples
///
/// ```
/// use spamgate_domain::KeywordSet;
///
/// let keywords = KeywordSet::parse("viagra, casino ;; lottery");
/// assert_eq!(keywords.as_slice(), ["viagra", "casino", "lottery"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Parse a raw `,`/`;` separated keyword string
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split([',', ';'])
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Build a set from already separated keywords, applying the same cleanup
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_string())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        )
    }

    /// Number of keywords
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keywords are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keywords in configured order
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Borrow the keywords as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The first `n` keywords
    pub fn head(&self, n: usize) -> &[String] {
        &self.0[..n.min(self.0.len())]
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
