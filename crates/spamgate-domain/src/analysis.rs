//! Analysis module - the outcome contract returned to callers

use serde::{Deserialize, Serialize};

/// Diagnostic details attached when verbose logging is enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Number of configured keywords
    pub keywords_count: usize,

    /// First configured keywords (at most 10)
    pub keywords: Vec<String>,

    /// Length of the extracted content in bytes
    pub content_length: usize,

    /// Beginning of the extracted content (at most 300 characters)
    pub content_preview: String,
}

/// Outcome of analyzing one ticket
///
/// Serialized as a flat JSON object with absent fields omitted. The
/// constructors keep two invariants: a failed analysis never carries
/// `is_spam`, and a spam verdict always carries a non-empty `reason`.
///
/// # Examples
///
/// ```
/// use spamgate_domain::AnalysisResult;
///
/// let result = AnalysisResult::failure("Ticket not found");
/// assert!(!result.success);
/// assert_eq!(result.is_spam, None);
///
/// let result = AnalysisResult::spam("Detected spam keywords: casino");
/// assert_eq!(result.is_spam, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Whether the analysis ran to a verdict
    pub success: bool,

    /// Spam verdict (absent on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_spam: Option<bool>,

    /// Why the ticket was considered spam
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Explanation for a clean verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Keywords found in the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_keywords: Option<Vec<String>>,

    /// AI confidence in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,

    /// Indicators reported by the AI classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spam_indicators: Option<Vec<String>>,

    /// Error text for failed analyses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Whether the close action changed the ticket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,

    /// Diagnostics (verbose logging only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl AnalysisResult {
    fn empty(success: bool) -> Self {
        Self {
            success,
            is_spam: None,
            reason: None,
            message: None,
            matched_keywords: None,
            confidence: None,
            spam_indicators: None,
            error: None,
            closed: None,
            debug: None,
        }
    }

    /// A spam verdict
    ///
    /// An empty reason is replaced with a generic one so the invariant holds.
    pub fn spam(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            "Spam detected".to_string()
        } else {
            reason
        };

        Self {
            is_spam: Some(true),
            reason: Some(reason),
            ..Self::empty(true)
        }
    }

    /// A clean (not spam) verdict
    pub fn clean(message: impl Into<String>) -> Self {
        Self {
            is_spam: Some(false),
            message: Some(message.into()),
            ..Self::empty(true)
        }
    }

    /// A failed analysis
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(false)
        }
    }

    /// Attach matched keywords
    pub fn with_matched_keywords(mut self, keywords: Vec<String>) -> Self {
        self.matched_keywords = Some(keywords);
        self
    }

    /// Attach the AI confidence
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach AI spam indicators
    pub fn with_spam_indicators(mut self, indicators: Vec<String>) -> Self {
        self.spam_indicators = Some(indicators);
        self
    }

    /// Attach diagnostics
    pub fn with_debug(mut self, debug: DebugInfo) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Record the outcome of the close action
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    /// Whether this is a successful spam verdict
    pub fn is_spam_verdict(&self) -> bool {
        self.success && self.is_spam == Some(true)
    }

    /// Whether this is a successful clean verdict
    pub fn is_clean_verdict(&self) -> bool {
        self.success && self.is_spam == Some(false)
    }
}
