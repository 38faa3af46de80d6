//! Verdict module - the AI classifier's answer for one content blob

use serde::{Deserialize, Serialize};

/// Result of an AI spam classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    /// Whether the content is spam
    pub is_spam: bool,

    /// Confidence in percent (0-100)
    pub confidence: u8,

    /// Free-text explanation from the model
    pub reasoning: String,

    /// Spam indicators the model pointed at
    pub indicators: Vec<String>,
}

impl ClassificationVerdict {
    /// Reasoning used when the model gives none
    pub const NO_REASONING: &'static str = "No reasoning provided";

    /// Create a verdict with the default reasoning and no indicators
    pub fn new(is_spam: bool, confidence: u8) -> Self {
        Self {
            is_spam,
            confidence: confidence.min(100),
            reasoning: Self::NO_REASONING.to_string(),
            indicators: Vec::new(),
        }
    }

    /// Set the reasoning text
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Set the spam indicators
    pub fn with_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indicators = indicators.into_iter().map(Into::into).collect();
        self
    }
}
