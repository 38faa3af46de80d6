//! SpamGate LLM Provider Layer
//!
//! Implementations of the `SpamClassifier` trait from `spamgate-domain`.
//!
//! # Providers
//!
//! - `ChatCompletionsProvider`: OpenAI-compatible chat-completions API
//! - `MockProvider`: Deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use spamgate_llm::MockProvider;
//! use spamgate_domain::{ClassificationVerdict, KeywordSet};
//! use spamgate_domain::traits::SpamClassifier;
//!
//! let provider = MockProvider::new(ClassificationVerdict::new(false, 82));
//! let verdict = provider.classify_spam("hello", &KeywordSet::default()).unwrap();
//! assert_eq!(verdict.confidence, 82);
//! ```

#![warn(missing_docs)]

pub mod chat;
mod parser;
mod prompt;

use spamgate_domain::traits::SpamClassifier;
use spamgate_domain::{ClassificationVerdict, KeywordSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use chat::{ChatCompletionsProvider, ProviderSettings, OPENAI_CHAT_COMPLETIONS_URL};
pub use parser::parse_verdict;
pub use prompt::{SpamPromptBuilder, MAX_CONTENT_CHARS, MAX_KEYWORD_HINTS};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure (connect, timeout, TLS)
    #[error("Communication error: {0}")]
    Communication(String),

    /// The API answered with a non-200 status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `error.message` from the response body
        message: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The classification JSON has no `is_spam` field
    #[error("AI response missing spam determination")]
    MissingDetermination,

    /// Image MIME type the vision model does not accept
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(e: serde_json::Error) -> Self {
        LlmError::InvalidResponse(e.to_string())
    }
}

/// Mock classifier for deterministic testing
///
/// Returns a pre-configured verdict (or error) without any network calls and
/// counts how often each capability was used. Clones share their counters.
///
/// # Examples
///
/// ```
/// use spamgate_llm::MockProvider;
/// use spamgate_domain::KeywordSet;
/// use spamgate_domain::traits::SpamClassifier;
///
/// let provider = MockProvider::failing("service unavailable");
/// assert!(provider.classify_spam("text", &KeywordSet::default()).is_err());
/// assert_eq!(provider.classify_calls(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    verdict: Result<ClassificationVerdict, String>,
    ocr: Result<String, String>,
    classify_calls: Arc<AtomicUsize>,
    extract_calls: Arc<AtomicUsize>,
    last_content: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a mock that always returns the given verdict
    pub fn new(verdict: ClassificationVerdict) -> Self {
        Self {
            verdict: Ok(verdict),
            ocr: Ok("No text found".to_string()),
            classify_calls: Arc::new(AtomicUsize::new(0)),
            extract_calls: Arc::new(AtomicUsize::new(0)),
            last_content: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock whose classification always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            verdict: Err(message.into()),
            ..Self::default()
        }
    }

    /// Text returned by `extract_text`
    pub fn with_ocr_text(mut self, text: impl Into<String>) -> Self {
        self.ocr = Ok(text.into());
        self
    }

    /// Make `extract_text` fail
    pub fn with_ocr_error(mut self, message: impl Into<String>) -> Self {
        self.ocr = Err(message.into());
        self
    }

    /// Number of `classify_spam` calls so far
    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    /// Number of `extract_text` calls so far
    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    /// Content passed to the most recent `classify_spam` call
    pub fn last_content(&self) -> Option<String> {
        self.last_content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(ClassificationVerdict::new(false, 0))
    }
}

impl SpamClassifier for MockProvider {
    type Error = LlmError;

    fn classify_spam(
        &self,
        content: &str,
        _known_keywords: &KeywordSet,
    ) -> Result<ClassificationVerdict, Self::Error> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(content.to_string());

        self.verdict.clone().map_err(LlmError::Other)
    }

    fn extract_text(&self, _image: &[u8], mime_type: &str) -> Result<String, Self::Error> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        if !chat::is_supported_image_type(mime_type) {
            return Err(LlmError::UnsupportedImageType(mime_type.to_string()));
        }
        self.ocr.clone().map_err(LlmError::Other)
    }
}
