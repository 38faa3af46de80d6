//! Prompt construction for spam classification and OCR

use spamgate_domain::KeywordSet;

/// Maximum number of content characters embedded in the prompt
pub const MAX_CONTENT_CHARS: usize = 3000;

/// Maximum number of known keywords given as context
pub const MAX_KEYWORD_HINTS: usize = 20;

/// System message for classification requests
pub(crate) const CLASSIFIER_SYSTEM_PROMPT: &str = "You are a spam detection expert reviewing \
support tickets. Decide whether the ticket is spam and always answer with valid JSON. Be \
conservative: only mark a ticket as spam when you are confident.";

/// System message for image text extraction
pub(crate) const OCR_SYSTEM_PROMPT: &str = "You are an OCR assistant. Extract all text from \
the image and return it as plain text. If the image contains no readable text, return \
\"No text found\".";

/// User instruction accompanying an image
pub(crate) const OCR_USER_PROMPT: &str = "Extract all text from this image:";

const CRITERIA: &str = r#"Decide based on:
1. Promotional or commercial content
2. Suspicious links or offers
3. Generic mass-mailing patterns
4. Requests for personal information or money
5. Typical spam keywords and phrases
6. Irrelevant or off-topic content"#;

const OUTPUT_FORMAT: &str = r#"Respond with JSON only:
{"is_spam": <true/false>, "confidence": <0-100>, "reasoning": "<explanation>", "spam_indicators": ["indicator1", "indicator2"]}"#;

/// Builds the user prompt for a classification request
pub struct SpamPromptBuilder<'a> {
    content: &'a str,
    known_keywords: &'a [String],
}

impl<'a> SpamPromptBuilder<'a> {
    /// Create a new prompt builder for the given ticket content
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            known_keywords: &[],
        }
    }

    /// Add configured keywords as context (at most [`MAX_KEYWORD_HINTS`])
    pub fn with_known_keywords(mut self, keywords: &'a KeywordSet) -> Self {
        self.known_keywords = keywords.head(MAX_KEYWORD_HINTS);
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("Analyze the following support ticket and determine whether it is spam.\n\n");

        prompt.push_str("TICKET CONTENT:\n");
        prompt.push_str(truncate_chars(self.content, MAX_CONTENT_CHARS));
        prompt.push_str("\n\n");

        if !self.known_keywords.is_empty() {
            prompt.push_str("KNOWN SPAM INDICATORS (for context):\n");
            prompt.push_str(&self.known_keywords.join(", "));
            prompt.push_str("\n\n");
        }

        prompt.push_str(CRITERIA);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);

        prompt
    }
}

/// Longest prefix of `text` with at most `max_chars` characters
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
