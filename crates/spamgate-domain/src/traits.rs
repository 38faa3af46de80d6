//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the triage logic and the
//! systems around it. Implementations live in other crates.

use crate::{ClassificationVerdict, InternalNote, KeywordSet, Ticket, TicketId, TicketStatus};

/// Access to the host ticketing system
///
/// Implemented by the host integration (see `spamgate-store` for the
/// in-memory and file-backed versions).
pub trait TicketStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Look up a ticket by id; `Ok(None)` when it does not exist
    fn lookup(&self, id: &TicketId) -> Result<Option<Ticket>, Self::Error>;

    /// All statuses defined by the host, in host order
    fn statuses(&self) -> Result<Vec<TicketStatus>, Self::Error>;

    /// Append an internal note to a ticket
    fn log_note(&mut self, id: &TicketId, note: InternalNote) -> Result<(), Self::Error>;

    /// Move a ticket to another status
    fn set_status(&mut self, id: &TicketId, status: &TicketStatus) -> Result<(), Self::Error>;
}

/// AI-backed spam classification and image text extraction
///
/// Implemented by the infrastructure layer (spamgate-llm)
pub trait SpamClassifier {
    /// Error type for classifier operations
    type Error: std::fmt::Display;

    /// Decide whether content is spam, with known keywords as context
    fn classify_spam(
        &self,
        content: &str,
        known_keywords: &KeywordSet,
    ) -> Result<ClassificationVerdict, Self::Error>;

    /// Extract readable text from an image
    fn extract_text(&self, image: &[u8], mime_type: &str) -> Result<String, Self::Error>;
}

impl<T: SpamClassifier + ?Sized> SpamClassifier for &T {
    type Error = T::Error;

    fn classify_spam(
        &self,
        content: &str,
        known_keywords: &KeywordSet,
    ) -> Result<ClassificationVerdict, Self::Error> {
        (**self).classify_spam(content, known_keywords)
    }

    fn extract_text(&self, image: &[u8], mime_type: &str) -> Result<String, Self::Error> {
        (**self).extract_text(image, mime_type)
    }
}
