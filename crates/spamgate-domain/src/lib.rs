//! SpamGate Domain Layer
//!
//! Core data model for ticket spam triage and the trait interfaces that
//! connect it to the outside world.
//!
//! ## Key Concepts
//!
//! - **Ticket**: A support ticket snapshot (subject, thread, status, notes)
//! - **Attachment**: A file on a thread entry, with lazily fetched content
//! - **KeywordSet**: Ordered spam keywords parsed from configuration
//! - **ClassificationVerdict**: What the AI classifier decided for one content blob
//! - **AnalysisResult**: The JSON-shaped outcome handed back to the caller
//!
//! ## Architecture
//!
//! - Pure data and business rules only
//! - The host ticketing system and the AI backend are reached through traits
//!   (`TicketStore`, `SpamClassifier`); implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod keywords;
pub mod ticket;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use analysis::{AnalysisResult, DebugInfo};
pub use keywords::KeywordSet;
pub use ticket::{
    Attachment, AttachmentData, InternalNote, StatusState, ThreadEntry, Ticket, TicketId,
    TicketStatus,
};
pub use verdict::ClassificationVerdict;
