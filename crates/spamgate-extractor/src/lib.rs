//! SpamGate Extractor
//!
//! Flattens a ticket (subject, thread bodies, attachments) into one text blob
//! for spam detection.
//!
//! # Architecture
//!
//! ```text
//! Ticket → ContentExtractor ─┬─ html_to_text (entry bodies)
//!                            └─ size guard → DocumentKind → Decoder (attachments)
//!                                 ├─ ImageDecoder     (vision model OCR)
//!                                 ├─ PlainTextDecoder (text/*)
//!                                 ├─ PdfDecoder       (pdftotext)
//!                                 └─ WordDecoder      (antiword → catdoc → unzip)
//! ```
//!
//! Extraction never fails as a whole. A decoder that cannot produce text
//! (missing tool, timeout, empty output, API error) only drops its own
//! attachment from the result.
//!
//! # Example Usage
//!
//! ```
//! use spamgate_extractor::{ContentExtractor, ExtractorConfig};
//! use spamgate_domain::{Ticket, ThreadEntry};
//! use spamgate_llm::MockProvider;
//!
//! let ticket = Ticket::new("42", "Hello")
//!     .with_entry(ThreadEntry::new("<p>My <b>printer</b> is broken</p>"));
//!
//! let extractor = ContentExtractor::new(ExtractorConfig::default(), None::<MockProvider>);
//! let content = extractor.extract(&ticket);
//!
//! assert_eq!(content, "Subject: Hello\n\nMy printer is broken");
//! ```

#![warn(missing_docs)]

mod config;
mod decoder;
mod error;
mod extractor;
mod html;
mod process;
mod scratch;


pub use config::{ExtractorConfig, ToolConfig};
pub use decoder::{
    Decoder, DocumentKind, ImageDecoder, PdfDecoder, PlainTextDecoder, WordDecoder,
};
pub use error::DecodeError;
pub use extractor::ContentExtractor;
pub use html::{decode_entities, html_to_text};
pub use process::run_tool;
pub use scratch::ScratchSpace;
