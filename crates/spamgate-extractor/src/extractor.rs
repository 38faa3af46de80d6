//! Core ContentExtractor implementation

use crate::decoder::{Decoder, DocumentKind, ImageDecoder, PdfDecoder, PlainTextDecoder, WordDecoder};
use crate::html::html_to_text;
use crate::{DecodeError, ExtractorConfig, ScratchSpace};
use spamgate_domain::traits::SpamClassifier;
use spamgate_domain::{Attachment, Ticket};
use tracing::{debug, warn};

/// Separator between content sections
const SECTION_SEPARATOR: &str = "\n\n";

/// Builds the analysable text of a ticket
///
/// The result is, in order and separated by blank lines:
/// - `Subject: <subject>` when the subject is non-empty
/// - the plain text of each thread entry body
/// - `File content: <text>` for each attachment that decoded to text
pub struct ContentExtractor<C> {
    config: ExtractorConfig,
    classifier: Option<C>,
    scratch: ScratchSpace,
}

impl<C: SpamClassifier> ContentExtractor<C> {
    /// Create an extractor; `classifier` enables image OCR
    pub fn new(config: ExtractorConfig, classifier: Option<C>) -> Self {
        let scratch = match &config.scratch_dir {
            Some(dir) => ScratchSpace::under(dir),
            None => ScratchSpace::system(),
        };
        Self {
            config,
            classifier,
            scratch,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Flatten a ticket into one text blob
    ///
    /// Never fails; attachments that cannot be decoded are left out.
    pub fn extract(&self, ticket: &Ticket) -> String {
        let mut sections = Vec::new();

        if !ticket.subject.is_empty() {
            sections.push(format!("Subject: {}", ticket.subject));
        }

        for entry in &ticket.entries {
            let body = html_to_text(&entry.body);
            if !body.is_empty() {
                sections.push(body);
            }

            for attachment in &entry.attachments {
                if let Some(text) = self.extract_attachment(attachment) {
                    sections.push(format!("File content: {}", text));
                }
            }
        }

        let content = sections.join(SECTION_SEPARATOR);
        debug!(
            ticket_id = %ticket.id,
            sections = sections.len(),
            content_length = content.chars().count(),
            "Extracted ticket content"
        );
        content
    }

    /// Decode a single attachment, `None` when it yields no text
    pub fn extract_attachment(&self, attachment: &Attachment) -> Option<String> {
        match self.decode_attachment(attachment) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(
                    filename = %attachment.filename,
                    mime = %attachment.mime_type,
                    chars = text.chars().count(),
                    "Attachment decoded"
                );
                Some(text)
            }
            Ok(_) => None,
            Err(DecodeError::Unsupported(mime)) => {
                debug!(filename = %attachment.filename, mime = %mime, "Attachment type not supported, skipping");
                None
            }
            Err(e @ DecodeError::TooLarge { .. }) => {
                debug!(filename = %attachment.filename, reason = %e, "Attachment skipped");
                None
            }
            Err(e) => {
                warn!(
                    event = "decode_failed",
                    filename = %attachment.filename,
                    mime = %attachment.mime_type,
                    error = %e,
                    "Failed to extract attachment text"
                );
                None
            }
        }
    }

    fn decode_attachment(&self, attachment: &Attachment) -> Result<String, DecodeError> {
        let limit = self.config.max_attachment_bytes();
        if attachment.size > limit {
            return Err(DecodeError::TooLarge {
                size: attachment.size,
                limit,
            });
        }

        let kind = DocumentKind::of(attachment)
            .ok_or_else(|| DecodeError::Unsupported(attachment.mime_type.clone()))?;

        let bytes = attachment.read_bytes()?;
        if bytes.len() as u64 > limit {
            return Err(DecodeError::TooLarge {
                size: bytes.len() as u64,
                limit,
            });
        }

        let decoder = self.decoder_for(kind);
        debug!(filename = %attachment.filename, decoder = decoder.name(), "Decoding attachment");
        decoder.decode(attachment, &bytes)
    }

    fn decoder_for(&self, kind: DocumentKind) -> Box<dyn Decoder + '_> {
        let tools = &self.config.tools;
        match kind {
            DocumentKind::Image => Box::new(ImageDecoder::new(self.classifier.as_ref())),
            DocumentKind::PlainText => Box::new(PlainTextDecoder),
            DocumentKind::Pdf => Box::new(PdfDecoder::new(tools, &self.scratch)),
            DocumentKind::Word => Box::new(WordDecoder::new(tools, &self.scratch)),
        }
    }
}
