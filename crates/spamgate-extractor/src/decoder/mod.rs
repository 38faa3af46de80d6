//! Attachment decoders
//!
//! One decoder per document family. Each turns raw attachment bytes into
//! plain text or reports why it could not.

mod image;
mod pdf;
mod text;
mod word;

pub use image::ImageDecoder;
pub use pdf::PdfDecoder;
pub use text::PlainTextDecoder;
pub use word::WordDecoder;

use crate::DecodeError;
use spamgate_domain::Attachment;

/// Image MIME types routed to the vision model
const IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Declared MIME types too generic to route on; the extension decides
const AMBIGUOUS_TYPES: &[&str] = &[
    "",
    "application/octet-stream",
    "application/zip",
    "application/x-zip-compressed",
];

/// Converts attachment bytes into text
pub trait Decoder {
    /// Short name used in log events
    fn name(&self) -> &'static str;

    /// Decode `bytes` (the content of `attachment`) into text
    fn decode(&self, attachment: &Attachment, bytes: &[u8]) -> Result<String, DecodeError>;
}

/// Document family of an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// JPEG, PNG, GIF or WebP image
    Image,
    /// Any `text/*` type
    PlainText,
    /// PDF document
    Pdf,
    /// Legacy .doc or modern .docx document
    Word,
}

impl DocumentKind {
    /// Pick the document family from the declared MIME type, falling back
    /// to the filename extension when the type is generic
    pub fn detect(mime_type: &str, extension: Option<&str>) -> Option<Self> {
        let mime = mime_type.trim().to_ascii_lowercase();

        if IMAGE_TYPES.contains(&mime.as_str()) {
            Some(Self::Image)
        } else if mime.starts_with("text/") {
            Some(Self::PlainText)
        } else if mime == "application/pdf" {
            Some(Self::Pdf)
        } else if mime.contains("word") || mime.contains("officedocument.wordprocessing") {
            Some(Self::Word)
        } else if AMBIGUOUS_TYPES.contains(&mime.as_str())
            && matches!(extension, Some("doc") | Some("docx"))
        {
            Some(Self::Word)
        } else {
            None
        }
    }

    /// Family of an attachment
    pub fn of(attachment: &Attachment) -> Option<Self> {
        Self::detect(&attachment.mime_type, attachment.extension().as_deref())
    }
}
