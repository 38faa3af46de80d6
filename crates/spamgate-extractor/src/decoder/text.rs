use super::Decoder;
use crate::DecodeError;
use spamgate_domain::Attachment;

/// Passes text attachments through verbatim
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextDecoder;

impl Decoder for PlainTextDecoder {
    fn name(&self) -> &'static str {
        "text"
    }

    fn decode(&self, _attachment: &Attachment, bytes: &[u8]) -> Result<String, DecodeError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
