use super::Decoder;
use crate::process::run_tool;
use crate::{DecodeError, ScratchSpace, ToolConfig};
use spamgate_domain::Attachment;
use std::ffi::OsStr;

/// Extracts PDF text with `pdftotext`
pub struct PdfDecoder<'a> {
    tools: &'a ToolConfig,
    scratch: &'a ScratchSpace,
}

impl<'a> PdfDecoder<'a> {
    /// Create a decoder using the configured `pdftotext`
    pub fn new(tools: &'a ToolConfig, scratch: &'a ScratchSpace) -> Self {
        Self { tools, scratch }
    }
}

impl Decoder for PdfDecoder<'_> {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn decode(&self, _attachment: &Attachment, bytes: &[u8]) -> Result<String, DecodeError> {
        let file = self.scratch.file_with(bytes, ".pdf")?;

        let text = run_tool(
            &self.tools.pdftotext,
            &[file.path().as_os_str(), OsStr::new("-")],
            self.tools.timeout(),
        )?;

        if text.trim().is_empty() {
            return Err(DecodeError::EmptyOutput(self.name()));
        }
        Ok(text)
    }
}
