use super::Decoder;
use crate::html::xml_to_text;
use crate::process::run_tool;
use crate::{DecodeError, ScratchSpace, ToolConfig};
use spamgate_domain::Attachment;
use std::ffi::OsStr;
use std::path::Path;
use tracing::debug;

/// Archive member holding the body of a .docx document
const DOCX_BODY: &str = "word/document.xml";

/// Extracts text from Word documents
///
/// Legacy .doc files go through `antiword`, then `catdoc`. When neither
/// yields text, or the file is not legacy, the file is treated as a .docx
/// container and its `word/document.xml` is unpacked and flattened.
pub struct WordDecoder<'a> {
    tools: &'a ToolConfig,
    scratch: &'a ScratchSpace,
}

impl<'a> WordDecoder<'a> {
    /// Create a decoder using the configured Word tools
    pub fn new(tools: &'a ToolConfig, scratch: &'a ScratchSpace) -> Self {
        Self { tools, scratch }
    }

    fn is_legacy(attachment: &Attachment) -> bool {
        let mime = attachment.mime_type.to_ascii_lowercase();
        (mime.contains("msword") && !mime.contains("officedocument"))
            || attachment.extension().as_deref() == Some("doc")
    }

    fn legacy_text(&self, file: &Path) -> Option<String> {
        for tool in [&self.tools.antiword, &self.tools.catdoc] {
            match run_tool(tool, &[file], self.tools.timeout()) {
                Ok(text) if !text.trim().is_empty() => return Some(text),
                Ok(_) => debug!(tool = %tool, "Legacy Word converter produced no text"),
                Err(e) => debug!(tool = %tool, error = %e, "Legacy Word converter failed"),
            }
        }
        None
    }

    fn docx_text(&self, file: &Path) -> Result<String, DecodeError> {
        let dir = self.scratch.dir()?;

        run_tool(
            &self.tools.unzip,
            &[
                OsStr::new("-q"),
                OsStr::new("-o"),
                OsStr::new("-d"),
                dir.path().as_os_str(),
                file.as_os_str(),
                OsStr::new(DOCX_BODY),
            ],
            self.tools.timeout(),
        )?;

        let body = dir.path().join(DOCX_BODY);
        if !body.is_file() {
            return Err(DecodeError::EmptyOutput(self.name()));
        }

        let xml = std::fs::read(&body)?;
        Ok(xml_to_text(&String::from_utf8_lossy(&xml)))
    }
}

impl Decoder for WordDecoder<'_> {
    fn name(&self) -> &'static str {
        "word"
    }

    fn decode(&self, attachment: &Attachment, bytes: &[u8]) -> Result<String, DecodeError> {
        let suffix = match attachment.extension().as_deref() {
            Some("doc") => ".doc",
            _ => ".docx",
        };
        let file = self.scratch.file_with(bytes, suffix)?;

        if Self::is_legacy(attachment) {
            if let Some(text) = self.legacy_text(file.path()) {
                return Ok(text);
            }
        }

        let text = self.docx_text(file.path())?;
        if text.is_empty() {
            return Err(DecodeError::EmptyOutput(self.name()));
        }
        Ok(text)
    }
}
