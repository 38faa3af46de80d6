//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Bytes per megabyte for the attachment size limit
const MEGABYTE: u64 = 1024 * 1024;

/// External programs used by the document decoders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// PDF to text converter, invoked as `<pdftotext> <file> -`
    pub pdftotext: String,

    /// Primary legacy Word converter, invoked as `<antiword> <file>`
    pub antiword: String,

    /// Fallback legacy Word converter, invoked as `<catdoc> <file>`
    pub catdoc: String,

    /// Archive extractor for .docx containers
    pub unzip: String,

    /// Time budget per tool invocation (seconds)
    pub timeout_secs: u64,
}

impl ToolConfig {
    /// Get the tool timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            pdftotext: "pdftotext".to_string(),
            antiword: "antiword".to_string(),
            catdoc: "catdoc".to_string(),
            unzip: "unzip".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Attachments above this size (megabytes) are skipped
    pub max_file_size_mb: u64,

    /// External decoder programs
    #[serde(default)]
    pub tools: ToolConfig,

    /// Directory for decoder temp files (system temp dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

impl ExtractorConfig {
    /// Size limit in bytes
    pub fn max_attachment_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(MEGABYTE)
    }

    /// Set the attachment size limit
    pub fn with_max_file_size_mb(mut self, megabytes: u64) -> Self {
        self.max_file_size_mb = megabytes;
        self
    }

    /// Set the external tools
    pub fn with_tools(mut self, tools: ToolConfig) -> Self {
        self.tools = tools;
        self
    }

    /// Place decoder temp files under `dir`
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_size_mb == 0 {
            return Err("max_file_size_mb must be greater than 0".to_string());
        }
        if self.tools.timeout_secs == 0 {
            return Err("tools.timeout_secs must be greater than 0".to_string());
        }
        for (name, program) in [
            ("pdftotext", &self.tools.pdftotext),
            ("antiword", &self.tools.antiword),
            ("catdoc", &self.tools.catdoc),
            ("unzip", &self.tools.unzip),
        ] {
            if program.trim().is_empty() {
                return Err(format!("tools.{} must not be empty", name));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            tools: ToolConfig::default(),
            scratch_dir: None,
        }
    }
}
