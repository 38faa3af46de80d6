//! Output formatting for the CLI.

use crate::error::Result;
use clap::ValueEnum;
use colored::*;
use spamgate_domain::{AnalysisResult, TicketId};
use spamgate_gatekeeper::{ApiProvider, SpamGateConfig};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable summary
    Text,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether output is machine-readable
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Format an analysis result.
    pub fn format_result(&self, result: &AnalysisResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Text => Ok(self.format_result_text(result)),
        }
    }

    /// Format the outcome of a new-ticket hook that did not run.
    pub fn format_skipped(&self, id: &TicketId) -> Result<String> {
        let message = format!("Auto-close disabled, ticket {} not analyzed", id);
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "skipped": true,
                "message": message,
            }))?),
            OutputFormat::Text => Ok(self.info(&message)),
        }
    }

    fn format_result_text(&self, result: &AnalysisResult) -> String {
        let mut lines = Vec::new();

        match result.is_spam {
            Some(true) => lines.push(self.colorize("SPAM", "red")),
            Some(false) => lines.push(self.colorize("NOT SPAM", "green")),
            None => lines.push(self.colorize("ANALYSIS FAILED", "yellow")),
        }

        for text in [&result.reason, &result.message, &result.error]
            .into_iter()
            .flatten()
        {
            lines.push(format!("  {}", text));
        }
        if let Some(keywords) = result.matched_keywords.as_ref().filter(|k| !k.is_empty()) {
            lines.push(format!("  Matched keywords: {}", keywords.join(", ")));
        }
        if let Some(confidence) = result.confidence {
            lines.push(format!("  Confidence: {}%", confidence));
        }
        if let Some(indicators) = result.spam_indicators.as_ref().filter(|i| !i.is_empty()) {
            lines.push(format!("  Indicators: {}", indicators.join(", ")));
        }
        if let Some(closed) = result.closed {
            let state = if closed { "closed" } else { "left open" };
            lines.push(format!("  Ticket {}", state));
        }
        if let Some(debug) = &result.debug {
            lines.push(format!(
                "  Debug: {} keywords, {} bytes of content",
                debug.keywords_count, debug.content_length
            ));
        }

        lines.join("\n")
    }

    /// Format the active configuration as a table.
    pub fn format_config(&self, config: &SpamGateConfig) -> Result<String> {
        if self.is_json() {
            let mut value = serde_json::to_value(config)?;
            if let Some(map) = value.as_object_mut() {
                map.insert("api_key".to_string(), mask_secret(&config.api_key).into());
            }
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let keywords = config.keywords();
        let rows = [
            ("api_provider", provider_name(config.api_provider).to_string()),
            ("api_key", mask_secret(&config.api_key)),
            ("api_url", config.effective_api_url().to_string()),
            ("model", config.model.clone()),
            ("vision_model", config.vision_model.clone()),
            ("timeout_secs", config.timeout_secs.to_string()),
            ("temperature", config.temperature.to_string()),
            ("spam_keywords", format!("{} keywords", keywords.len())),
            ("auto_close", config.auto_close.to_string()),
            ("enable_logging", config.enable_logging.to_string()),
            ("max_file_size_mb", config.max_file_size_mb.to_string()),
            ("tools.pdftotext", config.tools.pdftotext.clone()),
            ("tools.antiword", config.tools.antiword.clone()),
            ("tools.catdoc", config.tools.catdoc.clone()),
            ("tools.unzip", config.tools.unzip.clone()),
            ("tools.timeout_secs", config.tools.timeout_secs.to_string()),
        ];

        let mut builder = Builder::default();
        builder.push_record(["Setting", "Value"]);
        for (name, value) in rows {
            builder.push_record([name.to_string(), value]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().bold().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn provider_name(provider: ApiProvider) -> &'static str {
    match provider {
        ApiProvider::OpenAi => "openai",
        ApiProvider::Custom => "custom",
    }
}

/// Hide all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        n if n <= 8 => "*".repeat(n),
        n => format!("****{}", chars[n - 4..].iter().collect::<String>()),
    }
}
