//! Spam decision pipeline

use crate::action::{close_ticket, log_check_failure};
use crate::matcher::{match_keywords, KeywordMatch};
use crate::{GatekeeperError, InFlightTickets, SpamGateConfig};
use spamgate_domain::traits::{SpamClassifier, TicketStore};
use spamgate_domain::{
    AnalysisResult, ClassificationVerdict, DebugInfo, KeywordSet, Ticket, TicketId,
};
use spamgate_extractor::ContentExtractor;
use spamgate_llm::ChatCompletionsProvider;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Keywords included in debug info
const DEBUG_KEYWORD_LIMIT: usize = 10;

/// Characters of content included in debug info
const DEBUG_PREVIEW_CHARS: usize = 300;

/// Decides whether tickets are spam and closes them
///
/// Keywords are checked first. When none match and a classifier is
/// configured, the AI decides; if the AI call fails the clean keyword
/// result stands.
pub struct Analyzer<C> {
    config: SpamGateConfig,
    keywords: KeywordSet,
    classifier: Option<C>,
    in_flight: Option<InFlightTickets>,
}

impl Analyzer<ChatCompletionsProvider> {
    /// Build an analyzer from configuration
    ///
    /// Validates the configuration and creates the HTTP classifier when an
    /// API key is present.
    pub fn from_config(config: SpamGateConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;

        let classifier = match config.provider_settings() {
            Some(settings) => Some(ChatCompletionsProvider::new(settings)?),
            None => {
                info!("API key not configured, using keywords only");
                None
            }
        };

        Ok(Self::new(config, classifier))
    }
}

impl<C: SpamClassifier> Analyzer<C> {
    /// Create an analyzer with an explicit classifier (or none)
    pub fn new(config: SpamGateConfig, classifier: Option<C>) -> Self {
        Self {
            keywords: config.keywords(),
            config,
            classifier,
            in_flight: None,
        }
    }

    /// Reject concurrent close flows for the same ticket
    pub fn with_in_flight_guard(mut self, in_flight: InFlightTickets) -> Self {
        self.in_flight = Some(in_flight);
        self
    }

    /// The active configuration
    pub fn config(&self) -> &SpamGateConfig {
        &self.config
    }

    /// Whether AI classification is available
    pub fn is_ai_configured(&self) -> bool {
        self.classifier.is_some()
    }

    /// Analyze a ticket without acting on it
    pub fn analyze_ticket<S: TicketStore>(&self, store: &S, id: &TicketId) -> AnalysisResult {
        self.analyze(store, id).1
    }

    /// Analyze a ticket and act on the verdict
    ///
    /// Spam is closed (`closed` reports whether the ticket changed). Any
    /// other outcome on an existing ticket leaves a note explaining why it
    /// stayed open.
    pub fn try_close_ticket<S: TicketStore>(&self, store: &mut S, id: &TicketId) -> AnalysisResult {
        let _guard = match &self.in_flight {
            Some(in_flight) => match in_flight.try_acquire(id) {
                Some(guard) => Some(guard),
                None => {
                    warn!(ticket_id = %id, "Analysis already in progress");
                    return AnalysisResult::failure(format!(
                        "Analysis already in progress for ticket {}",
                        id
                    ));
                }
            },
            None => None,
        };

        let (ticket, result) = self.analyze(store, id);
        let Some(mut ticket) = ticket else {
            return result;
        };

        if result.is_spam_verdict() {
            let reason = result.reason.clone().unwrap_or_default();
            let closed = close_ticket(store, &mut ticket, &self.config.close_reason, &reason);
            return result.with_closed(closed);
        }

        let note_reason = if result.is_clean_verdict() {
            match &result.message {
                Some(message) => format!("No spam detected: {}", message),
                None => "No spam detected".to_string(),
            }
        } else {
            result
                .error
                .clone()
                .unwrap_or_else(|| "Analysis failed".to_string())
        };
        log_check_failure(store, &mut ticket, &note_reason);
        result.with_closed(false)
    }

    /// Hook for newly created tickets
    ///
    /// Runs the close flow when `auto_close` is enabled, otherwise does
    /// nothing and returns `None`.
    pub fn on_ticket_created<S: TicketStore>(
        &self,
        store: &mut S,
        id: &TicketId,
    ) -> Option<AnalysisResult> {
        if !self.config.auto_close {
            debug!(ticket_id = %id, "Auto-close disabled, skipping new ticket");
            return None;
        }
        info!(ticket_id = %id, "Processing new ticket");
        Some(self.try_close_ticket(store, id))
    }

    fn analyze<S: TicketStore>(&self, store: &S, id: &TicketId) -> (Option<Ticket>, AnalysisResult) {
        let ticket = match store.lookup(id) {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return (None, AnalysisResult::failure("Ticket not found")),
            Err(e) => return (None, AnalysisResult::failure(format!("Exception: {}", e))),
        };

        if self.keywords.is_empty() {
            return (Some(ticket), AnalysisResult::failure("No spam keywords configured"));
        }

        let extractor = ContentExtractor::new(self.config.extractor_config(), self.classifier.as_ref());
        let content = extractor.extract(&ticket);
        let debug_info = self.debug_info(&content);

        info!(
            ticket_id = %ticket.id,
            number = %ticket.number,
            content_length = content.len(),
            keywords = self.keywords.len(),
            "Analyzing ticket"
        );

        let keyword_result = match_keywords(&content, &self.keywords);
        info!(
            event = "keyword_checked",
            ticket_id = %ticket.id,
            is_spam = keyword_result.is_spam,
            matched = ?keyword_result.matched_keywords,
            "Keyword check complete"
        );

        if keyword_result.is_spam {
            let reason = format!(
                "Detected spam keywords: {}",
                keyword_result.matched_keywords.join(", ")
            );
            let result = AnalysisResult::spam(reason)
                .with_matched_keywords(keyword_result.matched_keywords);
            return (Some(ticket), self.attach_debug(result, debug_info));
        }

        let Some(classifier) = &self.classifier else {
            debug!(ticket_id = %ticket.id, "No AI available, no keyword matches found");
            let result = AnalysisResult::clean("No spam keywords found (AI not configured)");
            return (Some(ticket), self.attach_debug(result, debug_info));
        };

        info!(
            event = "ai_called",
            ticket_id = %ticket.id,
            model = %self.config.model,
            "Requesting AI classification"
        );
        let verdict = classifier.classify_spam(&content, &self.keywords);
        let verdict_is_clean = matches!(&verdict, Ok(v) if !v.is_spam);

        let result = resolve_ai_outcome(Some(&keyword_result), verdict);
        let result = if verdict_is_clean {
            self.attach_debug(result, debug_info)
        } else {
            result
        };
        (Some(ticket), result)
    }

    fn debug_info(&self, content: &str) -> Option<DebugInfo> {
        if !self.config.enable_logging {
            return None;
        }
        Some(DebugInfo {
            keywords_count: self.keywords.len(),
            keywords: self.keywords.head(DEBUG_KEYWORD_LIMIT).to_vec(),
            content_length: content.len(),
            content_preview: content.chars().take(DEBUG_PREVIEW_CHARS).collect(),
        })
    }

    fn attach_debug(&self, result: AnalysisResult, debug_info: Option<DebugInfo>) -> AnalysisResult {
        match debug_info {
            Some(info) => result.with_debug(info),
            None => result,
        }
    }
}

/// Combine an AI classification with the keyword check that preceded it
///
/// - spam verdict: spam, carrying confidence and indicators
/// - clean verdict: clean, carrying confidence
/// - AI failure after a clean keyword check: clean ("AI unavailable")
/// - AI failure with no keyword check: failure with the AI error
pub fn resolve_ai_outcome<E: Display>(
    keyword_result: Option<&KeywordMatch>,
    verdict: Result<ClassificationVerdict, E>,
) -> AnalysisResult {
    match verdict {
        Ok(verdict) if verdict.is_spam => {
            info!(confidence = verdict.confidence, "AI detected spam");
            AnalysisResult::spam(format!(
                "AI detected spam (confidence: {}%): {}",
                verdict.confidence, verdict.reasoning
            ))
            .with_confidence(verdict.confidence)
            .with_spam_indicators(verdict.indicators)
        }
        Ok(verdict) => {
            info!(confidence = verdict.confidence, "AI determined not spam");
            AnalysisResult::clean(format!(
                "AI determined this is not spam (confidence: {}%)",
                verdict.confidence
            ))
            .with_confidence(verdict.confidence)
        }
        Err(e) => {
            warn!(event = "ai_failed", error = %e, "AI analysis failed");
            match keyword_result {
                Some(_) => {
                    warn!(
                        event = "ai_degraded",
                        "Falling back to clean keyword result"
                    );
                    AnalysisResult::clean("No spam keywords found (AI unavailable)")
                }
                None => AnalysisResult::failure(format!(
                    "AI analysis failed and no keywords configured: {}",
                    e
                )),
            }
        }
    }
}
