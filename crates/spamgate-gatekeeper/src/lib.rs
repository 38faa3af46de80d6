//! SpamGate Gatekeeper
//!
//! Decides whether a ticket is spam and acts on the decision.
//!
//! The Gatekeeper provides:
//! - Keyword matching (case-insensitive substring search)
//! - The `Analyzer` decision pipeline: keywords first, AI classification as
//!   fallback, with degradation when the AI is unavailable
//! - Close and annotate actions on the host ticket
//! - Typed, validated configuration
//! - An optional per-ticket in-flight guard
//!
//! # Examples
//!
//! ```
//! use spamgate_gatekeeper::{Analyzer, SpamGateConfig};
//! use spamgate_domain::{ThreadEntry, Ticket, TicketId};
//! use spamgate_llm::MockProvider;
//! use spamgate_store::MemoryTicketStore;
//!
//! let mut store = MemoryTicketStore::new()
//!     .with_ticket(Ticket::new("7", "Act now").with_entry(ThreadEntry::new("Visit our casino")));
//!
//! let analyzer = Analyzer::new(SpamGateConfig::default(), None::<MockProvider>);
//! let result = analyzer.try_close_ticket(&mut store, &TicketId::from("7"));
//!
//! assert_eq!(result.is_spam, Some(true));
//! assert_eq!(result.closed, Some(true));
//! ```

#![warn(missing_docs)]

mod action;
mod analyzer;
mod config;
mod error;
mod guard;
mod matcher;

#[cfg(test)]
mod tests;

pub use action::{
    close_ticket, escape_html, log_check_failure, CHECK_SKIPPED_NOTE_TITLE, SPAM_NOTE_TITLE,
};
pub use analyzer::{resolve_ai_outcome, Analyzer};
pub use config::{ApiProvider, SpamGateConfig};
pub use error::{ConfigError, GatekeeperError};
pub use guard::{InFlightGuard, InFlightTickets};
pub use matcher::{match_keywords, KeywordMatch};
