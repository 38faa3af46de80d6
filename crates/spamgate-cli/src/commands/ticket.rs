//! Ticket analysis commands.

use crate::error::Result;
use spamgate_domain::traits::{SpamClassifier, TicketStore};
use spamgate_domain::{AnalysisResult, TicketId};
use spamgate_gatekeeper::{Analyzer, SpamGateConfig};
use spamgate_store::JsonTicketStore;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::error;

/// What to do with a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    /// Report the verdict only
    Analyze,
    /// Close spam, annotate everything else
    Close,
    /// New-ticket hook, honours `auto_close`
    Created,
}

/// Execute a ticket command against a JSON ticket file.
///
/// Returns `None` when the new-ticket hook is disabled.
pub fn execute_ticket(
    action: TicketAction,
    id: &TicketId,
    config: SpamGateConfig,
    tickets: &Path,
) -> Result<Option<AnalysisResult>> {
    let mut store = JsonTicketStore::open(tickets)?;
    let analyzer = Analyzer::from_config(config)?;
    Ok(run_ticket_action(&analyzer, &mut store, action, id))
}

/// Run `action` on one ticket, turning a panic into a failed result.
pub fn run_ticket_action<C, S>(
    analyzer: &Analyzer<C>,
    store: &mut S,
    action: TicketAction,
    id: &TicketId,
) -> Option<AnalysisResult>
where
    C: SpamClassifier,
    S: TicketStore,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match action {
        TicketAction::Analyze => Some(analyzer.analyze_ticket(store, id)),
        TicketAction::Close => Some(analyzer.try_close_ticket(store, id)),
        TicketAction::Created => analyzer.on_ticket_created(store, id),
    }));

    outcome.unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!(event = "analysis_panicked", ticket_id = %id, error = %message, "Analysis panicked");
        Some(AnalysisResult::failure(format!("FATAL ERROR: {}", message)))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
