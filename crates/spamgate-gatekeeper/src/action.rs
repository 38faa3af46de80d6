//! Close and annotate actions on the host ticket

use spamgate_domain::traits::TicketStore;
use spamgate_domain::{InternalNote, Ticket, TicketStatus};
use tracing::{info, warn};

/// Title of the note written when a ticket is closed as spam
pub const SPAM_NOTE_TITLE: &str = "Spam Detected - Auto Closed";

/// Title of the note written when a ticket is left open
pub const CHECK_SKIPPED_NOTE_TITLE: &str = "Spam Check - Not Performed";

/// Close-reason text used when the configured template is blank
const FALLBACK_CLOSE_REASON: &str = "Closed as spam";

/// Close a ticket as spam
///
/// Declines (returns `false` without touching the ticket) when the ticket is
/// already closed or the host defines no closed-state status. Otherwise
/// writes a system note with `close_reason` and `reason`, moves the ticket
/// to the first closed-state status and updates `ticket` to match.
///
/// Store failures are logged and reported as `false`. When the note was
/// written but the status update failed, a retry does not write it again.
pub fn close_ticket<S: TicketStore>(
    store: &mut S,
    ticket: &mut Ticket,
    close_reason: &str,
    reason: &str,
) -> bool {
    if ticket.is_closed() {
        info!(ticket_id = %ticket.id, "Ticket already closed, nothing to do");
        return false;
    }

    let closed_status = match store.statuses() {
        Ok(statuses) => statuses.into_iter().find(TicketStatus::is_closed),
        Err(e) => {
            warn!(ticket_id = %ticket.id, error = %e, "Failed to list ticket statuses");
            return false;
        }
    };
    let Some(closed_status) = closed_status else {
        warn!(ticket_id = %ticket.id, "No closed status defined, ticket left open");
        return false;
    };

    let template = if close_reason.trim().is_empty() {
        FALLBACK_CLOSE_REASON
    } else {
        close_reason
    };
    let note = InternalNote::system(
        SPAM_NOTE_TITLE,
        format!("{}<br><br>Reason: {}", escape_html(template), escape_html(reason)),
    );

    // A previous attempt may have written the note before the status update failed
    let already_noted = ticket
        .notes
        .last()
        .is_some_and(|last| last.title == SPAM_NOTE_TITLE);
    if !already_noted {
        if let Err(e) = store.log_note(&ticket.id, note.clone()) {
            warn!(ticket_id = %ticket.id, error = %e, "Failed to log close note");
            return false;
        }
        ticket.notes.push(note);
    }

    if let Err(e) = store.set_status(&ticket.id, &closed_status) {
        warn!(ticket_id = %ticket.id, error = %e, "Failed to close ticket");
        return false;
    }

    info!(
        event = "ticket_closed",
        ticket_id = %ticket.id,
        number = %ticket.number,
        status = %closed_status.name,
        "Closed ticket as spam"
    );
    ticket.status = Some(closed_status);
    true
}

/// Record on the ticket why it was not closed
///
/// Never changes the status. Errors are logged and swallowed.
pub fn log_check_failure<S: TicketStore>(store: &mut S, ticket: &mut Ticket, reason: &str) {
    let note = InternalNote::system(
        CHECK_SKIPPED_NOTE_TITLE,
        format!(
            "Automatic spam check was not performed.<br><br>Reason: {}",
            escape_html(reason)
        ),
    );

    match store.log_note(&ticket.id, note.clone()) {
        Ok(()) => ticket.notes.push(note),
        Err(e) => warn!(ticket_id = %ticket.id, error = %e, "Failed to log check failure note"),
    }
}

/// Escape text for inclusion in an HTML note body
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use spamgate_domain::{StatusState, TicketId};
    use spamgate_store::MemoryTicketStore;

    const CLOSE_REASON: &str = "Closed automatically.";

    fn open_status() -> TicketStatus {
        TicketStatus::new(1, "Open", StatusState::Open)
    }

    fn store_with(ticket: &Ticket) -> MemoryTicketStore {
        MemoryTicketStore::new().with_ticket(ticket.clone())
    }

    #[test]
    fn test_close_open_ticket() {
        let mut ticket = Ticket::new("1", "Win").with_status(open_status());
        let mut store = store_with(&ticket);

        assert!(close_ticket(&mut store, &mut ticket, CLOSE_REASON, "Detected spam keywords: casino"));

        let stored = store.ticket(&TicketId::from("1")).unwrap();
        assert!(stored.is_closed());
        assert_eq!(stored.notes.len(), 1);
        assert_eq!(stored.notes[0].title, SPAM_NOTE_TITLE);
        assert_eq!(
            stored.notes[0].body,
            "Closed automatically.<br><br>Reason: Detected spam keywords: casino"
        );
        assert_eq!(stored.notes[0].poster, "SYSTEM");
        assert!(ticket.is_closed());
        assert_eq!(ticket.notes.len(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut ticket = Ticket::new("1", "Win").with_status(open_status());
        let mut store = store_with(&ticket);

        assert!(close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));
        assert!(!close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));

        assert_eq!(store.notes(&TicketId::from("1")).len(), 1);
    }

    #[test]
    fn test_already_closed_declines() {
        let closed = TicketStatus::new(3, "Closed", StatusState::Closed);
        let mut ticket = Ticket::new("1", "Win").with_status(closed);
        let mut store = store_with(&ticket);

        assert!(!close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));
        assert!(store.notes(&TicketId::from("1")).is_empty());
    }

    #[test]
    fn test_no_closed_status_declines_without_note() {
        let mut ticket = Ticket::new("1", "Win").with_status(open_status());
        let mut store = MemoryTicketStore::with_statuses(vec![
            open_status(),
            TicketStatus::new(2, "Resolved", StatusState::Resolved),
        ])
        .with_ticket(ticket.clone());

        assert!(!close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));

        let stored = store.ticket(&TicketId::from("1")).unwrap();
        assert!(stored.notes.is_empty());
        assert_eq!(stored.status, Some(open_status()));
    }

    #[test]
    fn test_first_closed_status_is_used() {
        let spam_status = TicketStatus::new(9, "Closed - Spam", StatusState::Closed);
        let mut ticket = Ticket::new("1", "Win");
        let mut store = MemoryTicketStore::with_statuses(vec![
            open_status(),
            spam_status.clone(),
            TicketStatus::new(3, "Closed", StatusState::Closed),
        ])
        .with_ticket(ticket.clone());

        assert!(close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));
        assert_eq!(ticket.status, Some(spam_status));
    }

    #[test]
    fn test_note_is_escaped_and_blank_template_falls_back() {
        let mut ticket = Ticket::new("1", "Win");
        let mut store = store_with(&ticket);

        assert!(close_ticket(&mut store, &mut ticket, "  ", "<script>alert('x')</script> & co"));

        assert_eq!(
            store.notes(&TicketId::from("1"))[0].body,
            "Closed as spam<br><br>Reason: &lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt; &amp; co"
        );
    }

    #[test]
    fn test_store_failure_reports_false() {
        let mut ticket = Ticket::new("1", "Win");
        let mut store = store_with(&ticket).with_failing_status_updates();

        assert!(!close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));
        assert!(!ticket.is_closed());
    }

    #[test]
    fn test_retry_after_status_failure_writes_one_note() {
        let mut ticket = Ticket::new("1", "Win").with_status(open_status());
        let mut store = store_with(&ticket).with_failing_status_updates();

        assert!(!close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));
        assert!(!close_ticket(&mut store, &mut ticket, CLOSE_REASON, "spam"));

        assert_eq!(store.notes(&TicketId::from("1")).len(), 1);
        assert_eq!(ticket.notes.len(), 1);
        assert!(!ticket.is_closed());
    }

    #[test]
    fn test_log_check_failure() {
        let mut ticket = Ticket::new("1", "Hello").with_status(open_status());
        let mut store = store_with(&ticket);

        log_check_failure(&mut store, &mut ticket, "No spam keywords configured");

        let stored = store.ticket(&TicketId::from("1")).unwrap();
        assert_eq!(stored.notes.len(), 1);
        assert_eq!(stored.notes[0].title, CHECK_SKIPPED_NOTE_TITLE);
        assert_eq!(
            stored.notes[0].body,
            "Automatic spam check was not performed.<br><br>Reason: No spam keywords configured"
        );
        assert_eq!(stored.status, Some(open_status()));
    }

    #[test]
    fn test_log_check_failure_swallows_errors() {
        let mut ticket = Ticket::new("1", "Hello");
        let mut store = store_with(&ticket).with_failing_notes();

        log_check_failure(&mut store, &mut ticket, "reason");
        assert!(ticket.notes.is_empty());
    }
}
