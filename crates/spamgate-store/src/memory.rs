//! In-memory ticket store

use crate::{default_statuses, StoreError};
use spamgate_domain::traits::TicketStore;
use spamgate_domain::{InternalNote, Ticket, TicketId, TicketStatus};
use std::collections::BTreeMap;

/// Ticket store backed by a map
///
/// Failure switches let tests exercise store errors on each operation.
#[derive(Debug, Clone)]
pub struct MemoryTicketStore {
    tickets: BTreeMap<TicketId, Ticket>,
    statuses: Vec<TicketStatus>,
    fail_lookups: bool,
    fail_notes: bool,
    fail_status_updates: bool,
}

impl MemoryTicketStore {
    /// Create an empty store with the default status table
    pub fn new() -> Self {
        Self::with_statuses(default_statuses())
    }

    /// Create an empty store with a custom status table
    pub fn with_statuses(statuses: Vec<TicketStatus>) -> Self {
        Self {
            tickets: BTreeMap::new(),
            statuses,
            fail_lookups: false,
            fail_notes: false,
            fail_status_updates: false,
        }
    }

    /// Add or replace a ticket
    pub fn insert(&mut self, ticket: Ticket) {
        self.tickets.insert(ticket.id.clone(), ticket);
    }

    /// Builder form of `insert`
    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.insert(ticket);
        self
    }

    /// Make every `lookup` fail
    pub fn with_failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Make every `log_note` fail
    pub fn with_failing_notes(mut self) -> Self {
        self.fail_notes = true;
        self
    }

    /// Make every `set_status` fail
    pub fn with_failing_status_updates(mut self) -> Self {
        self.fail_status_updates = true;
        self
    }

    /// Borrow a stored ticket
    pub fn ticket(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.get(id)
    }

    /// Notes logged on a ticket, empty when the ticket is unknown
    pub fn notes(&self, id: &TicketId) -> &[InternalNote] {
        self.tickets.get(id).map(|t| t.notes.as_slice()).unwrap_or(&[])
    }

    /// Number of stored tickets
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Check if the store holds no tickets
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    fn ticket_mut(&mut self, id: &TicketId) -> Result<&mut Ticket, StoreError> {
        self.tickets
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl Default for MemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore for MemoryTicketStore {
    type Error = StoreError;

    fn lookup(&self, id: &TicketId) -> Result<Option<Ticket>, Self::Error> {
        if self.fail_lookups {
            return Err(StoreError::Unavailable("lookup disabled".to_string()));
        }
        Ok(self.tickets.get(id).cloned())
    }

    fn statuses(&self) -> Result<Vec<TicketStatus>, Self::Error> {
        Ok(self.statuses.clone())
    }

    fn log_note(&mut self, id: &TicketId, note: InternalNote) -> Result<(), Self::Error> {
        if self.fail_notes {
            return Err(StoreError::Unavailable("notes disabled".to_string()));
        }
        self.ticket_mut(id)?.notes.push(note);
        Ok(())
    }

    fn set_status(&mut self, id: &TicketId, status: &TicketStatus) -> Result<(), Self::Error> {
        if self.fail_status_updates {
            return Err(StoreError::Unavailable("status updates disabled".to_string()));
        }
        if !self.statuses.contains(status) {
            return Err(StoreError::UnknownStatus(status.id));
        }
        self.ticket_mut(id)?.status = Some(status.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spamgate_domain::StatusState;

    #[test]
    fn test_lookup_missing() {
        let store = MemoryTicketStore::new();
        assert!(store.lookup(&TicketId::from("nope")).unwrap().is_none());
    }

    #[test]
    fn test_set_status_requires_known_status() {
        let mut store = MemoryTicketStore::new().with_ticket(Ticket::new("1", "s"));
        let bogus = TicketStatus::new(99, "Spam", StatusState::Closed);

        let err = store.set_status(&TicketId::from("1"), &bogus).unwrap_err();
        assert!(matches!(err, StoreError::UnknownStatus(99)));
    }

    #[test]
    fn test_mutations_on_unknown_ticket() {
        let mut store = MemoryTicketStore::new();
        let err = store
            .log_note(&TicketId::from("x"), InternalNote::system("t", "b"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Ticket not found: x");
    }

    #[test]
    fn test_failure_switches() {
        let id = TicketId::from("1");
        let mut store = MemoryTicketStore::new()
            .with_ticket(Ticket::new("1", "s"))
            .with_failing_lookups()
            .with_failing_notes()
            .with_failing_status_updates();
        let closed = default_statuses()[2].clone();

        assert!(store.lookup(&id).is_err());
        assert!(store.log_note(&id, InternalNote::system("t", "b")).is_err());
        assert!(store.set_status(&id, &closed).is_err());
        assert!(store.notes(&id).is_empty());
    }
}
