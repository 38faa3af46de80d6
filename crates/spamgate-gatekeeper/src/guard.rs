//! At-most-once analysis per ticket

use spamgate_domain::TicketId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of tickets currently being analyzed
///
/// Clones share the same set, so one instance can be handed to every
/// `Analyzer` serving the same host.
#[derive(Debug, Clone, Default)]
pub struct InFlightTickets {
    active: Arc<Mutex<HashSet<TicketId>>>,
}

impl InFlightTickets {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as in flight; `None` when it already is
    ///
    /// The mark is removed when the returned guard drops.
    pub fn try_acquire(&self, id: &TicketId) -> Option<InFlightGuard> {
        if !self.lock().insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            id: id.clone(),
            active: Arc::clone(&self.active),
        })
    }

    /// Whether `id` is currently in flight
    pub fn contains(&self, id: &TicketId) -> bool {
        self.lock().contains(id)
    }

    /// Number of tickets in flight
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no ticket is in flight
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<TicketId>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases a ticket's in-flight mark on drop
#[derive(Debug)]
pub struct InFlightGuard {
    id: TicketId,
    active: Arc<Mutex<HashSet<TicketId>>>,
}

impl InFlightGuard {
    /// Ticket held by this guard
    pub fn ticket_id(&self) -> &TicketId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_second_acquire_rejected_until_drop() {
        let tickets = InFlightTickets::new();
        let id = TicketId::from("42");

        let guard = tickets.try_acquire(&id).unwrap();
        assert_eq!(guard.ticket_id(), &id);
        assert!(tickets.contains(&id));
        assert!(tickets.try_acquire(&id).is_none());

        drop(guard);
        assert!(tickets.is_empty());
        assert!(tickets.try_acquire(&id).is_some());
    }

    #[test]
    fn test_different_tickets_independent() {
        let tickets = InFlightTickets::new();
        let _a = tickets.try_acquire(&TicketId::from("a")).unwrap();
        let _b = tickets.try_acquire(&TicketId::from("b")).unwrap();
        assert_eq!(tickets.len(), 2);
    }

    #[test]
    fn test_concurrent_acquire_single_winner() {
        let tickets = InFlightTickets::new();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tickets = tickets.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    // Hold the guard until every thread has tried
                    let guard = tickets.try_acquire(&TicketId::from("7"));
                    let won = guard.is_some();
                    barrier.wait();
                    won
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(tickets.is_empty());
    }
}
