//! SpamGate Storage Layer
//!
//! Implements the `TicketStore` trait for hosts that do not bring their own.
//!
//! # Stores
//!
//! - `MemoryTicketStore`: in-process map, used by tests and embedders
//! - `JsonTicketStore`: a JSON file of statuses and tickets, rewritten
//!   atomically on every mutation
//!
//! # Examples
//!
//! ```
//! use spamgate_store::MemoryTicketStore;
//! use spamgate_domain::{InternalNote, Ticket, TicketId};
//! use spamgate_domain::traits::TicketStore;
//!
//! let mut store = MemoryTicketStore::new();
//! store.insert(Ticket::new("42", "Hello"));
//!
//! let id = TicketId::from("42");
//! store.log_note(&id, InternalNote::system("Title", "Body")).unwrap();
//! assert_eq!(store.notes(&id).len(), 1);
//! ```

#![warn(missing_docs)]

mod json;
mod memory;

pub use json::JsonTicketStore;
pub use memory::MemoryTicketStore;

use spamgate_domain::{StatusState, TicketStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ticket file could not be parsed or written
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ticket not found
    #[error("Ticket not found: {0}")]
    NotFound(String),

    /// Status is not defined by the store
    #[error("Unknown status: {0}")]
    UnknownStatus(u32),

    /// Store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Status table used when a store is created without one
///
/// Mirrors the stock statuses of a typical help desk.
pub fn default_statuses() -> Vec<TicketStatus> {
    vec![
        TicketStatus::new(1, "Open", StatusState::Open),
        TicketStatus::new(2, "Resolved", StatusState::Resolved),
        TicketStatus::new(3, "Closed", StatusState::Closed),
        TicketStatus::new(4, "Archived", StatusState::Archived),
        TicketStatus::new(5, "Deleted", StatusState::Deleted),
    ]
}
