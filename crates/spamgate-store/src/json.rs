//! File-backed ticket store

use crate::{default_statuses, StoreError};
use serde::{Deserialize, Serialize};
use spamgate_domain::traits::TicketStore;
use spamgate_domain::{AttachmentData, InternalNote, Ticket, TicketId, TicketStatus};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// On-disk layout of the ticket file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TicketFile {
    #[serde(default = "default_statuses")]
    statuses: Vec<TicketStatus>,

    #[serde(default)]
    tickets: Vec<Ticket>,
}

/// Ticket store persisted as a JSON document
///
/// ```json
/// {
///   "statuses": [{ "id": 3, "name": "Closed", "state": "closed" }],
///   "tickets": [{
///     "id": "1001",
///     "subject": "Hello",
///     "entries": [{
///       "body": "<p>See attached</p>",
///       "attachments": [{
///         "filename": "flyer.pdf",
///         "mime_type": "application/pdf",
///         "size": 5120,
///         "data": { "path": "files/flyer.pdf" }
///       }]
///     }]
///   }]
/// }
/// ```
///
/// Relative attachment paths resolve against the file's directory. Every
/// note or status change rewrites the whole file through a temp file in the
/// same directory followed by a rename.
#[derive(Debug)]
pub struct JsonTicketStore {
    path: PathBuf,
    base_dir: PathBuf,
    data: TicketFile,
}

impl JsonTicketStore {
    /// Open an existing ticket file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let raw = fs::read_to_string(&path)?;
        let data: TicketFile = serde_json::from_str(&raw)?;

        debug!(
            path = %path.display(),
            tickets = data.tickets.len(),
            statuses = data.statuses.len(),
            "Opened ticket file"
        );

        Ok(Self {
            base_dir: Self::base_dir_of(&path),
            path,
            data,
        })
    }

    /// Create a new ticket file holding `tickets` and the default statuses
    pub fn create<P: AsRef<Path>>(path: P, tickets: Vec<Ticket>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let store = Self {
            base_dir: Self::base_dir_of(&path),
            path,
            data: TicketFile {
                statuses: default_statuses(),
                tickets,
            },
        };
        store.save()?;
        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn base_dir_of(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.data)?;

        let mut tmp = NamedTempFile::new_in(&self.base_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), "Saved ticket file");
        Ok(())
    }

    fn position(&self, id: &TicketId) -> Result<usize, StoreError> {
        self.data
            .tickets
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Copy of a stored ticket with attachment paths made absolute
    fn resolved(&self, ticket: &Ticket) -> Ticket {
        let mut ticket = ticket.clone();
        for attachment in ticket.entries.iter_mut().flat_map(|e| e.attachments.iter_mut()) {
            if let AttachmentData::Path(path) = &mut attachment.data {
                if path.is_relative() {
                    *path = self.base_dir.join(&*path);
                }
            }
        }
        ticket
    }
}

impl TicketStore for JsonTicketStore {
    type Error = StoreError;

    fn lookup(&self, id: &TicketId) -> Result<Option<Ticket>, Self::Error> {
        Ok(self
            .data
            .tickets
            .iter()
            .find(|t| &t.id == id)
            .map(|t| self.resolved(t)))
    }

    fn statuses(&self) -> Result<Vec<TicketStatus>, Self::Error> {
        Ok(self.data.statuses.clone())
    }

    fn log_note(&mut self, id: &TicketId, note: InternalNote) -> Result<(), Self::Error> {
        let index = self.position(id)?;
        self.data.tickets[index].notes.push(note);
        self.save()
    }

    fn set_status(&mut self, id: &TicketId, status: &TicketStatus) -> Result<(), Self::Error> {
        if !self.data.statuses.contains(status) {
            return Err(StoreError::UnknownStatus(status.id));
        }
        let index = self.position(id)?;
        self.data.tickets[index].status = Some(status.clone());
        self.save()
    }
}
