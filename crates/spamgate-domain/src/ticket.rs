//! Ticket module - the host system's view of a support ticket

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Identifier of a ticket in the host system
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Create a ticket id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Lifecycle state behind a ticket status
///
/// A host system can define many statuses ("Closed", "Closed - Spam",
/// "Resolved") but each maps onto one of these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Ticket is active
    Open,
    /// Ticket was resolved by staff
    Resolved,
    /// Ticket is closed
    Closed,
    /// Ticket is archived
    Archived,
    /// Ticket is deleted
    Deleted,
}

impl StatusState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusState::Open => "open",
            StatusState::Resolved => "resolved",
            StatusState::Closed => "closed",
            StatusState::Archived => "archived",
            StatusState::Deleted => "deleted",
        }
    }
}

/// A status defined by the host system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatus {
    /// Host identifier of the status
    pub id: u32,

    /// Display name (e.g., "Closed")
    pub name: String,

    /// State this status represents
    pub state: StatusState,
}

impl TicketStatus {
    /// Create a new status
    pub fn new(id: u32, name: impl Into<String>, state: StatusState) -> Self {
        Self {
            id,
            name: name.into(),
            state,
        }
    }

    /// Whether this status puts a ticket in the closed state
    pub fn is_closed(&self) -> bool {
        self.state == StatusState::Closed
    }
}

/// Where the bytes of an attachment live
///
/// Content is only read when a decoder needs it, so oversized files never
/// leave disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentData {
    /// Content stored in a file on disk
    Path(PathBuf),

    /// Content held in memory (base64 when serialized)
    Inline(#[serde(with = "base64_bytes")] Vec<u8>),
}

/// A file attached to a thread entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original filename
    pub filename: String,

    /// Declared MIME type (e.g., "application/pdf")
    pub mime_type: String,

    /// Declared size in bytes
    pub size: u64,

    /// Content source
    pub data: AttachmentData,
}

impl Attachment {
    /// Create an in-memory attachment; size is taken from the content
    pub fn inline(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            data: AttachmentData::Inline(bytes),
        }
    }

    /// Create an attachment backed by a file on disk
    pub fn from_path(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size,
            data: AttachmentData::Path(path.into()),
        }
    }

    /// Lowercased filename extension, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Fetch the attachment content
    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        match &self.data {
            AttachmentData::Path(path) => std::fs::read(path),
            AttachmentData::Inline(bytes) => Ok(bytes.clone()),
        }
    }
}

/// One message in a ticket's thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEntry {
    /// Message body (rich text / HTML)
    #[serde(default)]
    pub body: String,

    /// Files attached to this message
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ThreadEntry {
    /// Create an entry without attachments
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    /// Add an attachment
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// An internal note logged on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNote {
    /// Note title
    pub title: String,

    /// Note body (HTML)
    pub body: String,

    /// Who wrote the note
    pub poster: String,
}

impl InternalNote {
    /// Poster name used for notes written by the engine
    pub const SYSTEM_POSTER: &'static str = "SYSTEM";

    /// Create a system-authored note
    pub fn system(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            poster: Self::SYSTEM_POSTER.to_string(),
        }
    }
}

/// Snapshot of a support ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Host identifier
    pub id: TicketId,

    /// Human-facing ticket number
    #[serde(default)]
    pub number: String,

    /// Ticket subject
    #[serde(default)]
    pub subject: String,

    /// Thread entries in chronological order
    #[serde(default)]
    pub entries: Vec<ThreadEntry>,

    /// Current status
    #[serde(default)]
    pub status: Option<TicketStatus>,

    /// Internal notes logged so far
    #[serde(default)]
    pub notes: Vec<InternalNote>,
}

impl Ticket {
    /// Create an empty ticket with the given id and subject
    pub fn new(id: impl Into<TicketId>, subject: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            number: id.to_string(),
            id,
            subject: subject.into(),
            entries: Vec::new(),
            status: None,
            notes: Vec::new(),
        }
    }

    /// Append a thread entry
    pub fn with_entry(mut self, entry: ThreadEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Set the current status
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether the ticket is currently in the closed state
    pub fn is_closed(&self) -> bool {
        self.status.as_ref().is_some_and(TicketStatus::is_closed)
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Encode bytes the same way inline attachments are serialized
pub fn encode_inline(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
