//! Integration tests for spamgate-store
//!
//! These tests verify that the file-backed store round-trips tickets and
//! persists every mutation to disk.

use spamgate_domain::traits::TicketStore;
use spamgate_domain::{
    Attachment, AttachmentData, InternalNote, StatusState, ThreadEntry, Ticket, TicketId,
    TicketStatus,
};
use spamgate_store::{default_statuses, JsonTicketStore, MemoryTicketStore, StoreError};
use std::fs;

const TICKET_FILE: &str = r#"{
  "statuses": [
    { "id": 1, "name": "Open", "state": "open" },
    { "id": 7, "name": "Closed - Spam", "state": "closed" }
  ],
  "tickets": [
    {
      "id": "1001",
      "number": "TK-1001",
      "subject": "Congratulations",
      "status": { "id": 1, "name": "Open", "state": "open" },
      "entries": [
        {
          "body": "<p>You are a winner</p>",
          "attachments": [
            {
              "filename": "flyer.txt",
              "mime_type": "text/plain",
              "size": 9,
              "data": { "path": "files/flyer.txt" }
            },
            {
              "filename": "inline.txt",
              "mime_type": "text/plain",
              "size": 5,
              "data": { "inline": "aGVsbG8=" }
            }
          ]
        }
      ]
    }
  ]
}"#;

fn write_fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickets.json");
    fs::write(&path, TICKET_FILE).unwrap();
    (dir, path)
}

#[test]
fn test_open_and_lookup() {
    let (dir, path) = write_fixture();
    let store = JsonTicketStore::open(&path).unwrap();

    let ticket = store.lookup(&TicketId::from("1001")).unwrap().unwrap();
    assert_eq!(ticket.number, "TK-1001");
    assert_eq!(ticket.subject, "Congratulations");
    assert!(!ticket.is_closed());

    let attachments = &ticket.entries[0].attachments;
    assert_eq!(attachments[0].data, AttachmentData::Path(dir.path().join("files/flyer.txt")));
    assert_eq!(attachments[1].read_bytes().unwrap(), b"hello");

    assert!(store.lookup(&TicketId::from("404")).unwrap().is_none());
}

#[test]
fn test_statuses_from_file() {
    let (_dir, path) = write_fixture();
    let store = JsonTicketStore::open(&path).unwrap();

    let statuses = store.statuses().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[1], TicketStatus::new(7, "Closed - Spam", StatusState::Closed));
}

#[test]
fn test_mutations_persist_to_disk() {
    let (_dir, path) = write_fixture();
    let id = TicketId::from("1001");
    let closed = TicketStatus::new(7, "Closed - Spam", StatusState::Closed);

    {
        let mut store = JsonTicketStore::open(&path).unwrap();
        store
            .log_note(&id, InternalNote::system("Spam Detected - Auto Closed", "reason"))
            .unwrap();
        store.set_status(&id, &closed).unwrap();
    }

    let reopened = JsonTicketStore::open(&path).unwrap();
    let ticket = reopened.lookup(&id).unwrap().unwrap();

    assert!(ticket.is_closed());
    assert_eq!(ticket.status, Some(closed));
    assert_eq!(ticket.notes.len(), 1);
    assert_eq!(ticket.notes[0].title, "Spam Detected - Auto Closed");
    assert_eq!(ticket.notes[0].poster, "SYSTEM");

    // Relative attachment paths stay relative on disk
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"files/flyer.txt\""));
}

#[test]
fn test_unknown_status_rejected() {
    let (_dir, path) = write_fixture();
    let mut store = JsonTicketStore::open(&path).unwrap();
    let resolved = TicketStatus::new(2, "Resolved", StatusState::Resolved);

    let err = store.set_status(&TicketId::from("1001"), &resolved).unwrap_err();
    assert!(matches!(err, StoreError::UnknownStatus(2)));
}

#[test]
fn test_note_on_missing_ticket() {
    let (_dir, path) = write_fixture();
    let mut store = JsonTicketStore::open(&path).unwrap();

    let err = store
        .log_note(&TicketId::from("404"), InternalNote::system("t", "b"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "404"));
}

#[test]
fn test_create_uses_default_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.json");

    let ticket = Ticket::new("1", "Hi").with_entry(
        ThreadEntry::new("body").with_attachment(Attachment::inline("a.txt", "text/plain", b"abc".to_vec())),
    );
    JsonTicketStore::create(&path, vec![ticket]).unwrap();

    let store = JsonTicketStore::open(&path).unwrap();
    assert_eq!(store.statuses().unwrap(), default_statuses());
    let ticket = store.lookup(&TicketId::from("1")).unwrap().unwrap();
    assert_eq!(ticket.entries[0].attachments[0].read_bytes().unwrap(), b"abc");
}

#[test]
fn test_missing_statuses_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.json");
    fs::write(&path, r#"{ "tickets": [ { "id": "9" } ] }"#).unwrap();

    let store = JsonTicketStore::open(&path).unwrap();
    assert_eq!(store.statuses().unwrap().len(), 5);
    assert!(store.lookup(&TicketId::from("9")).unwrap().is_some());
}

#[test]
fn test_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(JsonTicketStore::open(&path), Err(StoreError::Serialization(_))));
    assert!(matches!(
        JsonTicketStore::open(dir.path().join("missing.json")),
        Err(StoreError::Io(_))
    ));
}

#[test]
fn test_memory_store_round_trip() {
    let id = TicketId::from("5");
    let mut store = MemoryTicketStore::new().with_ticket(Ticket::new("5", "Subject"));
    let closed = store
        .statuses()
        .unwrap()
        .into_iter()
        .find(TicketStatus::is_closed)
        .unwrap();

    store.set_status(&id, &closed).unwrap();
    store.log_note(&id, InternalNote::system("t", "b")).unwrap();

    assert!(store.ticket(&id).unwrap().is_closed());
    assert_eq!(store.notes(&id).len(), 1);
    assert_eq!(store.len(), 1);
}
