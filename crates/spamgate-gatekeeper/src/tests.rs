//! Integration tests for the Analyzer

#[cfg(test)]
mod tests {
    use crate::{
        Analyzer, InFlightTickets, SpamGateConfig, CHECK_SKIPPED_NOTE_TITLE, SPAM_NOTE_TITLE,
    };
    use spamgate_domain::{
        Attachment, ClassificationVerdict, StatusState, ThreadEntry, Ticket, TicketId, TicketStatus,
    };
    use spamgate_llm::{ChatCompletionsProvider, MockProvider};
    use spamgate_store::MemoryTicketStore;

    fn open() -> TicketStatus {
        TicketStatus::new(1, "Open", StatusState::Open)
    }

    fn ticket(id: &str, subject: &str, body: &str) -> Ticket {
        Ticket::new(id, subject)
            .with_status(open())
            .with_entry(ThreadEntry::new(body))
    }

    fn config(keywords: &str) -> SpamGateConfig {
        SpamGateConfig::default().with_spam_keywords(keywords)
    }

    fn id(raw: &str) -> TicketId {
        TicketId::from(raw)
    }

    #[test]
    fn test_keyword_match_closes_without_ai() {
        let provider = MockProvider::new(ClassificationVerdict::new(false, 99));
        let analyzer = Analyzer::new(config("buy now, casino"), Some(provider.clone()));
        let mut store = MemoryTicketStore::new()
            .with_ticket(ticket("1", "Deal", "<p>Buy now and save 90%</p>"));

        let result = analyzer.try_close_ticket(&mut store, &id("1"));

        assert!(result.success);
        assert_eq!(result.is_spam, Some(true));
        assert_eq!(result.matched_keywords, Some(vec!["buy now".to_string()]));
        assert_eq!(result.reason.as_deref(), Some("Detected spam keywords: buy now"));
        assert_eq!(result.closed, Some(true));
        assert_eq!(provider.classify_calls(), 0);

        let stored = store.ticket(&id("1")).unwrap();
        assert!(stored.is_closed());
        assert_eq!(stored.notes.len(), 1);
        assert_eq!(stored.notes[0].title, SPAM_NOTE_TITLE);
        assert!(stored.notes[0].body.ends_with("Reason: Detected spam keywords: buy now"));
    }

    #[test]
    fn test_ai_clean_verdict_never_closes() {
        let provider = MockProvider::new(ClassificationVerdict::new(false, 82));
        let analyzer = Analyzer::new(config("casino"), Some(provider.clone()));
        let mut store = MemoryTicketStore::new()
            .with_ticket(ticket("2", "Printer", "My printer is broken"));

        let result = analyzer.try_close_ticket(&mut store, &id("2"));

        assert!(result.success);
        assert_eq!(result.is_spam, Some(false));
        assert_eq!(result.confidence, Some(82));
        assert_eq!(result.closed, Some(false));
        assert_eq!(provider.classify_calls(), 1);
        assert_eq!(
            provider.last_content().as_deref(),
            Some("Subject: Printer\n\nMy printer is broken")
        );

        let stored = store.ticket(&id("2")).unwrap();
        assert_eq!(stored.status, Some(open()));
        assert_eq!(stored.notes.len(), 1);
        assert_eq!(stored.notes[0].title, CHECK_SKIPPED_NOTE_TITLE);
        assert!(stored.notes[0]
            .body
            .ends_with("No spam detected: AI determined this is not spam (confidence: 82%)"));
    }

    #[test]
    fn test_ai_spam_verdict_closes() {
        let provider = MockProvider::new(
            ClassificationVerdict::new(true, 95)
                .with_reasoning("Advance-fee scam")
                .with_indicators(["inheritance", "wire transfer"]),
        );
        let analyzer = Analyzer::new(config("casino"), Some(provider));
        let mut store = MemoryTicketStore::new()
            .with_ticket(ticket("3", "Inheritance", "Send a wire transfer to claim it"));

        let result = analyzer.try_close_ticket(&mut store, &id("3"));

        assert_eq!(result.is_spam, Some(true));
        assert_eq!(
            result.reason.as_deref(),
            Some("AI detected spam (confidence: 95%): Advance-fee scam")
        );
        assert_eq!(result.confidence, Some(95));
        assert_eq!(
            result.spam_indicators,
            Some(vec!["inheritance".to_string(), "wire transfer".to_string()])
        );
        assert_eq!(result.closed, Some(true));
        assert!(store.ticket(&id("3")).unwrap().is_closed());
    }

    #[test]
    fn test_no_ai_configured_logs_note_once() {
        let analyzer = Analyzer::new(config("casino"), None::<MockProvider>);
        let mut store = MemoryTicketStore::new().with_ticket(ticket("4", "Hello", "Question about billing"));

        let result = analyzer.try_close_ticket(&mut store, &id("4"));

        assert!(result.success);
        assert_eq!(result.is_spam, Some(false));
        assert_eq!(
            result.message.as_deref(),
            Some("No spam keywords found (AI not configured)")
        );
        assert_eq!(result.error, None);

        let notes = store.notes(&id("4"));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, CHECK_SKIPPED_NOTE_TITLE);
    }

    #[test]
    fn test_ai_failure_degrades_to_clean() {
        let provider = MockProvider::failing("Communication error: connection refused");
        let analyzer = Analyzer::new(config("casino"), Some(provider.clone()));
        let mut store = MemoryTicketStore::new().with_ticket(ticket("5", "Hello", "Where is my order?"));

        let result = analyzer.analyze_ticket(&store, &id("5"));

        assert!(result.success);
        assert_eq!(result.is_spam, Some(false));
        assert_eq!(
            result.message.as_deref(),
            Some("No spam keywords found (AI unavailable)")
        );
        assert_eq!(provider.classify_calls(), 1);

        // analyze_ticket never touches the ticket
        assert!(store.notes(&id("5")).is_empty());
        let closed = analyzer.try_close_ticket(&mut store, &id("5"));
        assert_eq!(closed.closed, Some(false));
        assert_eq!(store.notes(&id("5")).len(), 1);
    }

    #[test]
    fn test_ticket_not_found() {
        let provider = MockProvider::default();
        let analyzer = Analyzer::new(config("casino"), Some(provider.clone()));
        let mut store = MemoryTicketStore::new();

        let result = analyzer.try_close_ticket(&mut store, &id("404"));

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Ticket not found"));
        assert_eq!(result.is_spam, None);
        assert_eq!(result.closed, None);
        assert_eq!(provider.classify_calls(), 0);
    }

    #[test]
    fn test_store_error_reported_as_exception() {
        let analyzer = Analyzer::new(config("casino"), None::<MockProvider>);
        let store = MemoryTicketStore::new()
            .with_ticket(ticket("6", "Hello", "body"))
            .with_failing_lookups();

        let result = analyzer.analyze_ticket(&store, &id("6"));

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Exception: Store unavailable: lookup disabled")
        );
    }

    #[test]
    fn test_no_keywords_configured_fails_before_extraction() {
        let provider = MockProvider::new(ClassificationVerdict::new(true, 99)).with_ocr_text("casino");
        let analyzer = Analyzer::new(config(" ; , "), Some(provider.clone()));
        let t = ticket("7", "Pic", "see image")
            .with_entry(ThreadEntry::new("").with_attachment(Attachment::inline("a.png", "image/png", vec![0x89])));
        let mut store = MemoryTicketStore::new().with_ticket(t);

        let result = analyzer.try_close_ticket(&mut store, &id("7"));

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No spam keywords configured"));
        assert_eq!(result.closed, Some(false));
        assert_eq!(provider.extract_calls(), 0);
        assert_eq!(provider.classify_calls(), 0);

        let notes = store.notes(&id("7"));
        assert_eq!(notes.len(), 1);
        assert!(notes[0].body.ends_with("Reason: No spam keywords configured"));
        assert!(!store.ticket(&id("7")).unwrap().is_closed());
    }

    #[test]
    fn test_image_text_feeds_keyword_check() {
        let provider = MockProvider::default().with_ocr_text("Visit our CASINO tonight");
        let analyzer = Analyzer::new(config("casino"), Some(provider.clone()));
        let t = Ticket::new("8", "Flyer").with_entry(
            ThreadEntry::new("").with_attachment(Attachment::inline("f.jpg", "image/jpeg", vec![0xff, 0xd8])),
        );
        let store = MemoryTicketStore::new().with_ticket(t);

        let result = analyzer.analyze_ticket(&store, &id("8"));

        assert_eq!(result.matched_keywords, Some(vec!["casino".to_string()]));
        assert_eq!(provider.extract_calls(), 1);
        assert_eq!(provider.classify_calls(), 0);
    }

    #[test]
    fn test_oversized_attachment_contributes_nothing() {
        let provider = MockProvider::new(ClassificationVerdict::new(false, 70)).with_ocr_text("casino");
        let mut cfg = config("casino");
        cfg.max_file_size_mb = 1;
        let analyzer = Analyzer::new(cfg, Some(provider.clone()));
        let big = Attachment::inline("big.png", "image/png", vec![0u8; 1024 * 1024 + 1]);
        let t = Ticket::new("9", "Big").with_entry(ThreadEntry::new("hi").with_attachment(big));
        let store = MemoryTicketStore::new().with_ticket(t);

        let result = analyzer.analyze_ticket(&store, &id("9"));

        assert_eq!(result.is_spam, Some(false));
        assert_eq!(provider.extract_calls(), 0);
        assert_eq!(provider.last_content().as_deref(), Some("Subject: Big\n\nhi"));
    }

    #[test]
    fn test_debug_info_when_logging_enabled() {
        let analyzer = Analyzer::new(
            config("casino, lottery").with_logging(true),
            None::<MockProvider>,
        );
        let store = MemoryTicketStore::new().with_ticket(ticket("10", "Hi", "Play the lottery"));

        let result = analyzer.analyze_ticket(&store, &id("10"));
        let debug = result.debug.unwrap();

        assert_eq!(debug.keywords_count, 2);
        assert_eq!(debug.keywords, vec!["casino", "lottery"]);
        assert_eq!(debug.content_preview, "Subject: Hi\n\nPlay the lottery");
        assert_eq!(debug.content_length, debug.content_preview.len());
    }

    #[test]
    fn test_debug_info_absent_by_default_and_for_ai_spam() {
        let analyzer = Analyzer::new(config("casino"), None::<MockProvider>);
        let store = MemoryTicketStore::new().with_ticket(ticket("11", "Hi", "casino"));
        assert!(analyzer.analyze_ticket(&store, &id("11")).debug.is_none());

        let provider = MockProvider::new(ClassificationVerdict::new(true, 90));
        let analyzer = Analyzer::new(config("casino").with_logging(true), Some(provider));
        let store = MemoryTicketStore::new().with_ticket(ticket("12", "Hi", "crypto doubling"));
        assert!(analyzer.analyze_ticket(&store, &id("12")).debug.is_none());
    }

    #[test]
    fn test_debug_preview_is_truncated() {
        let analyzer = Analyzer::new(config("casino").with_logging(true), None::<MockProvider>);
        let body = "é".repeat(400);
        let store = MemoryTicketStore::new().with_ticket(ticket("13", "", &body));

        let debug = analyzer.analyze_ticket(&store, &id("13")).debug.unwrap();
        assert_eq!(debug.content_preview.chars().count(), 300);
        assert_eq!(debug.content_length, 800);
    }

    #[test]
    fn test_already_closed_spam_ticket() {
        let closed = TicketStatus::new(3, "Closed", StatusState::Closed);
        let analyzer = Analyzer::new(config("casino"), None::<MockProvider>);
        let t = Ticket::new("14", "casino").with_status(closed);
        let mut store = MemoryTicketStore::new().with_ticket(t);

        let result = analyzer.try_close_ticket(&mut store, &id("14"));

        assert_eq!(result.is_spam, Some(true));
        assert_eq!(result.closed, Some(false));
        assert!(store.notes(&id("14")).is_empty());
    }

    #[test]
    fn test_on_ticket_created_respects_auto_close() {
        let t = ticket("15", "Jackpot", "Lottery winner!");

        let analyzer = Analyzer::new(config("lottery").with_auto_close(false), None::<MockProvider>);
        let mut store = MemoryTicketStore::new().with_ticket(t.clone());
        assert!(analyzer.on_ticket_created(&mut store, &id("15")).is_none());
        assert!(store.notes(&id("15")).is_empty());

        let analyzer = Analyzer::new(config("lottery"), None::<MockProvider>);
        let result = analyzer.on_ticket_created(&mut store, &id("15")).unwrap();
        assert_eq!(result.closed, Some(true));
        assert!(store.ticket(&id("15")).unwrap().is_closed());
    }

    #[test]
    fn test_in_flight_guard_rejects_concurrent_close() {
        let in_flight = InFlightTickets::new();
        let analyzer = Analyzer::new(config("casino"), None::<MockProvider>)
            .with_in_flight_guard(in_flight.clone());
        let mut store = MemoryTicketStore::new().with_ticket(ticket("16", "Hi", "casino"));

        let held = in_flight.try_acquire(&id("16")).unwrap();
        let result = analyzer.try_close_ticket(&mut store, &id("16"));
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Analysis already in progress for ticket 16")
        );
        assert!(store.notes(&id("16")).is_empty());

        drop(held);
        let result = analyzer.try_close_ticket(&mut store, &id("16"));
        assert_eq!(result.closed, Some(true));
        assert!(in_flight.is_empty());
    }

    #[test]
    fn test_result_json_shape() {
        let analyzer = Analyzer::new(config("casino"), Some(MockProvider::new(ClassificationVerdict::new(false, 82))));
        let store = MemoryTicketStore::new().with_ticket(ticket("17", "Hi", "hello"));

        let json = serde_json::to_value(analyzer.analyze_ticket(&store, &id("17"))).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "is_spam": false,
                "confidence": 82,
                "message": "AI determined this is not spam (confidence: 82%)"
            })
        );
    }

    #[test]
    fn test_from_config() {
        let analyzer = Analyzer::from_config(SpamGateConfig::default()).unwrap();
        assert!(!analyzer.is_ai_configured());

        let analyzer = Analyzer::from_config(SpamGateConfig::default().with_api_key("sk-test")).unwrap();
        assert!(analyzer.is_ai_configured());

        let invalid = SpamGateConfig {
            timeout_secs: 0,
            ..SpamGateConfig::default()
        };
        assert!(Analyzer::from_config(invalid).is_err());
    }

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ai_events_emitted_once_per_classification() {
        let config = SpamGateConfig {
            api_provider: crate::ApiProvider::Custom,
            api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout_secs: 2,
            ..config("casino")
        }
        .with_api_key("sk-test");
        let analyzer = Analyzer::from_config(config).unwrap();
        let store = MemoryTicketStore::new().with_ticket(ticket("1", "Printer", "It is jammed"));

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            analyzer.analyze_ticket(&store, &id("1"))
        });

        assert_eq!(result.message.as_deref(), Some("No spam keywords found (AI unavailable)"));
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("ai_called").count(), 1);
        assert_eq!(output.matches("ai_failed").count(), 1);
        assert_eq!(output.matches("ai_degraded").count(), 1);
    }

    #[test]
    fn test_analyzer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer<MockProvider>>();
        assert_send_sync::<Analyzer<ChatCompletionsProvider>>();
    }
}
