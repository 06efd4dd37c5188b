//! Subtitle event delivery.

use std::sync::Mutex;
use std::time::SystemTime;

/// One display update from a streaming session.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEvent {
    /// Raw source-language transcript this event was built from.
    pub text: String,
    /// Stable translated text, None when no translator is configured.
    pub committed_translation: Option<String>,
    /// Volatile translated text, fully replaced on the next event.
    pub draft_translation: Option<String>,
    /// Wall-clock time the event was produced.
    pub timestamp: SystemTime,
    /// False only for the final event of a session.
    pub is_partial: bool,
}

impl SubtitleEvent {
    /// Event carrying only the raw transcript, for translator-less runs.
    pub fn raw(text: String, is_partial: bool) -> Self {
        Self {
            text,
            committed_translation: None,
            draft_translation: None,
            timestamp: SystemTime::now(),
            is_partial,
        }
    }

    /// Event carrying a committed/draft translation pair.
    pub fn translated(
        text: String,
        committed: String,
        draft: String,
        is_partial: bool,
    ) -> Self {
        Self {
            text,
            committed_translation: Some(committed),
            draft_translation: Some(draft),
            timestamp: SystemTime::now(),
            is_partial,
        }
    }
}

/// Receives finished subtitle events from the pipeline.
///
/// Implementations must not block: events are delivered from the
/// pipeline's own loops, and a stalled sink stalls translation.
pub trait SubtitleSink: Send + Sync {
    fn emit(&self, event: SubtitleEvent);
}

/// Sink that collects events in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectorSink {
    events: Mutex<Vec<SubtitleEvent>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far, in order.
    pub fn events(&self) -> Vec<SubtitleEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubtitleSink for CollectorSink {
    fn emit(&self, event: SubtitleEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sink that prints events to stderr, one line per update.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl SubtitleSink for StderrSink {
    fn emit(&self, event: SubtitleEvent) {
        match (&event.committed_translation, &event.draft_translation) {
            (Some(committed), Some(draft)) => {
                eprintln!("[subtitle] {} | {} ~{}", event.text, committed, draft);
            }
            _ => eprintln!("[subtitle] {}", event.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_records_in_order() {
        let sink = CollectorSink::new();
        sink.emit(SubtitleEvent::raw("one".to_string(), true));
        sink.emit(SubtitleEvent::raw("two".to_string(), true));
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].text, "one");
        assert_eq!(events[1].text, "two");
        assert!(events[0].is_partial);
    }

    #[test]
    fn test_translated_event_carries_both_spans() {
        let event = SubtitleEvent::translated(
            "source".to_string(),
            "committed".to_string(),
            "draft".to_string(),
            false,
        );
        assert_eq!(event.committed_translation.as_deref(), Some("committed"));
        assert_eq!(event.draft_translation.as_deref(), Some("draft"));
        assert!(!event.is_partial);
    }
}
