//! Diagnostic observer hook.
//!
//! The extraction core never writes trace files. It reports what it tried and
//! why it gave up through [`DiagnosticSink::on_diagnostic`], and the caller
//! decides where that goes.

use serde::Serialize;

use crate::result::Strategy;

/// Something worth recording about one entry (or the run, with an empty id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// An entry node had no readable identifier and was skipped.
    IdentifierUnreadable { position: usize },
    /// A later node repeated an identifier already collected.
    DuplicateEntry,
    /// A "More" control could not be triggered.
    ExpandFailed { reason: String },
    /// A text strategy is about to run.
    StrategyAttempted { strategy: Strategy },
    /// A text strategy produced nothing usable.
    StrategyRejected { strategy: Strategy, reason: String },
    /// A text strategy's candidate was accepted.
    TextAccepted { strategy: Strategy, text: String },
    /// Every text strategy failed.
    NoValidText,
    /// A field's element was missing; the field took its default.
    FieldMissing { field: &'static str },
    /// The relative date could not be turned into a date.
    DateUnparsed { raw: String },
    /// A tagged text node appeared before any bucket label.
    UnlabeledTag { text: String },
    /// Raw style attribute of a media button.
    ImageStyle { style: String },
    /// An image URL was not harvested.
    ImageRejected { url: String, reason: String },
    /// An image was stored.
    ImageCaptured { url: String, file: String },
    ImageFetchFailed { url: String, reason: String },
    /// The entry produced no record.
    EntrySkipped { reason: String },
}

/// Receiver for diagnostic events.
pub trait DiagnosticSink {
    fn on_diagnostic(&mut self, entry_id: &str, event: &DiagnosticEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn on_diagnostic(&mut self, _entry_id: &str, _event: &DiagnosticEvent) {}
}

/// Forwards events to `tracing`.
///
/// Degraded results (skips, fetch failures, missing text) go to `warn`, the
/// rest to `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn on_diagnostic(&mut self, entry_id: &str, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::EntrySkipped { .. }
            | DiagnosticEvent::ImageFetchFailed { .. }
            | DiagnosticEvent::NoValidText
            | DiagnosticEvent::IdentifierUnreadable { .. } => {
                tracing::warn!(entry = entry_id, ?event, "entry degraded");
            }
            _ => tracing::debug!(entry = entry_id, ?event, "diagnostic"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub events: Vec<(String, DiagnosticEvent)>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded for one entry, in order.
    pub fn for_entry<'a>(&'a self, entry_id: &'a str) -> impl Iterator<Item = &'a DiagnosticEvent> + 'a {
        self.events
            .iter()
            .filter(move |(id, _)| id == entry_id)
            .map(|(_, event)| event)
    }

    /// Strategies attempted for one entry, in order.
    #[must_use]
    pub fn attempted_strategies(&self, entry_id: &str) -> Vec<Strategy> {
        self.for_entry(entry_id)
            .filter_map(|event| match event {
                DiagnosticEvent::StrategyAttempted { strategy } => Some(*strategy),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn on_diagnostic(&mut self, entry_id: &str, event: &DiagnosticEvent) {
        self.events.push((entry_id.to_string(), event.clone()));
    }
}

/// Fans one event out to two sinks.
pub struct Tee<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A, B> DiagnosticSink for Tee<'_, A, B>
where
    A: DiagnosticSink + ?Sized,
    B: DiagnosticSink + ?Sized,
{
    fn on_diagnostic(&mut self, entry_id: &str, event: &DiagnosticEvent) {
        self.first.on_diagnostic(entry_id, event);
        self.second.on_diagnostic(entry_id, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_filters_by_entry() {
        let mut sink = MemorySink::new();
        sink.on_diagnostic("a", &DiagnosticEvent::StrategyAttempted { strategy: Strategy::Primary });
        sink.on_diagnostic("b", &DiagnosticEvent::StrategyAttempted { strategy: Strategy::Primary });
        sink.on_diagnostic("a", &DiagnosticEvent::StrategyAttempted { strategy: Strategy::TaggedScan });

        assert_eq!(
            sink.attempted_strategies("a"),
            vec![Strategy::Primary, Strategy::TaggedScan]
        );
        assert_eq!(sink.for_entry("b").count(), 1);
        assert_eq!(sink.for_entry("c").count(), 0);
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let mut left = MemorySink::new();
        let mut right = MemorySink::new();
        {
            let mut tee = Tee { first: &mut left, second: &mut right };
            tee.on_diagnostic("x", &DiagnosticEvent::NoValidText);
        }
        assert_eq!(left.events.len(), 1);
        assert_eq!(right.events, left.events);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = DiagnosticEvent::DateUnparsed { raw: "Edited today".into() };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"date_unparsed""#));
        assert!(json.contains("Edited today"));
    }
}
