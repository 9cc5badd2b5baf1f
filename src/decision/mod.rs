//! Decision logging: one structured provenance event per request.
//!
//! The log broadcasts each [`DecisionEvent`] to every registered
//! [`DecisionSink`] and to any flume subscribers. Sink failures are logged
//! and swallowed; the resolver's control flow never depends on the log.

mod event;
mod sink;

pub use event::{DecisionEvent, DecisionOutcome};
pub use sink::{ChannelSink, DecisionSink, MemorySink, TracingSink};

use std::sync::{Arc, Mutex};

/// Broadcast hub for decision events.
#[derive(Clone)]
pub struct DecisionLog {
    sinks: Arc<Mutex<Vec<Box<dyn DecisionSink>>>>,
}

impl Default for DecisionLog {
    fn default() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl DecisionLog {
    /// Create a log with a single sink.
    pub fn with_sink<T>(sink: T) -> Self
    where
        T: DecisionSink + 'static,
    {
        Self {
            sinks: Arc::new(Mutex::new(vec![Box::new(sink)])),
        }
    }

    /// Create a log with no sinks (events only reach subscribers).
    pub fn disabled() -> Self {
        Self {
            sinks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Dynamically add a sink (useful for per-deployment observability).
    pub fn add_sink<T: DecisionSink + 'static>(&self, sink: T) {
        self.sinks.lock().unwrap().push(Box::new(sink));
    }

    /// Subscribe to the event feed through a flume channel.
    pub fn subscribe(&self) -> flume::Receiver<DecisionEvent> {
        let (tx, rx) = flume::unbounded();
        self.add_sink(ChannelSink::new(tx));
        rx
    }

    /// Record one event, broadcasting to every sink.
    pub fn record(&self, event: DecisionEvent) {
        let mut sinks = self.sinks.lock().expect("decision sinks poisoned");
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.handle(&event) {
                tracing::warn!(error = %e, "decision sink error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DataSource;
    use crate::section::Section;

    #[test]
    fn record_broadcasts_to_all_sinks_and_subscribers() {
        let log = DecisionLog::disabled();
        let memory = MemorySink::new();
        log.add_sink(memory.clone());
        let rx = log.subscribe();

        log.record(DecisionEvent::new(
            "run",
            Section::Basic.encode(),
            Some(DataSource::Authoritative),
            0.2,
            DecisionOutcome::Complete,
        ));

        assert_eq!(memory.snapshot().len(), 1);
        let received = rx.recv().unwrap();
        assert_eq!(received.word, "run");
        assert_eq!(received.outcome, DecisionOutcome::Complete);
    }

    #[test]
    fn dropped_subscriber_does_not_poison_recording() {
        let log = DecisionLog::disabled();
        drop(log.subscribe());
        log.record(DecisionEvent::new(
            "run",
            Section::Frequency.encode(),
            None,
            0.0,
            DecisionOutcome::ClientError,
        ));
        // A second record still works after the broken-pipe sink error.
        log.record(DecisionEvent::new(
            "walk",
            Section::Frequency.encode(),
            None,
            0.0,
            DecisionOutcome::ClientError,
        ));
    }
}
