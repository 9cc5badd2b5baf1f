use std::io::{self, Result as IoResult};
use std::sync::{Arc, Mutex};

use super::event::DecisionEvent;

/// Abstraction over an output target that consumes decision events.
pub trait DecisionSink: Send + Sync {
    /// Handle one event. The sink decides how to serialize or forward it;
    /// errors are swallowed by the log so recording never affects control
    /// flow.
    fn handle(&mut self, event: &DecisionEvent) -> IoResult<()>;
}

/// Default sink: structured `tracing` records at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DecisionSink for TracingSink {
    fn handle(&mut self, event: &DecisionEvent) -> IoResult<()> {
        tracing::info!(
            request_id = %event.request_id,
            word = %event.word,
            section = %event.section,
            data_source = ?event.data_source,
            latency_s = event.latency,
            outcome = ?event.outcome,
            "lookup decision"
        );
        Ok(())
    }
}

/// In-memory sink for testing and snapshots.
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<DecisionEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all captured events.
    pub fn snapshot(&self) -> Vec<DecisionEvent> {
        self.entries.lock().unwrap().clone()
    }

    /// Clear all captured events.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl DecisionSink for MemorySink {
    fn handle(&mut self, event: &DecisionEvent) -> IoResult<()> {
        self.entries.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Channel-based sink forwarding events to a flume consumer (e.g. a
/// dashboard or SSE endpoint).
pub struct ChannelSink {
    tx: flume::Sender<DecisionEvent>,
}

impl ChannelSink {
    pub fn new(tx: flume::Sender<DecisionEvent>) -> Self {
        Self { tx }
    }
}

impl DecisionSink for ChannelSink {
    fn handle(&mut self, event: &DecisionEvent) -> IoResult<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "channel receiver dropped"))
    }
}
