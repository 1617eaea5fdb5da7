use std::collections::VecDeque;
use tracing::warn;

use super::event::TelemetryEvent;
use super::metrics::TelemetrySnapshot;

pub const MAX_EVENTS: usize = 10_000;

/// Bounded event log plus running totals. Oldest events are evicted first;
/// the totals keep counting.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
    capacity: usize,
    totals: TelemetrySnapshot,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity.min(MAX_EVENTS)),
            capacity,
            totals: TelemetrySnapshot::default(),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        self.totals.observe(&event);
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
            if self.totals.dropped == 0 {
                warn!(capacity = self.capacity, "telemetry buffer full, evicting oldest events");
            }
            self.totals.dropped += 1;
        }
        self.buffer.push_back(event);
    }

    /// Events still held in the buffer, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> + '_ {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.totals.clone()
    }

    /// Empties the buffer and resets the totals.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.totals = TelemetrySnapshot::default();
    }
}
