use serde::Serialize;

use crate::kernel::decode::DecodeError;
use crate::kernel::time::Tick;
use crate::kernel::version::GameVersion;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TelemetryEvent {
    /// A field could not be refreshed and fell back to absence or its
    /// previous value.
    Decode(DecodeEvent),

    /// Game detection reported a different generation than last refresh.
    VersionChanged {
        tick: Tick,
        from: GameVersion,
        to: GameVersion,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeEvent {
    pub tick: Tick,
    pub key: String,
    pub error: DecodeError,
}

impl TelemetryEvent {
    pub fn tick(&self) -> Tick {
        match self {
            TelemetryEvent::Decode(event) => event.tick,
            TelemetryEvent::VersionChanged { tick, .. } => *tick,
        }
    }

    pub fn as_decode(&self) -> Option<&DecodeEvent> {
        match self {
            TelemetryEvent::Decode(event) => Some(event),
            _ => None,
        }
    }
}
