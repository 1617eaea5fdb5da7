use super::event::TelemetryEvent;
use crate::kernel::decode::DecodeErrorKind;
use crate::kernel::time::Tick;

/// Running totals since the recorder was created or last cleared. Eviction
/// from the event buffer does not reduce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub decode: DecodeStats,
    pub version_changes: u64,
    /// Events evicted from the ring buffer since the last clear.
    pub dropped: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub missing_key: u64,
    pub parse_failure: u64,
    pub unmapped_code: u64,
    pub type_mismatch: u64,
    pub last_event_tick: Option<Tick>,
}

impl DecodeStats {
    pub fn total(&self) -> u64 {
        self.missing_key + self.parse_failure + self.unmapped_code + self.type_mismatch
    }
}

impl TelemetrySnapshot {
    /// Folds one recorded event into the totals.
    pub fn observe(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::Decode(decode) => {
                match decode.error.kind() {
                    DecodeErrorKind::MissingKey => self.decode.missing_key += 1,
                    DecodeErrorKind::ParseFailure => self.decode.parse_failure += 1,
                    DecodeErrorKind::UnmappedCode => self.decode.unmapped_code += 1,
                    DecodeErrorKind::TypeMismatch => self.decode.type_mismatch += 1,
                }
                self.decode.last_event_tick = self.decode.last_event_tick.max(Some(decode.tick));
            }
            TelemetryEvent::VersionChanged { .. } => self.version_changes += 1,
        }
    }
}
