use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Schema generations of the telemetry feed, oldest first.
/// Capability is monotonic: the derived `Ord` is the gating order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameVersion {
    /// No supported game detected. Every field is gated off.
    #[default]
    None,
    EvochronMercenary,
    EvochronLegacy,
}

impl GameVersion {
    pub const ALL: [GameVersion; 3] = [
        GameVersion::None,
        GameVersion::EvochronMercenary,
        GameVersion::EvochronLegacy,
    ];

    fn ordinal(self) -> u8 {
        match self {
            GameVersion::None => 0,
            GameVersion::EvochronMercenary => 1,
            GameVersion::EvochronLegacy => 2,
        }
    }

    fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            1 => GameVersion::EvochronMercenary,
            2 => GameVersion::EvochronLegacy,
            _ => GameVersion::None,
        }
    }
}

/// Read side of game detection. The engine only ever asks, never sets.
pub trait VersionRegistry: Send + Sync {
    fn current_version(&self) -> GameVersion;
}

impl VersionRegistry for GameVersion {
    fn current_version(&self) -> GameVersion {
        *self
    }
}

impl<T: VersionRegistry + ?Sized> VersionRegistry for Arc<T> {
    fn current_version(&self) -> GameVersion {
        (**self).current_version()
    }
}

/// Version cell shared between the detector (host side) and the engine.
#[derive(Debug, Clone, Default)]
pub struct SharedVersion {
    cell: Arc<AtomicU8>,
}

impl SharedVersion {
    pub fn new(version: GameVersion) -> Self {
        Self {
            cell: Arc::new(AtomicU8::new(version.ordinal())),
        }
    }

    /// Host-side setter, called when game detection changes its mind.
    pub fn set(&self, version: GameVersion) {
        self.cell.store(version.ordinal(), Ordering::Release);
    }
}

impl VersionRegistry for SharedVersion {
    fn current_version(&self) -> GameVersion {
        GameVersion::from_ordinal(self.cell.load(Ordering::Acquire))
    }
}
