//! Normalizes the player-ship telemetry table exposed by a running Evochron
//! game into typed, version-gated snapshots.

pub mod kernel;

// Re-export specific items for convenient access
pub use kernel::catalog::{CatalogBuilder, CatalogError, Field, SchemaCatalog, SlotKind};
pub use kernel::config::{ConfigError, EngineConfig};
pub use kernel::engine::{NormalizationEngine, SnapshotReader};
pub use kernel::poller::{Poller, PollerHandle};
pub use kernel::raw::{RawEntry, RawSource, RawTable};
pub use kernel::state::{Position, ShieldQuadrant, ShieldStatus, ShipState, SlotArray};
pub use kernel::version::{GameVersion, SharedVersion, VersionRegistry};
