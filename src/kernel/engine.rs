//! The normalization engine: raw telemetry table in, one typed [`ShipState`]
//! out per refresh.
//!
//! # Refresh rules
//!
//! * A field below its first supporting generation (or above its cap) is
//!   absent and its key is never read.
//! * A missing key or an entry of the wrong type makes the field absent.
//! * An unmapped enum code keeps the previous snapshot's value.
//! * A garbled fuel gauge keeps the previous remaining/total and drops the
//!   percentage. Each half of the energy bias keeps its previous value on
//!   its own when it fails to parse.
//! * Slot arrays are rebuilt from scratch, up to the generation's capacity.
//! * The shield total is read from the feed only on generations flagged as
//!   reporting it, otherwise it is the truncated mean of the four facings.
//!
//! Problems are recorded as telemetry, never returned.
//!
//! # Publication
//!
//! The new snapshot is built off to the side and swapped in with a single
//! `ArcSwap::store`. Readers holding a [`SnapshotReader`] see either the old
//! or the new snapshot, never a mix. `update` takes `&mut self`, so refreshes
//! on one engine are serialized by construction.

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::catalog::{Field, SchemaCatalog, SlotKind};
use super::config::{ConfigError, EngineConfig};
use super::decode::{self, CodeTable, DecodeError};
use super::raw::{RawEntry, RawSource};
use super::state::{Position, ShieldQuadrant, ShieldStatus, ShipState, SlotArray};
use super::telemetry::event::{DecodeEvent, TelemetryEvent};
use super::telemetry::metrics::TelemetrySnapshot;
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Tick;
use super::version::{GameVersion, VersionRegistry};

/// Cheap, cloneable read handle on an engine's published snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Arc<ArcSwap<ShipState>>,
}

impl SnapshotReader {
    /// Pins the current snapshot. The returned `Arc` stays valid across
    /// later refreshes.
    pub fn load(&self) -> Arc<ShipState> {
        self.slot.load_full()
    }
}

pub struct NormalizationEngine {
    id: Uuid,
    catalog: SchemaCatalog,
    source: Arc<dyn RawSource>,
    versions: Arc<dyn VersionRegistry>,
    published: Arc<ArcSwap<ShipState>>,
    pub telemetry: TelemetryRecorder,
    tick: Tick,
    last_version: Option<GameVersion>,
}

impl NormalizationEngine {
    pub fn new(
        catalog: SchemaCatalog,
        source: impl RawSource + 'static,
        versions: impl VersionRegistry + 'static,
    ) -> Self {
        Self::with_recorder(catalog, source, versions, TelemetryRecorder::new())
    }

    /// Builds the catalog from `config` first; a bad catalog fails here.
    pub fn from_config(
        config: &EngineConfig,
        source: impl RawSource + 'static,
        versions: impl VersionRegistry + 'static,
    ) -> Result<Self, ConfigError> {
        let catalog = config.catalog()?;
        let recorder = TelemetryRecorder::with_capacity(config.decode_event_capacity);
        Ok(Self::with_recorder(catalog, source, versions, recorder))
    }

    fn with_recorder(
        catalog: SchemaCatalog,
        source: impl RawSource + 'static,
        versions: impl VersionRegistry + 'static,
        telemetry: TelemetryRecorder,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(engine = %id, "normalization engine created");
        Self {
            id,
            catalog,
            source: Arc::new(source),
            versions: Arc::new(versions),
            published: Arc::new(ArcSwap::from_pointee(ShipState::new())),
            telemetry,
            tick: Tick::default(),
            last_version: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Number of completed refreshes.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            slot: Arc::clone(&self.published),
        }
    }

    pub fn snapshot(&self) -> Arc<ShipState> {
        self.published.load_full()
    }

    pub fn decode_events(&self) -> impl Iterator<Item = &DecodeEvent> + '_ {
        self.telemetry.events().filter_map(TelemetryEvent::as_decode)
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    /// Runs one full refresh and publishes the result. Never fails; every
    /// field problem is isolated to that field and recorded.
    pub fn update(&mut self) -> Tick {
        let tick = self.tick.next();
        let version = self.versions.current_version();

        if self.last_version != Some(version) {
            info!(engine = %self.id, %tick, ?version, "schema generation detected");
            if let Some(from) = self.last_version {
                self.telemetry.record(TelemetryEvent::VersionChanged {
                    tick,
                    from,
                    to: version,
                });
            }
            self.last_version = Some(version);
        }

        let previous = self.published.load_full();
        let mut pass = RefreshPass {
            catalog: &self.catalog,
            source: &*self.source,
            version,
            tick,
            events: Vec::new(),
        };
        let next = pass.build(&previous);
        let events = pass.events;

        for event in events {
            debug!(
                engine = %self.id,
                %tick,
                key = %event.key,
                kind = ?event.error.kind(),
                "{}",
                event.error
            );
            self.telemetry.record(TelemetryEvent::Decode(event));
        }

        self.published.store(Arc::new(next));
        self.tick = tick;
        tick
    }
}

/// State for a single refresh. Borrowed pieces of the engine plus the events
/// collected so far.
struct RefreshPass<'a> {
    catalog: &'a SchemaCatalog,
    source: &'a dyn RawSource,
    version: GameVersion,
    tick: Tick,
    events: Vec<DecodeEvent>,
}

impl RefreshPass<'_> {
    fn build(&mut self, prev: &ShipState) -> ShipState {
        let (fuel_remaining, fuel_total, fuel_percentage) = self.fuel(prev);
        let (shield_bias, weapon_bias) = self.bias(prev);

        ShipState {
            version: self.version,

            fuel_remaining,
            fuel_total,
            fuel_percentage,

            energy_level: self.int(Field::EnergyLevel),
            shield_level: self.int(Field::ShieldLevel),
            engine_health: self.int(Field::EngineHealth),
            weapon_health: self.int(Field::WeaponHealth),
            nav_health: self.int(Field::NavHealth),
            particle_cannon: self.text(Field::ParticleCannon),
            beam_cannon: self.text(Field::BeamCannon),
            ship_type: self.text(Field::ShipType),
            engine_class: self.int(Field::EngineClass),
            shield_class: self.int(Field::ShieldClass),
            cargo_capacity: self.int(Field::CargoCapacity),
            wing_class: self.int(Field::WingClass),
            crew_limit: self.int(Field::CrewLimit),
            equipment_limit: self.int(Field::EquipmentLimit),
            countermeasure_limit: self.int(Field::CountermeasureLimit),
            hardpoint_limit: self.int(Field::HardpointLimit),
            armor_limit: self.int(Field::ArmorLimit),
            particle_cannon_range: self.int(Field::ParticleCannonRange),
            missile_range: self.int(Field::MissileRange),
            targeted_subsystem: self.text(Field::TargetedSubsystem),
            countermeasures: self.int(Field::Countermeasures),
            ids_multiplier: self.int(Field::IdsMultiplier),
            velocity: self.int(Field::Velocity),
            set_velocity: self.int(Field::SetVelocity),
            altitude: self.int(Field::Altitude),
            heat_signature_level: self.int(Field::HeatSignatureLevel),
            total_velocity: self.int(Field::TotalVelocity),
            heading: self.int(Field::Heading),
            pitch: self.int(Field::Pitch),

            position: self.position([Field::PositionX, Field::PositionY, Field::PositionZ]),
            sector_position: self.position([Field::SectorX, Field::SectorY, Field::SectorZ]),

            shields: self.shields(),

            cargo_bay: self.slots(SlotKind::CargoBay),
            secondary_weapons: self.slots(SlotKind::SecondaryWeapon),
            equipment: self.slots(SlotKind::Equipment),

            heat: self.code(Field::Heat, prev.heat),
            mtds: self.code(Field::Mtds, prev.mtds),
            missile_lock: self.code(Field::MissileLock, prev.missile_lock),
            ids: self.code(Field::Ids, prev.ids),
            afterburner: self.code(Field::Afterburner, prev.afterburner),
            autopilot: self.code(Field::Autopilot, prev.autopilot),
            tractor_beam: self.code(Field::TractorBeam, prev.tractor_beam),

            shield_bias,
            weapon_bias,
        }
    }

    fn record(&mut self, key: &str, error: DecodeError) {
        self.events.push(DecodeEvent {
            tick: self.tick,
            key: key.to_string(),
            error,
        });
    }

    /// Gate, then fetch. `None` means gated or missing; missing is recorded.
    fn fetch(&mut self, field: Field) -> Option<RawEntry> {
        if !self.catalog.supports(field, self.version) {
            return None;
        }
        let key = self.catalog.key_for(field);
        let entry = self.source.entry(key);
        if entry.is_none() {
            let key = key.to_string();
            self.record(&key, DecodeError::MissingKey);
        }
        entry
    }

    fn fetch_key(&mut self, key: &str) -> Option<RawEntry> {
        let entry = self.source.entry(key);
        if entry.is_none() {
            self.record(key, DecodeError::MissingKey);
        }
        entry
    }

    fn int(&mut self, field: Field) -> Option<i64> {
        let entry = self.fetch(field)?;
        match entry.as_int() {
            Some(v) => Some(v),
            None => {
                let key = self.catalog.key_for(field).to_string();
                self.record(
                    &key,
                    DecodeError::TypeMismatch {
                        expected: "integer",
                        found: entry.kind(),
                    },
                );
                None
            }
        }
    }

    fn text(&mut self, field: Field) -> Option<String> {
        self.fetch(field).map(|entry| entry.as_text())
    }

    /// Enumerated field. An unmapped code keeps `prev`.
    fn code<T: CodeTable>(&mut self, field: Field, prev: Option<T>) -> Option<T> {
        let code = self.int(field)?;
        match T::decode(code) {
            Ok(value) => Some(value),
            Err(error) => {
                let key = self.catalog.key_for(field).to_string();
                self.record(&key, error);
                prev
            }
        }
    }

    fn level(&mut self, field: Field) -> Option<u8> {
        self.int(field).map(|v| v.clamp(0, 100) as u8)
    }

    fn position(&mut self, axes: [Field; 3]) -> Option<Position> {
        let [x, y, z] = axes.map(|axis| self.int(axis));
        Some(Position {
            x: x?,
            y: y?,
            z: z?,
        })
    }

    fn shields(&mut self) -> ShieldStatus {
        let mut shields = ShieldStatus::default();
        let facings = [
            (ShieldQuadrant::Front, Field::FrontShield),
            (ShieldQuadrant::Right, Field::RightShield),
            (ShieldQuadrant::Left, Field::LeftShield),
            (ShieldQuadrant::Rear, Field::RearShield),
        ];
        for (quadrant, field) in facings {
            let level = self.level(field);
            shields.set(quadrant, level);
        }

        let total = if self.catalog.reports_native_total(self.version) {
            self.level(Field::ShieldTotal)
        } else {
            shields.derived_total()
        };
        shields.set(ShieldQuadrant::Total, total);
        shields
    }

    fn slots(&mut self, kind: SlotKind) -> Option<SlotArray> {
        let capacity = self.catalog.capacity_for(kind, self.version);
        if capacity == 0 {
            return None;
        }
        let catalog = self.catalog;
        let slots = (0..capacity)
            .map(|index| {
                let key = catalog.slot_key(kind, index)?;
                self.fetch_key(key).map(|entry| entry.as_text())
            })
            .collect();
        Some(SlotArray::from_slots(slots))
    }

    /// Fuel gauge: `(remaining, total, percentage)`.
    fn fuel(&mut self, prev: &ShipState) -> (Option<i64>, Option<i64>, Option<f64>) {
        let Some(entry) = self.fetch(Field::Fuel) else {
            return (None, None, None);
        };
        match decode::parse_fuel(&entry.as_text()) {
            Ok(gauge) => (Some(gauge.remaining), Some(gauge.total), Some(gauge.percentage())),
            Err(error) => {
                let key = self.catalog.key_for(Field::Fuel).to_string();
                self.record(&key, error);
                (prev.fuel_remaining, prev.fuel_total, None)
            }
        }
    }

    /// Energy bias: `(shields, weapons)`, each falling back on its own.
    fn bias(&mut self, prev: &ShipState) -> (Option<i32>, Option<i32>) {
        let Some(entry) = self.fetch(Field::EnergyBias) else {
            return (None, None);
        };
        let parsed = decode::parse_bias(&entry.as_text());
        let key = self.catalog.key_for(Field::EnergyBias).to_string();

        let shields = match parsed.shields {
            Ok(v) => Some(v),
            Err(error) => {
                self.record(&key, error);
                prev.shield_bias
            }
        };
        let weapons = match parsed.weapons {
            Ok(v) => Some(v),
            Err(error) => {
                self.record(&key, error);
                prev.weapon_bias
            }
        };
        (shields, weapons)
    }
}
