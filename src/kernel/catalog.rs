//! Per-generation table of parameter keys and slot capacities.
//!
//! Both game generations share one catalog. A field is described once, with
//! the first generation that reports it and an optional last one; slot arrays
//! carry one key per physical slot and a capacity per generation.
//!
//! The catalog is validated when built. Anything wrong with it is a
//! [`CatalogError`] at startup, so lookups during a refresh cannot fail.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

use crate::kernel::version::GameVersion;

/// Every raw-backed value the snapshot knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Fuel,
    EnergyLevel,
    ShieldLevel,
    EngineHealth,
    WeaponHealth,
    NavHealth,
    ParticleCannon,
    BeamCannon,
    ShipType,
    EngineClass,
    ShieldClass,
    CargoCapacity,
    WingClass,
    CrewLimit,
    EquipmentLimit,
    CountermeasureLimit,
    HardpointLimit,
    ArmorLimit,
    ParticleCannonRange,
    MissileRange,
    TargetedSubsystem,
    Countermeasures,
    IdsMultiplier,
    Velocity,
    SetVelocity,
    Altitude,
    HeatSignatureLevel,
    TotalVelocity,
    Heading,
    Pitch,
    PositionX,
    PositionY,
    PositionZ,
    SectorX,
    SectorY,
    SectorZ,
    FrontShield,
    RightShield,
    LeftShield,
    RearShield,
    ShieldTotal,
    Heat,
    Mtds,
    MissileLock,
    EnergyBias,
    Ids,
    Afterburner,
    Autopilot,
    TractorBeam,
}

impl Field {
    pub const ALL: [Field; 49] = [
        Field::Fuel,
        Field::EnergyLevel,
        Field::ShieldLevel,
        Field::EngineHealth,
        Field::WeaponHealth,
        Field::NavHealth,
        Field::ParticleCannon,
        Field::BeamCannon,
        Field::ShipType,
        Field::EngineClass,
        Field::ShieldClass,
        Field::CargoCapacity,
        Field::WingClass,
        Field::CrewLimit,
        Field::EquipmentLimit,
        Field::CountermeasureLimit,
        Field::HardpointLimit,
        Field::ArmorLimit,
        Field::ParticleCannonRange,
        Field::MissileRange,
        Field::TargetedSubsystem,
        Field::Countermeasures,
        Field::IdsMultiplier,
        Field::Velocity,
        Field::SetVelocity,
        Field::Altitude,
        Field::HeatSignatureLevel,
        Field::TotalVelocity,
        Field::Heading,
        Field::Pitch,
        Field::PositionX,
        Field::PositionY,
        Field::PositionZ,
        Field::SectorX,
        Field::SectorY,
        Field::SectorZ,
        Field::FrontShield,
        Field::RightShield,
        Field::LeftShield,
        Field::RearShield,
        Field::ShieldTotal,
        Field::Heat,
        Field::Mtds,
        Field::MissileLock,
        Field::EnergyBias,
        Field::Ids,
        Field::Afterburner,
        Field::Autopilot,
        Field::TractorBeam,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    CargoBay,
    SecondaryWeapon,
    Equipment,
}

impl SlotKind {
    pub const ALL: [SlotKind; 3] = [SlotKind::CargoBay, SlotKind::SecondaryWeapon, SlotKind::Equipment];
}

/// Key plus the inclusive generation range it is reported in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub since: GameVersion,
    pub until: Option<GameVersion>,
}

impl FieldSpec {
    pub fn supports(&self, version: GameVersion) -> bool {
        version >= self.since && self.until.map_or(true, |last| version <= last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotSpec {
    keys: Vec<String>,
    capacities: BTreeMap<GameVersion, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("field {0:?} has no key defined")]
    MissingField(Field),

    #[error("field {0:?} has an empty key")]
    EmptyKey(Field),

    #[error("field {field:?} is not reported by any generation (since {since:?}, until {until:?})")]
    NeverSupported {
        field: Field,
        since: GameVersion,
        until: GameVersion,
    },

    #[error("field {0:?} had its version range set before it was defined")]
    RangeBeforeField(Field),

    #[error("slot array {0:?} has no keys defined")]
    MissingSlots(SlotKind),

    #[error("slot array {kind:?} capacity {capacity} at {version:?} exceeds its {keys} keys")]
    CapacityExceedsKeys {
        kind: SlotKind,
        version: GameVersion,
        capacity: usize,
        keys: usize,
    },

    #[error("native shield total requested for {0:?}, which does not report the shield total key")]
    NativeTotalUnsupported(GameVersion),
}

/// Validated schema catalog. Construct with [`SchemaCatalog::standard`] or
/// through [`CatalogBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    fields: Vec<FieldSpec>,
    slots: Vec<SlotSpec>,
    native_total: BTreeSet<GameVersion>,
}

impl SchemaCatalog {
    /// Catalog for the two supported Evochron generations.
    pub fn standard() -> Result<Self, CatalogError> {
        CatalogBuilder::standard().build()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::standard()
    }

    pub fn key_for(&self, field: Field) -> &str {
        &self.fields[field.index()].key
    }

    pub fn spec(&self, field: Field) -> &FieldSpec {
        &self.fields[field.index()]
    }

    pub fn supports(&self, field: Field, version: GameVersion) -> bool {
        self.spec(field).supports(version)
    }

    /// Number of slots populated at `version`. Zero means the array is not
    /// reported at all.
    pub fn capacity_for(&self, kind: SlotKind, version: GameVersion) -> usize {
        self.slots[kind as usize]
            .capacities
            .get(&version)
            .copied()
            .unwrap_or(0)
    }

    pub fn slot_key(&self, kind: SlotKind, index: usize) -> Option<&str> {
        self.slots[kind as usize].keys.get(index).map(String::as_str)
    }

    /// Whether the feed carries its own shield total at `version`.
    pub fn reports_native_total(&self, version: GameVersion) -> bool {
        self.native_total.contains(&version)
    }
}

/// Mutable catalog description. `build` runs every startup check.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    fields: HashMap<Field, FieldSpec>,
    slots: HashMap<SlotKind, SlotSpec>,
    native_total: BTreeSet<GameVersion>,
    /// Fields that got a `since`/`until` before being defined.
    orphaned: BTreeSet<Field>,
}

impl CatalogBuilder {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        use GameVersion::{EvochronLegacy as Legacy, EvochronMercenary as Merc};

        let mut builder = Self::empty();
        for (field, key) in STANDARD_KEYS {
            builder = builder.field(*field, *key, Merc);
        }
        for field in [Field::ArmorLimit, Field::TotalVelocity, Field::Heading, Field::Pitch] {
            builder = builder.since(field, Legacy);
        }

        builder
            .slots(SlotKind::CargoBay, numbered("CARGO BAY", 10), &[(Merc, 5), (Legacy, 10)])
            .slots(SlotKind::SecondaryWeapon, numbered("SECONDARY WEAPON SLOT", 8), &[(Merc, 8), (Legacy, 8)])
            .slots(SlotKind::Equipment, numbered("EQUIPMENT SLOT", 10), &[(Merc, 8), (Legacy, 10)])
    }

    /// Define or replace a field, reported from `since` onward.
    pub fn field(mut self, field: Field, key: impl Into<String>, since: GameVersion) -> Self {
        self.fields.insert(
            field,
            FieldSpec {
                key: key.into(),
                since,
                until: None,
            },
        );
        self
    }

    /// Move a defined field's first generation. On an undefined field this
    /// makes `build` fail with [`CatalogError::RangeBeforeField`].
    pub fn since(mut self, field: Field, since: GameVersion) -> Self {
        match self.fields.get_mut(&field) {
            Some(spec) => spec.since = since,
            None => {
                self.orphaned.insert(field);
            }
        }
        self
    }

    /// Cap a defined field at `until` (inclusive). Same ordering rule as
    /// [`CatalogBuilder::since`].
    pub fn until(mut self, field: Field, until: GameVersion) -> Self {
        match self.fields.get_mut(&field) {
            Some(spec) => spec.until = Some(until),
            None => {
                self.orphaned.insert(field);
            }
        }
        self
    }

    pub fn remove(mut self, field: Field) -> Self {
        self.fields.remove(&field);
        self
    }

    pub fn slots(mut self, kind: SlotKind, keys: Vec<String>, capacities: &[(GameVersion, usize)]) -> Self {
        self.slots.insert(
            kind,
            SlotSpec {
                keys,
                capacities: capacities.iter().copied().collect(),
            },
        );
        self
    }

    pub fn native_total(mut self, version: GameVersion) -> Self {
        self.native_total.insert(version);
        self
    }

    pub fn build(mut self) -> Result<SchemaCatalog, CatalogError> {
        if let Some(field) = self.orphaned.first() {
            return Err(CatalogError::RangeBeforeField(*field));
        }

        let mut fields = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let spec = self.fields.remove(&field).ok_or(CatalogError::MissingField(field))?;
            if spec.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey(field));
            }
            if !GameVersion::ALL.iter().any(|v| spec.supports(*v)) {
                return Err(CatalogError::NeverSupported {
                    field,
                    since: spec.since,
                    until: spec.until.unwrap_or(spec.since),
                });
            }
            fields.push(spec);
        }

        let mut slots = Vec::with_capacity(SlotKind::ALL.len());
        for kind in SlotKind::ALL {
            let spec = self.slots.remove(&kind).ok_or(CatalogError::MissingSlots(kind))?;
            for (version, capacity) in &spec.capacities {
                if *capacity > spec.keys.len() {
                    return Err(CatalogError::CapacityExceedsKeys {
                        kind,
                        version: *version,
                        capacity: *capacity,
                        keys: spec.keys.len(),
                    });
                }
            }
            slots.push(spec);
        }

        let total = &fields[Field::ShieldTotal.index()];
        if let Some(version) = self.native_total.iter().find(|v| !total.supports(**v)) {
            return Err(CatalogError::NativeTotalUnsupported(*version));
        }

        Ok(SchemaCatalog {
            fields,
            slots,
            native_total: self.native_total,
        })
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{} {}", prefix, n)).collect()
}

const STANDARD_KEYS: &[(Field, &str)] = &[
    (Field::Fuel, "FUEL"),
    (Field::EnergyLevel, "ENERGY LEVEL"),
    (Field::ShieldLevel, "SHIELD LEVEL"),
    (Field::EngineHealth, "ENGINE DAMAGE"),
    (Field::WeaponHealth, "WEAPON DAMAGE"),
    (Field::NavHealth, "NAV DAMAGE"),
    (Field::ParticleCannon, "PARTICLE CANNON"),
    (Field::BeamCannon, "BEAM CANNON"),
    (Field::ShipType, "SHIP TYPE"),
    (Field::EngineClass, "ENGINE CLASS"),
    (Field::ShieldClass, "SHIELD CLASS"),
    (Field::CargoCapacity, "CARGO CAPACITY"),
    (Field::WingClass, "WING AND THRUSTER CLASS"),
    (Field::CrewLimit, "CREW LIMIT"),
    (Field::EquipmentLimit, "EQUIPMENT LIMIT"),
    (Field::CountermeasureLimit, "COUNTERMEASURE LIMIT"),
    (Field::HardpointLimit, "HARDPOINT LIMIT"),
    (Field::ArmorLimit, "ARMOR LIMIT"),
    (Field::ParticleCannonRange, "PARTICLE CANNON RANGE"),
    (Field::MissileRange, "ARMED MISSILE RANGE"),
    (Field::TargetedSubsystem, "TARGETED SUBSYSTEM"),
    (Field::Countermeasures, "COUNTERMEASURES REMAINING"),
    (Field::IdsMultiplier, "IDS MULTIPLIER"),
    (Field::Velocity, "PLAYER SHIP VELOCITY"),
    (Field::SetVelocity, "PLAYER SHIP SET VELOCITY"),
    (Field::Altitude, "PLAYER SHIP ALTITUDE"),
    (Field::HeatSignatureLevel, "HEAT SIGNATURE LEVEL"),
    (Field::TotalVelocity, "PLAYER SHIP TOTAL VELOCITY, AVL"),
    (Field::Heading, "PLAYER SHIP HEADING"),
    (Field::Pitch, "PLAYER SHIP PITCH"),
    (Field::PositionX, "PLAYER POSITION X"),
    (Field::PositionY, "PLAYER POSITION Y"),
    (Field::PositionZ, "PLAYER POSITION Z"),
    (Field::SectorX, "PLAYER POSITION SX"),
    (Field::SectorY, "PLAYER POSITION SY"),
    (Field::SectorZ, "PLAYER POSITION SZ"),
    (Field::FrontShield, "FRONT SHIELD LEVEL"),
    (Field::RightShield, "RIGHT SHIELD LEVEL"),
    (Field::LeftShield, "LEFT SHIELD LEVEL"),
    (Field::RearShield, "REAR SHIELD LEVEL"),
    // Same key as hull integrity; only read when a generation is flagged as
    // reporting a native total.
    (Field::ShieldTotal, "SHIELD LEVEL"),
    (Field::Heat, "ENGINE/THRUSTER HEAT INDICATOR"),
    (Field::Mtds, "MDTS STATUS"),
    (Field::MissileLock, "MISSILE LOCK STATUS"),
    (Field::EnergyBias, "ENERGY BIAS SETTING"),
    (Field::Ids, "IDS STATUS"),
    (Field::Afterburner, "AFTERBURNER STATUS"),
    (Field::Autopilot, "AUTOPILOT STATUS"),
    (Field::TractorBeam, "TRACTOR BEAM STATUS"),
];
