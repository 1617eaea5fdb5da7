use serde::Serialize;

use super::decode::{AutopilotState, HeatState, MissileState, MtdsState, OnOffState};
use crate::kernel::version::GameVersion;

/// Integer position in game units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ShieldQuadrant {
    Front,
    Right,
    Left,
    Rear,
    Total,
}

impl ShieldQuadrant {
    pub const ALL: [ShieldQuadrant; 5] = [
        ShieldQuadrant::Front,
        ShieldQuadrant::Right,
        ShieldQuadrant::Left,
        ShieldQuadrant::Rear,
        ShieldQuadrant::Total,
    ];

    /// The four directional facings, without the aggregate.
    pub const FACINGS: [ShieldQuadrant; 4] = [
        ShieldQuadrant::Front,
        ShieldQuadrant::Right,
        ShieldQuadrant::Left,
        ShieldQuadrant::Rear,
    ];
}

/// Shield strength per quadrant, each 0-100 or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ShieldStatus {
    levels: [Option<u8>; 5],
}

impl ShieldStatus {
    pub fn get(&self, quadrant: ShieldQuadrant) -> Option<u8> {
        self.levels[quadrant as usize]
    }

    pub(crate) fn set(&mut self, quadrant: ShieldQuadrant, level: Option<u8>) {
        self.levels[quadrant as usize] = level;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShieldQuadrant, Option<u8>)> + '_ {
        ShieldQuadrant::ALL.iter().map(move |q| (*q, self.get(*q)))
    }

    /// Truncated mean of the four facings. Absent unless all four are present.
    pub fn derived_total(&self) -> Option<u8> {
        let mut sum: u32 = 0;
        for quadrant in ShieldQuadrant::FACINGS {
            sum += u32::from(self.get(quadrant)?);
        }
        Some((sum / 4) as u8)
    }
}

/// Fixed-capacity slot list. Indices at or past `capacity` read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SlotArray {
    slots: Vec<Option<String>>,
}

impl SlotArray {
    pub(crate) fn from_slots(slots: Vec<Option<String>>) -> Self {
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.slots.iter().map(|slot| slot.as_deref())
    }

    /// Occupied slots only.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_deref().map(|s| (i, s)))
    }
}

/// One complete, immutable view of the player ship.
///
/// Every field is `None` when the current generation does not report it or
/// the feed did not deliver it. Snapshots are only ever replaced whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShipState {
    pub(crate) version: GameVersion,

    // Fuel gauge
    pub(crate) fuel_remaining: Option<i64>,
    pub(crate) fuel_total: Option<i64>,
    pub(crate) fuel_percentage: Option<f64>,

    // Plain scalars
    pub(crate) energy_level: Option<i64>,
    pub(crate) shield_level: Option<i64>,
    pub(crate) engine_health: Option<i64>,
    pub(crate) weapon_health: Option<i64>,
    pub(crate) nav_health: Option<i64>,
    pub(crate) particle_cannon: Option<String>,
    pub(crate) beam_cannon: Option<String>,
    pub(crate) ship_type: Option<String>,
    pub(crate) engine_class: Option<i64>,
    pub(crate) shield_class: Option<i64>,
    pub(crate) cargo_capacity: Option<i64>,
    pub(crate) wing_class: Option<i64>,
    pub(crate) crew_limit: Option<i64>,
    pub(crate) equipment_limit: Option<i64>,
    pub(crate) countermeasure_limit: Option<i64>,
    pub(crate) hardpoint_limit: Option<i64>,
    pub(crate) armor_limit: Option<i64>,
    pub(crate) particle_cannon_range: Option<i64>,
    pub(crate) missile_range: Option<i64>,
    pub(crate) targeted_subsystem: Option<String>,
    pub(crate) countermeasures: Option<i64>,
    pub(crate) ids_multiplier: Option<i64>,
    pub(crate) velocity: Option<i64>,
    pub(crate) set_velocity: Option<i64>,
    pub(crate) altitude: Option<i64>,
    pub(crate) heat_signature_level: Option<i64>,
    pub(crate) total_velocity: Option<i64>,
    pub(crate) heading: Option<i64>,
    pub(crate) pitch: Option<i64>,

    // Vectors
    pub(crate) position: Option<Position>,
    pub(crate) sector_position: Option<Position>,

    pub(crate) shields: ShieldStatus,

    // Slot arrays
    pub(crate) cargo_bay: Option<SlotArray>,
    pub(crate) secondary_weapons: Option<SlotArray>,
    pub(crate) equipment: Option<SlotArray>,

    // Enumerated states
    pub(crate) heat: Option<HeatState>,
    pub(crate) mtds: Option<MtdsState>,
    pub(crate) missile_lock: Option<MissileState>,
    pub(crate) ids: Option<OnOffState>,
    pub(crate) afterburner: Option<OnOffState>,
    pub(crate) autopilot: Option<AutopilotState>,
    pub(crate) tractor_beam: Option<OnOffState>,

    // Energy bias, -5..=+5 each
    pub(crate) shield_bias: Option<i32>,
    pub(crate) weapon_bias: Option<i32>,
}

impl ShipState {
    /// All-absent placeholder published before the first refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation this snapshot was built under.
    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn fuel_remaining(&self) -> Option<i64> {
        self.fuel_remaining
    }

    pub fn fuel_total(&self) -> Option<i64> {
        self.fuel_total
    }

    /// Remaining fuel as a fraction of capacity (0.0-1.0).
    pub fn fuel_percentage(&self) -> Option<f64> {
        self.fuel_percentage
    }

    /// 0-100.
    pub fn energy_level(&self) -> Option<i64> {
        self.energy_level
    }

    /// Shield level as reported by the game, 0-100. Doubles as hull integrity.
    pub fn shield_level(&self) -> Option<i64> {
        self.shield_level
    }

    pub fn hull_integrity(&self) -> Option<i64> {
        self.shield_level
    }

    pub fn engine_health(&self) -> Option<i64> {
        self.engine_health
    }

    pub fn weapon_health(&self) -> Option<i64> {
        self.weapon_health
    }

    pub fn nav_health(&self) -> Option<i64> {
        self.nav_health
    }

    pub fn particle_cannon(&self) -> Option<&str> {
        self.particle_cannon.as_deref()
    }

    pub fn beam_cannon(&self) -> Option<&str> {
        self.beam_cannon.as_deref()
    }

    pub fn ship_type(&self) -> Option<&str> {
        self.ship_type.as_deref()
    }

    pub fn engine_class(&self) -> Option<i64> {
        self.engine_class
    }

    pub fn shield_class(&self) -> Option<i64> {
        self.shield_class
    }

    pub fn cargo_capacity(&self) -> Option<i64> {
        self.cargo_capacity
    }

    pub fn wing_class(&self) -> Option<i64> {
        self.wing_class
    }

    /// Wings and thrusters share one class.
    pub fn thruster_class(&self) -> Option<i64> {
        self.wing_class
    }

    pub fn crew_limit(&self) -> Option<i64> {
        self.crew_limit
    }

    pub fn equipment_limit(&self) -> Option<i64> {
        self.equipment_limit
    }

    pub fn countermeasure_limit(&self) -> Option<i64> {
        self.countermeasure_limit
    }

    pub fn hardpoint_limit(&self) -> Option<i64> {
        self.hardpoint_limit
    }

    pub fn armor_limit(&self) -> Option<i64> {
        self.armor_limit
    }

    pub fn particle_cannon_range(&self) -> Option<i64> {
        self.particle_cannon_range
    }

    pub fn missile_range(&self) -> Option<i64> {
        self.missile_range
    }

    pub fn targeted_subsystem(&self) -> Option<&str> {
        self.targeted_subsystem.as_deref()
    }

    pub fn countermeasures(&self) -> Option<i64> {
        self.countermeasures
    }

    pub fn ids_multiplier(&self) -> Option<i64> {
        self.ids_multiplier
    }

    pub fn velocity(&self) -> Option<i64> {
        self.velocity
    }

    pub fn set_velocity(&self) -> Option<i64> {
        self.set_velocity
    }

    pub fn altitude(&self) -> Option<i64> {
        self.altitude
    }

    pub fn heat_signature_level(&self) -> Option<i64> {
        self.heat_signature_level
    }

    pub fn total_velocity(&self) -> Option<i64> {
        self.total_velocity
    }

    pub fn heading(&self) -> Option<i64> {
        self.heading
    }

    pub fn pitch(&self) -> Option<i64> {
        self.pitch
    }

    /// In-sector position.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn sector_position(&self) -> Option<Position> {
        self.sector_position
    }

    pub fn shields(&self) -> &ShieldStatus {
        &self.shields
    }

    pub fn shield(&self, quadrant: ShieldQuadrant) -> Option<u8> {
        self.shields.get(quadrant)
    }

    pub fn cargo_bay(&self) -> Option<&SlotArray> {
        self.cargo_bay.as_ref()
    }

    pub fn secondary_weapons(&self) -> Option<&SlotArray> {
        self.secondary_weapons.as_ref()
    }

    pub fn equipment(&self) -> Option<&SlotArray> {
        self.equipment.as_ref()
    }

    pub fn heat(&self) -> Option<HeatState> {
        self.heat
    }

    pub fn mtds(&self) -> Option<MtdsState> {
        self.mtds
    }

    pub fn missile_lock(&self) -> Option<MissileState> {
        self.missile_lock
    }

    pub fn ids(&self) -> Option<OnOffState> {
        self.ids
    }

    pub fn afterburner(&self) -> Option<OnOffState> {
        self.afterburner
    }

    pub fn autopilot(&self) -> Option<AutopilotState> {
        self.autopilot
    }

    pub fn tractor_beam(&self) -> Option<OnOffState> {
        self.tractor_beam
    }

    pub fn shield_bias(&self) -> Option<i32> {
        self.shield_bias
    }

    pub fn weapon_bias(&self) -> Option<i32> {
        self.weapon_bias
    }
}
