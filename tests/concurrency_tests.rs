use shipstate::{GameVersion, NormalizationEngine, RawTable, SchemaCatalog, ShieldQuadrant, ShipState};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

const GENERATIONS: i64 = 2_000;
const READERS: usize = 4;

/// Writes one self-consistent generation: every value derives from `g`.
fn write_generation(table: &RawTable, g: i64) {
    let level = g % 101;
    table.insert("ENERGY LEVEL", g);
    table.insert("FUEL", format!("{}/{}", g, GENERATIONS));
    for key in ["FRONT SHIELD LEVEL", "RIGHT SHIELD LEVEL", "LEFT SHIELD LEVEL", "REAR SHIELD LEVEL"] {
        table.insert(key, level);
    }
    table.insert("CARGO BAY 1", format!("gen-{}", g));
}

/// Every field in a snapshot must come from the same generation.
fn assert_consistent(snap: &ShipState) -> Option<i64> {
    let Some(g) = snap.energy_level() else {
        assert_eq!(snap.fuel_remaining(), None, "empty snapshot must be empty throughout");
        assert_eq!(snap.shield(ShieldQuadrant::Front), None);
        return None;
    };

    let level = Some((g % 101) as u8);
    assert_eq!(snap.fuel_remaining(), Some(g), "fuel torn from energy");
    for quadrant in ShieldQuadrant::ALL {
        assert_eq!(snap.shield(quadrant), level, "{:?} torn from energy", quadrant);
    }
    let cargo = snap.cargo_bay().expect("cargo present on Legacy");
    assert_eq!(cargo.get(0), Some(format!("gen-{}", g).as_str()));
    Some(g)
}

#[test]
fn test_readers_never_observe_torn_snapshots() {
    let table = RawTable::new();
    let mut engine = NormalizationEngine::new(SchemaCatalog::standard().unwrap(), table.clone(), GameVersion::EvochronLegacy);
    let reader = engine.reader();
    let done = AtomicBool::new(false);
    let loads = AtomicU64::new(0);

    thread::scope(|s| {
        for _ in 0..READERS {
            let reader = reader.clone();
            let done = &done;
            let loads = &loads;
            s.spawn(move || {
                let mut last_seen = -1;
                while !done.load(Ordering::Acquire) {
                    let snap = reader.load();
                    if let Some(g) = assert_consistent(&snap) {
                        assert!(g >= last_seen, "generation went backwards: {} after {}", g, last_seen);
                        last_seen = g;
                    }
                    loads.fetch_add(1, Ordering::Relaxed);
                }
            });
        }

        // Single writer: the table only changes between refreshes.
        for g in 0..GENERATIONS {
            write_generation(&table, g);
            engine.update();
        }
        done.store(true, Ordering::Release);
    });

    println!("{} snapshot loads across {} readers", loads.load(Ordering::Relaxed), READERS);
    assert_eq!(engine.tick().0, GENERATIONS as u64);
    assert_eq!(assert_consistent(&engine.snapshot()), Some(GENERATIONS - 1));
}

#[test]
fn test_engine_moves_to_another_thread() {
    let table = RawTable::new();
    write_generation(&table, 42);
    let mut engine = NormalizationEngine::new(SchemaCatalog::standard().unwrap(), table, GameVersion::EvochronLegacy);
    let reader = engine.reader();

    let handle = thread::spawn(move || {
        engine.update();
        engine
    });
    let engine = handle.join().unwrap();

    assert_eq!(engine.tick().0, 1);
    assert_eq!(assert_consistent(&reader.load()), Some(42));
}

/// Key type whose conversion blows up halfway through an insert.
struct ExplodingKey;

impl From<ExplodingKey> for String {
    fn from(_: ExplodingKey) -> Self {
        panic!("key conversion failed");
    }
}

#[test]
fn test_table_survives_panicking_writer() {
    let table = RawTable::new();
    table.insert("FUEL", "10/100");

    let writer = table.clone();
    let result = thread::spawn(move || writer.insert(ExplodingKey, 5)).join();
    assert!(result.is_err(), "writer thread should have panicked");

    // Later writes and reads still land.
    table.insert("ENERGY LEVEL", 50);
    assert_eq!(table.len(), 2);
    table.clear();
    assert!(table.is_empty());

    write_generation(&table, 7);
    let mut engine = NormalizationEngine::new(SchemaCatalog::standard().unwrap(), table, GameVersion::EvochronLegacy);
    engine.update();
    assert_eq!(assert_consistent(&engine.snapshot()), Some(7));
}
