use shipstate::kernel::time::Tick;
use shipstate::{GameVersion, NormalizationEngine, Poller, RawTable, SchemaCatalog, SharedVersion};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

fn seeded_engine(table: &RawTable, version: SharedVersion) -> NormalizationEngine {
    table.insert("FUEL", "250/300");
    table.insert("ENERGY LEVEL", 75);
    NormalizationEngine::new(SchemaCatalog::standard().unwrap(), table.clone(), version)
}

async fn wait_for_tick(ticks: &mut watch::Receiver<Tick>, target: u64) -> Tick {
    timeout(Duration::from_secs(5), async {
        loop {
            let current = *ticks.borrow_and_update();
            if current.0 >= target {
                return current;
            }
            ticks.changed().await.expect("poller dropped its sender");
        }
    })
    .await
    .expect("poller did not reach the target tick in time")
}

#[tokio::test]
async fn test_poller_publishes_snapshots() {
    let table = RawTable::new();
    let engine = seeded_engine(&table, SharedVersion::new(GameVersion::EvochronLegacy));

    let handle = Poller::new(engine, Duration::from_millis(5)).spawn();
    let reader = handle.reader();
    let mut ticks = handle.ticks();

    wait_for_tick(&mut ticks, 1).await;
    assert_eq!(reader.load().fuel_remaining(), Some(250));

    // 2. A table change lands on a later refresh.
    let seen = *ticks.borrow();
    table.insert("FUEL", "100/300");
    wait_for_tick(&mut ticks, seen.0 + 2).await;
    assert_eq!(reader.load().fuel_remaining(), Some(100));

    let engine = handle.shutdown().await.expect("poller task panicked");
    assert!(engine.tick().0 >= 3, "engine ran at least three refreshes");
}

#[tokio::test]
async fn test_poller_picks_up_version_changes() {
    let table = RawTable::new();
    table.insert("ARMOR LIMIT", 4);
    let version = SharedVersion::new(GameVersion::EvochronLegacy);
    let engine = seeded_engine(&table, version.clone());

    let handle = Poller::new(engine, Duration::from_millis(5)).spawn();
    let reader = handle.reader();
    let mut ticks = handle.ticks();

    wait_for_tick(&mut ticks, 1).await;
    assert_eq!(reader.load().armor_limit(), Some(4));

    version.set(GameVersion::EvochronMercenary);
    let seen = *ticks.borrow();
    wait_for_tick(&mut ticks, seen.0 + 2).await;

    let snap = reader.load();
    assert_eq!(snap.version(), GameVersion::EvochronMercenary);
    assert_eq!(snap.armor_limit(), None);

    let engine = handle.shutdown().await.unwrap();
    assert_eq!(engine.telemetry_snapshot().version_changes, 1);
}

#[tokio::test]
async fn test_shutdown_stops_refreshing() {
    let table = RawTable::new();
    let engine = seeded_engine(&table, SharedVersion::new(GameVersion::EvochronMercenary));

    let poller = Poller::new(engine, Duration::from_millis(5));
    let reader = poller.reader();
    let token = poller.cancellation_token();
    let task = tokio::spawn(poller.run());

    tokio::time::sleep(Duration::from_millis(30)).await;
    token.cancel();
    let engine = timeout(Duration::from_secs(5), task)
        .await
        .expect("poller ignored cancellation")
        .unwrap();

    let stopped_at = engine.tick();
    assert!(stopped_at.0 >= 1);

    // The reader outlives the poller and keeps the last snapshot.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(engine.tick(), stopped_at);
    assert_eq!(reader.load().energy_level(), Some(75));
}
