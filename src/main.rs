use anyhow::{Context, Result};
use shipstate::{EngineConfig, GameVersion, NormalizationEngine, Poller, RawTable, SharedVersion, ShieldQuadrant};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const CONFIG_ENV: &str = "SHIPSTATE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    // 2. Config + engine
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => EngineConfig::load(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => EngineConfig::default(),
    };

    let table = RawTable::new();
    let version = SharedVersion::new(GameVersion::EvochronLegacy);
    seed(&table);

    let engine = NormalizationEngine::from_config(&config, table.clone(), version.clone())?;
    let handle = Poller::new(engine, Duration::from_millis(config.poll_interval_ms)).spawn();
    let reader = handle.reader();

    tracing::info!("Demo feed running. Press Ctrl+C to stop.");

    // 3. Scripted feed + printer. Acquisition is external in real hosts.
    let mut cadence = tokio::time::interval(Duration::from_secs(1));
    let mut step: i64 = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = cadence.tick() => {
                step += 1;
                let remaining = (300 - step * 7).max(0);
                table.insert("FUEL", format!("{}/300", remaining));
                table.insert("FRONT SHIELD LEVEL", (100 - step * 3).max(0));
                table.insert("ENERGY BIAS SETTING", format!("{:+}S/{:+}W", step % 6, -(step % 6)));
                if step == 10 {
                    tracing::info!("Switching feed to Evochron Mercenary");
                    version.set(GameVersion::EvochronMercenary);
                }

                let snap = reader.load();
                println!(
                    "[{:?}] fuel {:?}/{:?} ({:?}) shields F{:?} T{:?} bias {:?}S/{:?}W cargo {:?}",
                    snap.version(),
                    snap.fuel_remaining(),
                    snap.fuel_total(),
                    snap.fuel_percentage(),
                    snap.shield(ShieldQuadrant::Front),
                    snap.shield(ShieldQuadrant::Total),
                    snap.shield_bias(),
                    snap.weapon_bias(),
                    snap.cargo_bay().map(|bay| bay.occupied().count()),
                );
            }
        }
    }

    let engine = handle.shutdown().await?;
    let stats = engine.telemetry_snapshot();
    tracing::info!(
        refreshes = engine.tick().0,
        decode_events = stats.decode.total(),
        version_changes = stats.version_changes,
        "Shutdown complete"
    );
    Ok(())
}

fn seed(table: &RawTable) {
    table.insert("FUEL", "300/300");
    table.insert("ENERGY LEVEL", 100);
    table.insert("SHIELD LEVEL", 100);
    table.insert("SHIP TYPE", "Sentinel");
    table.insert("ARMOR LIMIT", 4);
    for (key, level) in [
        ("FRONT SHIELD LEVEL", 100),
        ("RIGHT SHIELD LEVEL", 90),
        ("LEFT SHIELD LEVEL", 90),
        ("REAR SHIELD LEVEL", 80),
    ] {
        table.insert(key, level);
    }
    for (i, cargo) in ["Gold", "Water", "Platinum", "Food", "Medical", "Iron", "Titanium"]
        .iter()
        .enumerate()
    {
        table.insert(format!("CARGO BAY {}", i + 1), *cargo);
    }
    table.insert("ENERGY BIAS SETTING", "+0S/+0W");
    table.insert("MDTS STATUS", 1);
    table.insert("AUTOPILOT STATUS", 0);
}
