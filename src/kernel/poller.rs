use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::engine::{NormalizationEngine, SnapshotReader};
use super::time::Tick;

/// Drives an engine at a fixed cadence. The poller is the engine's only
/// writer; readers go through [`SnapshotReader`].
pub struct Poller {
    engine: NormalizationEngine,
    period: Duration,
    cancel: CancellationToken,
    ticks: watch::Sender<Tick>,
}

impl Poller {
    pub fn new(engine: NormalizationEngine, period: Duration) -> Self {
        let (ticks, _) = watch::channel(engine.tick());
        Self {
            engine,
            period: period.max(Duration::from_millis(1)),
            cancel: CancellationToken::new(),
            ticks,
        }
    }

    pub fn reader(&self) -> SnapshotReader {
        self.engine.reader()
    }

    /// Receives the tick of every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.ticks.subscribe()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Refresh loop. Returns the engine once cancelled.
    pub async fn run(self) -> NormalizationEngine {
        let Poller {
            mut engine,
            period,
            cancel,
            ticks,
        } = self;

        info!(engine = %engine.id(), period_ms = period.as_millis() as u64, "poller started");

        let mut cadence = interval(period);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = cadence.tick() => {
                    let started = Instant::now();
                    let tick = engine.update();
                    let elapsed = started.elapsed();
                    if elapsed > period {
                        warn!(%tick, elapsed_ms = elapsed.as_millis() as u64, "refresh overran poll period");
                    }
                    ticks.send_replace(tick);
                }
            }
        }

        info!(engine = %engine.id(), tick = %engine.tick(), "poller stopped");
        engine
    }

    pub fn spawn(self) -> PollerHandle {
        let reader = self.reader();
        let ticks = self.subscribe();
        let cancel = self.cancellation_token();
        let join = tokio::spawn(self.run());
        PollerHandle {
            reader,
            ticks,
            cancel,
            join,
        }
    }
}

pub struct PollerHandle {
    reader: SnapshotReader,
    ticks: watch::Receiver<Tick>,
    cancel: CancellationToken,
    join: JoinHandle<NormalizationEngine>,
}

impl PollerHandle {
    pub fn reader(&self) -> SnapshotReader {
        self.reader.clone()
    }

    pub fn ticks(&self) -> watch::Receiver<Tick> {
        self.ticks.clone()
    }

    /// Stops the loop after the current refresh and hands the engine back.
    pub async fn shutdown(self) -> Result<NormalizationEngine, JoinError> {
        self.cancel.cancel();
        self.join.await
    }
}
