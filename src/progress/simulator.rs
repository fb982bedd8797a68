use super::meter::{ProgressMeter, ProgressMode, ProgressSnapshot};
use crate::config::ProgressConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Timer-driven wrapper around [`ProgressMeter`].
///
/// Owns its tick and settle tasks. Both are aborted on `complete`, `cancel`,
/// a restart, and drop, so no periodic task outlives the simulator.
pub struct ProgressSimulator {
    meter: Arc<Mutex<ProgressMeter>>,
    tx: Arc<watch::Sender<ProgressSnapshot>>,
    tick: Duration,
    settle: Duration,
    rng: StdRng,
    ticker: Option<JoinHandle<()>>,
    settler: Option<JoinHandle<()>>,
}

impl ProgressSimulator {
    pub fn new(config: &ProgressConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn with_rng(config: &ProgressConfig, rng: StdRng) -> Self {
        let (tx, _rx) = watch::channel(ProgressSnapshot::default());
        Self {
            meter: Arc::new(Mutex::new(ProgressMeter::new(config.ceiling))),
            tx: Arc::new(tx),
            tick: Duration::from_millis(config.tick_ms.max(1)),
            settle: Duration::from_millis(config.settle_ms),
            rng,
            ticker: None,
            settler: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        lock(&self.meter).snapshot()
    }

    /// Reset to 0 and begin ticking. Must be called within a tokio runtime.
    pub fn start(&mut self, mode: ProgressMode) {
        self.stop_tasks();
        publish(&self.meter, &self.tx, |meter| meter.start(mode));

        let meter = Arc::clone(&self.meter);
        let tx = Arc::clone(&self.tx);
        let period = self.tick;
        let mut rng = StdRng::from_rng(&mut self.rng);

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                publish(&meter, &tx, |m| {
                    m.tick(&mut rng);
                });
            }
        }));
    }

    /// Jump to 100, then return to idle after the settle delay.
    pub fn complete(&mut self) {
        self.stop_tasks();
        publish(&self.meter, &self.tx, ProgressMeter::complete);

        let meter = Arc::clone(&self.meter);
        let tx = Arc::clone(&self.tx);
        let settle = self.settle;
        self.settler = Some(tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            publish(&meter, &tx, ProgressMeter::settle);
        }));
    }

    /// Stop ticking where the value currently is.
    pub fn cancel(&mut self) {
        self.stop_tasks();
        publish(&self.meter, &self.tx, ProgressMeter::cancel);
    }

    fn stop_tasks(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        if let Some(handle) = self.settler.take() {
            handle.abort();
        }
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.stop_tasks();
    }
}

fn lock(meter: &Mutex<ProgressMeter>) -> std::sync::MutexGuard<'_, ProgressMeter> {
    meter.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish(
    meter: &Mutex<ProgressMeter>,
    tx: &watch::Sender<ProgressSnapshot>,
    update: impl FnOnce(&mut ProgressMeter),
) {
    let snapshot = {
        let mut guard = lock(meter);
        update(&mut guard);
        guard.snapshot()
    };
    tx.send_replace(snapshot);
}
