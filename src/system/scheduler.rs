use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::collector::Collector;
use super::snapshot::SystemSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sampling,
}

pub struct SchedulerHandle {
    pub snapshots: watch::Receiver<Arc<SystemSnapshot>>,
    pub state: watch::Receiver<SchedulerState>,
    pub task: JoinHandle<()>,
}

/// Drives the collector at a fixed cadence and publishes each pass as an
/// immutable snapshot. Passes never overlap: the next tick is only awaited
/// once the previous pass has been published.
pub struct Scheduler {
    collector: Collector,
    interval: Duration,
}

impl Scheduler {
    pub fn new(collector: Collector, interval: Duration) -> Self {
        Self {
            collector,
            interval,
        }
    }

    pub fn spawn(self) -> SchedulerHandle {
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(SystemSnapshot::default()));
        let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);
        let task = tokio::spawn(self.run(snapshot_tx, state_tx));
        SchedulerHandle {
            snapshots: snapshot_rx,
            state: state_rx,
            task,
        }
    }

    async fn run(
        self,
        snapshot_tx: watch::Sender<Arc<SystemSnapshot>>,
        state_tx: watch::Sender<SchedulerState>,
    ) {
        let collector = Arc::new(Mutex::new(self.collector));
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "sampling started"
        );

        loop {
            ticker.tick().await;
            if snapshot_tx.is_closed() {
                break;
            }

            state_tx.send_replace(SchedulerState::Sampling);
            // collection is blocking file I/O; keep it off the async executor
            let shared = Arc::clone(&collector);
            let pass = tokio::task::spawn_blocking(move || {
                shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .sample()
            })
            .await;
            state_tx.send_replace(SchedulerState::Idle);

            match pass {
                Ok(snapshot) => {
                    if snapshot_tx.send(Arc::new(snapshot)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "sampling pass aborted, retrying next tick");
                }
            }
        }

        tracing::info!("sampling stopped");
    }
}
