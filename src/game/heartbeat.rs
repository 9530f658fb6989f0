use super::registry::PlayerRegistry;
use crate::protocol::{self, HeartbeatResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owner side of a running heartbeat task. Cancelling or dropping it stops
/// the task at its next suspension point.
#[derive(Debug)]
pub struct HeartbeatHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    pub fn cancel(self) -> JoinHandle<()> {
        let _ = self.cancel.send(true);
        self.task
    }
}

pub fn spawn_heartbeat(
    registry: Arc<PlayerRegistry>,
    outbound: mpsc::Sender<String>,
    interval: Duration,
) -> HeartbeatHandle {
    let (cancel, cancelled) = watch::channel(false);
    let task = tokio::spawn(run_heartbeat(registry, outbound, interval, cancelled));
    HeartbeatHandle { cancel, task }
}

async fn run_heartbeat(
    registry: Arc<PlayerRegistry>,
    outbound: mpsc::Sender<String>,
    interval: Duration,
    mut cancelled: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // A closed channel means the handle was dropped; treat it as cancel.
        tokio::select! {
            _ = cancelled.changed() => break,
            _ = ticker.tick() => {}
        }

        let players = registry.snapshot_all();
        tracing::trace!(players = players.len(), "heartbeat tick");
        let payload = protocol::encode(protocol::TYPE_HEARTBEAT, &HeartbeatResponse { players });

        tokio::select! {
            _ = cancelled.changed() => break,
            sent = outbound.send(payload) => {
                if sent.is_err() {
                    tracing::debug!("heartbeat push failed, connection gone");
                    break;
                }
            }
        }
    }
}
