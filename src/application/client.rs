use crate::application::control_surface::ControlSurface;
use crate::application::session::{Command, Outcome};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// Bridges the UI thread and the background runtime.
/// Commands are spawned onto the runtime and their outcomes come back through a
/// channel the UI drains once per frame.
pub struct DashboardClient {
    runtime: Handle,
    surface: Arc<ControlSurface>,
    outcome_tx: Sender<Outcome>,
    outcome_rx: Receiver<Outcome>,
    log_rx: Receiver<String>,
}

impl DashboardClient {
    pub fn new(runtime: Handle, surface: Arc<ControlSurface>, log_rx: Receiver<String>) -> Self {
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();
        Self {
            runtime,
            surface,
            outcome_tx,
            outcome_rx,
            log_rx,
        }
    }

    pub fn submit(&self, command: Command) {
        debug!("Submitting {:?}", command);
        let surface = self.surface.clone();
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let outcome = surface.execute(command).await;
            let _ = tx.send(outcome);
        });
    }

    /// Next finished command, if any. Non-blocking.
    pub fn poll_outcome(&self) -> Option<Outcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Drains pending log lines.
    pub fn drain_logs(&self) -> Vec<String> {
        self.log_rx.try_iter().collect()
    }
}
