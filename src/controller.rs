use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::bridge::client::BridgeError;
use crate::bridge::client::LightingBridge;
use crate::bridge::command::LightCommand;
use crate::config::Config;
use crate::config::RunningConfig;
use crate::snapshot::SnapshotStore;
use crate::watch;

/// Edge-triggered presence controller.
///
/// Polls for the watched process once per interval and fires at most one
/// lighting change per observed transition. The active flag and the
/// snapshot store are the only mutable state, and both are owned here
/// exclusively; no re-application or retry happens while steady-state.
pub struct Controller<B> {
    bridge: B,
    process_name: String,
    poll_interval: Duration,
    targets: Vec<String>,
    transition_time: u16,
    revert_on_stop: bool,
    running: RunningConfig,
    active: bool,
    snapshots: SnapshotStore,
}

impl<B: LightingBridge> Controller<B> {
    pub fn new(config: &Config, bridge: B) -> Self {
        Self {
            bridge,
            process_name: config.process.name.clone(),
            poll_interval: Duration::from_secs(config.process.poll_interval),
            targets: config.lights.targets.clone(),
            transition_time: config.lights.transition_time,
            revert_on_stop: config.lights.revert_on_stop,
            running: config.running.clone(),
            active: false,
            snapshots: SnapshotStore::new(),
        }
    }

    /// Whether the controller currently considers the process present
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Poll forever: presence check, side effects on an edge, then sleep.
    /// A new cycle never starts before the previous one's side effects
    /// have completed or failed.
    pub async fn run(&mut self) {
        info!(
            "Watching for process \"{}\" every {}s",
            self.process_name,
            self.poll_interval.as_secs()
        );

        loop {
            let present = watch::process_present(&self.process_name);
            self.observe(present).await;
            debug!(
                "Process present: {}, lighting active: {}",
                present, self.active
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Feed one presence observation into the state machine.
    ///
    /// Only transitions produce side effects, and the flag always advances
    /// even when the bridge calls fail; the next genuine edge is the only
    /// retry opportunity.
    pub async fn observe(&mut self, present: bool) {
        if present && !self.active {
            info!(
                "Process \"{}\" appeared, applying running lighting",
                self.process_name
            );
            if let Err(e) = self.activate().await {
                error!("Failed to apply running lighting: {}", e);
            }
            self.active = true;
        } else if !present && self.active {
            info!("Process \"{}\" disappeared", self.process_name);
            if self.revert_on_stop {
                if let Err(e) = self.deactivate().await {
                    error!("Failed to revert lighting: {}", e);
                }
            }
            self.active = false;
            self.snapshots.clear();
        }
    }

    /// Rising edge: snapshot the targets, then push the running update
    async fn activate(&mut self) -> Result<(), BridgeError> {
        let registry = self.bridge.fetch_objects().await?;
        self.snapshots.capture(&registry, &self.targets);

        let command = LightCommand::for_running(&self.running, self.transition_time);
        self.bridge.apply_command(&command, &self.targets).await
    }

    /// Falling edge: restore every target that has a snapshot
    async fn deactivate(&mut self) -> Result<(), BridgeError> {
        let commands: HashMap<String, LightCommand> = self
            .snapshots
            .iter()
            .map(|(id, state)| {
                (
                    id.clone(),
                    LightCommand::for_revert(state, self.transition_time),
                )
            })
            .collect();

        self.bridge.apply_revert(&self.targets, &commands).await
    }
}
