use std::collections::HashMap;

use crate::bridge::object::LightingState;
use crate::bridge::object::Registry;

/// One generation of pre-activation lighting states, keyed by target id.
///
/// Captured immediately before the running update is applied, so the targets
/// can be restored when the watched process stops. A new capture replaces
/// the previous generation entirely.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    states: HashMap<String, LightingState>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state of every requested target found in the
    /// registry. Ids the bridge no longer knows are skipped silently.
    pub fn capture(&mut self, registry: &Registry, targets: &[String]) {
        self.states = targets
            .iter()
            .filter_map(|id| {
                registry
                    .get(id)
                    .map(|object| (id.clone(), object.state.clone()))
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn get(&self, id: &str) -> Option<&LightingState> {
        self.states.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LightingState)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
