use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Current lighting state reported by the bridge for one object.
///
/// Every field is optional: the bridge omits attributes an object does not
/// support, and absence must be preserved as absence. It never means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LightingState {
    pub on: Option<bool>,
    pub bri: Option<u8>,
    pub hue: Option<u16>,
    pub sat: Option<u8>,
}

/// Which family of bridge objects is being controlled.
///
/// Lights and groups expose the same lighting attributes, but under different
/// paths: lights report state under `state` and take updates at
/// `lights/{id}/state`, groups use `action` and `groups/{id}/action`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Light,
    Group,
}

impl ObjectKind {
    /// Collection endpoint under the API base
    pub fn collection(self) -> &'static str {
        match self {
            ObjectKind::Light => "lights",
            ObjectKind::Group => "groups",
        }
    }

    /// Sub-path for updates to a single object
    pub fn update_path(self) -> &'static str {
        match self {
            ObjectKind::Light => "state",
            ObjectKind::Group => "action",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Light => write!(f, "light"),
            ObjectKind::Group => write!(f, "group"),
        }
    }
}

/// A controllable object in the bridge's registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeObject {
    /// Display name assigned on the bridge
    pub name: String,

    pub kind: ObjectKind,

    /// State reported at fetch time
    pub state: LightingState,
}

/// Mapping from bridge-assigned id to object, rebuilt on every fetch
pub type Registry = HashMap<String, BridgeObject>;

/// Raw GET payload for a single object.
///
/// Lights carry their lighting attributes under `state`, groups under
/// `action`; the configured kind decides which one is read.
#[derive(Debug, Deserialize)]
pub(crate) struct RawObject {
    pub name: String,

    #[serde(default)]
    state: Option<LightingState>,

    #[serde(default)]
    action: Option<LightingState>,
}

impl RawObject {
    pub(crate) fn into_object(self, kind: ObjectKind) -> BridgeObject {
        let state = match kind {
            ObjectKind::Light => self.state,
            ObjectKind::Group => self.action,
        }
        .unwrap_or_default();

        BridgeObject {
            name: self.name,
            kind,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_light_payload() {
        let json = r#"{
            "name": "Desk lamp",
            "state": {"on": true, "bri": 120, "hue": 8000, "sat": 140, "reachable": true}
        }"#;

        let raw: RawObject = serde_json::from_str(json).unwrap();
        let object = raw.into_object(ObjectKind::Light);

        assert_eq!(object.name, "Desk lamp");
        assert_eq!(object.state.on, Some(true));
        assert_eq!(object.state.bri, Some(120));
        assert_eq!(object.state.hue, Some(8000));
        assert_eq!(object.state.sat, Some(140));
    }

    #[test]
    fn test_parse_group_payload() {
        let json = r#"{
            "name": "Office",
            "action": {"on": false, "bri": 254}
        }"#;

        let raw: RawObject = serde_json::from_str(json).unwrap();
        let object = raw.into_object(ObjectKind::Group);

        assert_eq!(object.state.on, Some(false));
        assert_eq!(object.state.bri, Some(254));
        assert_eq!(object.state.hue, None);
        assert_eq!(object.state.sat, None);
    }

    #[test]
    fn test_absent_attributes_stay_absent() {
        let json = r#"{"name": "Plug", "state": {"on": true}}"#;

        let raw: RawObject = serde_json::from_str(json).unwrap();
        let object = raw.into_object(ObjectKind::Light);

        assert_eq!(object.state.on, Some(true));
        assert_eq!(object.state.bri, None);
        assert_eq!(object.state.hue, None);
        assert_eq!(object.state.sat, None);
    }

    #[test]
    fn test_missing_state_object_defaults_to_unknown() {
        let json = r#"{"name": "Sensor"}"#;

        let raw: RawObject = serde_json::from_str(json).unwrap();
        let object = raw.into_object(ObjectKind::Light);

        assert_eq!(object.state, LightingState::default());
    }

    #[test]
    fn test_kind_paths() {
        assert_eq!(ObjectKind::Light.collection(), "lights");
        assert_eq!(ObjectKind::Light.update_path(), "state");
        assert_eq!(ObjectKind::Group.collection(), "groups");
        assert_eq!(ObjectKind::Group.update_path(), "action");
    }
}
