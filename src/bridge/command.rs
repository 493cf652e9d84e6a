use std::ops::RangeInclusive;

use serde::Serialize;

use crate::bridge::object::LightingState;
use crate::config::ranges;
use crate::config::Modification;
use crate::config::PowerIntent;
use crate::config::RunningConfig;

/// A single state update for a light or group.
///
/// Only present fields are serialized, so a default command is the empty
/// update `{}` and leaves the object untouched. Construction keeps two
/// invariants: an attribute never carries both its absolute and its relative
/// form, and every present value is clamped into the range the bridge
/// accepts. Clamping here is deliberate even though the configuration is
/// validated on load; the builder does not trust its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LightCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    on: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    bri: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hue: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sat: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    bri_inc: Option<i16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sat_inc: Option<i16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hue_inc: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    transitiontime: Option<u16>,
}

fn clamp_to(value: i64, range: &RangeInclusive<i64>) -> i64 {
    value.clamp(*range.start(), *range.end())
}

impl LightCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on(&mut self, on: bool) {
        self.on = Some(on);
    }

    /// Absolute brightness, clamped to 1..=254
    pub fn set_brightness(&mut self, value: i64) {
        self.bri = Some(clamp_to(value, &ranges::BRIGHTNESS_SET) as u8);
    }

    /// Absolute hue, clamped to 0..=65535
    pub fn set_hue(&mut self, value: i64) {
        self.hue = Some(clamp_to(value, &ranges::HUE_SET) as u16);
    }

    /// Absolute saturation, clamped to 0..=254
    pub fn set_saturation(&mut self, value: i64) {
        self.sat = Some(clamp_to(value, &ranges::SATURATION_SET) as u8);
    }

    /// Brightness delta, clamped to -254..=254
    pub fn modify_brightness(&mut self, delta: i64) {
        self.bri_inc = Some(clamp_to(delta, &ranges::BRIGHTNESS_MODIFY) as i16);
    }

    /// Saturation delta, clamped to -254..=254
    pub fn modify_saturation(&mut self, delta: i64) {
        self.sat_inc = Some(clamp_to(delta, &ranges::SATURATION_MODIFY) as i16);
    }

    /// Hue delta, clamped to -65534..=65534
    pub fn modify_hue(&mut self, delta: i64) {
        self.hue_inc = Some(clamp_to(delta, &ranges::HUE_MODIFY) as i32);
    }

    /// Transition time in ticks of 100ms. Zero means "use the bridge
    /// default" and leaves the field absent.
    pub fn set_transition_time(&mut self, ticks: u16) {
        if ticks > 0 {
            self.transitiontime = Some(ticks);
        }
    }

    /// Build the update applied while the watched process is running.
    ///
    /// Each attribute follows its configured intent independently; a `None`
    /// intent leaves the field absent entirely rather than sending an
    /// explicit no-change value.
    pub fn for_running(running: &RunningConfig, transition_time: u16) -> Self {
        let mut command = Self::new();

        match running.brightness {
            Modification::None => {}
            Modification::Set(value) => command.set_brightness(value),
            Modification::Modify(delta) => command.modify_brightness(delta),
        }

        match running.saturation {
            Modification::None => {}
            Modification::Set(value) => command.set_saturation(value),
            Modification::Modify(delta) => command.modify_saturation(delta),
        }

        match running.hue {
            Modification::None => {}
            Modification::Set(value) => command.set_hue(value),
            Modification::Modify(delta) => command.modify_hue(delta),
        }

        match running.on {
            PowerIntent::None => {}
            PowerIntent::Inactive => command.set_on(false),
            PowerIntent::Active => command.set_on(true),
        }

        command.set_transition_time(transition_time);
        command
    }

    /// Build the update that restores a captured state.
    ///
    /// Every field the snapshot has becomes an absolute set; fields the
    /// object never reported stay absent. This path is always absolute and
    /// ignores the running intents entirely.
    pub fn for_revert(snapshot: &LightingState, transition_time: u16) -> Self {
        let mut command = Self::new();

        if let Some(on) = snapshot.on {
            command.set_on(on);
        }
        if let Some(bri) = snapshot.bri {
            command.set_brightness(i64::from(bri));
        }
        if let Some(hue) = snapshot.hue {
            command.set_hue(i64::from(hue));
        }
        if let Some(sat) = snapshot.sat {
            command.set_saturation(i64::from(sat));
        }

        command.set_transition_time(transition_time);
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(command: &LightCommand) -> serde_json::Value {
        serde_json::to_value(command).unwrap()
    }

    #[test]
    fn test_default_command_is_empty_update() {
        assert_eq!(serde_json::to_string(&LightCommand::default()).unwrap(), "{}");
    }

    #[test]
    fn test_none_intents_build_empty_command() {
        let command = LightCommand::for_running(&RunningConfig::default(), 0);
        assert_eq!(command, LightCommand::default());
    }

    #[test]
    fn test_set_intents_become_absolute_fields() {
        let running = RunningConfig {
            on: PowerIntent::Active,
            brightness: Modification::Set(200),
            saturation: Modification::Set(30),
            hue: Modification::Set(40000),
        };

        let command = LightCommand::for_running(&running, 0);
        assert_eq!(
            wire(&command),
            serde_json::json!({"on": true, "bri": 200, "sat": 30, "hue": 40000})
        );
    }

    #[test]
    fn test_modify_intents_become_relative_fields() {
        let running = RunningConfig {
            on: PowerIntent::Inactive,
            brightness: Modification::Modify(-100),
            saturation: Modification::Modify(50),
            hue: Modification::Modify(-20000),
        };

        let command = LightCommand::for_running(&running, 0);
        assert_eq!(
            wire(&command),
            serde_json::json!({
                "on": false,
                "bri_inc": -100,
                "sat_inc": 50,
                "hue_inc": -20000
            })
        );
    }

    #[test]
    fn test_absolute_values_are_clamped() {
        let mut command = LightCommand::new();
        command.set_brightness(9999);
        command.set_saturation(300);
        command.set_hue(100_000);
        assert_eq!(
            wire(&command),
            serde_json::json!({"bri": 254, "sat": 254, "hue": 65535})
        );

        let mut command = LightCommand::new();
        command.set_brightness(0);
        assert_eq!(wire(&command), serde_json::json!({"bri": 1}));
    }

    #[test]
    fn test_relative_values_are_clamped() {
        let mut command = LightCommand::new();
        command.modify_brightness(-9999);
        command.modify_saturation(9999);
        command.modify_hue(70000);
        assert_eq!(
            wire(&command),
            serde_json::json!({"bri_inc": -254, "sat_inc": 254, "hue_inc": 65534})
        );
    }

    #[test]
    fn test_builder_reclamps_unvalidated_config() {
        let running = RunningConfig {
            on: PowerIntent::None,
            brightness: Modification::Set(9999),
            saturation: Modification::None,
            hue: Modification::Modify(-70000),
        };

        let command = LightCommand::for_running(&running, 0);
        assert_eq!(
            wire(&command),
            serde_json::json!({"bri": 254, "hue_inc": -65534})
        );
    }

    #[test]
    fn test_transition_time_zero_is_omitted() {
        let running = RunningConfig {
            on: PowerIntent::Active,
            ..RunningConfig::default()
        };

        let command = LightCommand::for_running(&running, 0);
        assert_eq!(wire(&command), serde_json::json!({"on": true}));

        let command = LightCommand::for_running(&running, 20);
        assert_eq!(
            wire(&command),
            serde_json::json!({"on": true, "transitiontime": 20})
        );
    }

    #[test]
    fn test_revert_round_trips_present_fields_only() {
        let snapshot = LightingState {
            on: Some(true),
            bri: Some(120),
            hue: None,
            sat: None,
        };

        let command = LightCommand::for_revert(&snapshot, 0);
        assert_eq!(wire(&command), serde_json::json!({"on": true, "bri": 120}));
    }

    #[test]
    fn test_revert_attaches_transition_time() {
        let snapshot = LightingState {
            on: Some(false),
            ..LightingState::default()
        };

        let command = LightCommand::for_revert(&snapshot, 5);
        assert_eq!(
            wire(&command),
            serde_json::json!({"on": false, "transitiontime": 5})
        );
    }

    #[test]
    fn test_revert_of_empty_snapshot_is_empty() {
        let command = LightCommand::for_revert(&LightingState::default(), 0);
        assert_eq!(command, LightCommand::default());
    }
}
