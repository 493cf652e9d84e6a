//! Interactive first-run setup.
//!
//! Walks through the same questions the daemon needs answered in its config
//! file, shows the objects the bridge knows about so targets can be picked
//! by id, and writes the result as TOML. Invalid answers are re-asked.

use std::io;
use std::io::BufRead;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::bridge::client::BridgeClient;
use crate::bridge::client::LightingBridge;
use crate::bridge::object::ObjectKind;
use crate::config::ranges;
use crate::config::BridgeConfig;
use crate::config::Config;
use crate::config::LightsConfig;
use crate::config::LoggingConfig;
use crate::config::Modification;
use crate::config::PowerIntent;
use crate::config::ProcessConfig;
use crate::config::RunningConfig;

/// Prompt for a full configuration, list the bridge's objects, and write
/// the config file to `path`.
pub async fn run(path: &Path) -> anyhow::Result<()> {
    let bridge = BridgeConfig {
        address: ask("What is the bridge IP or hostname?")?,
        username: ask("What is your bridge API username?")?,
    };

    let process = ProcessConfig {
        name: ask("Which process name should trigger the lights?")?,
        poll_interval: ask_int("How often (in seconds) should the process be checked?", 1, 600)?
            as u64,
    };

    let running = RunningConfig {
        on: ask_power_intent("Should the lights be switched while the process runs?")?,
        brightness: ask_modification(
            "brightness",
            &ranges::BRIGHTNESS_SET,
            &ranges::BRIGHTNESS_MODIFY,
        )?,
        saturation: ask_modification(
            "saturation",
            &ranges::SATURATION_SET,
            &ranges::SATURATION_MODIFY,
        )?,
        hue: ask_modification("hue", &ranges::HUE_SET, &ranges::HUE_MODIFY)?,
    };

    let transition_time = ask_int(
        "How long should changes take to transition? (1 = 100ms, 0 = bridge default)",
        0,
        i64::from(u16::MAX),
    )? as u16;

    let revert_on_stop = ask_bool("Should the lights be restored when the process stops?")?;

    let kind = if ask_bool("Control a group instead of individual lights?")? {
        ObjectKind::Group
    } else {
        ObjectKind::Light
    };

    let client = BridgeClient::new(&bridge, kind)?;
    let registry = client.fetch_objects().await?;

    let mut listing: Vec<String> = registry
        .iter()
        .map(|(id, object)| format!("{}({})", id, object.name))
        .collect();
    listing.sort();
    println!("Available {}s: {}", kind, listing.join(", "));

    let targets = ask("Which ids should be affected? (comma to separate)")?
        .split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    let config = Config {
        bridge,
        process,
        lights: LightsConfig {
            kind,
            targets,
            transition_time,
            revert_on_stop,
        },
        running,
        logging: LoggingConfig::default(),
    };
    config.validate()?;

    let text = toml::to_string_pretty(&config)?;
    std::fs::write(path, text)?;
    println!("Wrote configuration to {}", path.display());

    Ok(())
}

fn ask(question: &str) -> io::Result<String> {
    loop {
        print!("{} ", question);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

fn ask_int(question: &str, min: i64, max: i64) -> io::Result<i64> {
    loop {
        let answer = ask(&format!("{} [min {}, max {}]", question, min, max))?;
        match answer.parse::<i64>() {
            Ok(value) if (min..=max).contains(&value) => return Ok(value),
            Ok(_) => println!("Number must be between {} and {} inclusive", min, max),
            Err(_) => println!("Not a valid integer!"),
        }
    }
}

fn ask_bool(question: &str) -> io::Result<bool> {
    loop {
        let answer = ask(&format!("{} [y = yes, n = no]", question))?.to_lowercase();
        match answer.chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Not a valid answer!"),
        }
    }
}

fn ask_power_intent(question: &str) -> io::Result<PowerIntent> {
    loop {
        let answer =
            ask(&format!("{} [n = none, i = inactive, a = active]", question))?.to_lowercase();
        match answer.chars().next() {
            Some('n') => return Ok(PowerIntent::None),
            Some('i') => return Ok(PowerIntent::Inactive),
            Some('a') => return Ok(PowerIntent::Active),
            _ => println!("Not a valid answer!"),
        }
    }
}

fn ask_modification(
    attribute: &str,
    set: &RangeInclusive<i64>,
    modify: &RangeInclusive<i64>,
) -> io::Result<Modification> {
    loop {
        let answer = ask(&format!(
            "How should {} change while the process runs? [n = none, s = set, m = modify]",
            attribute
        ))?
        .to_lowercase();

        match answer.chars().next() {
            Some('n') => return Ok(Modification::None),
            Some('s') => {
                let value = ask_int(
                    &format!("To what should {} be set?", attribute),
                    *set.start(),
                    *set.end(),
                )?;
                return Ok(Modification::Set(value));
            }
            Some('m') => {
                let delta = ask_int(
                    &format!("By how much should {} change?", attribute),
                    *modify.start(),
                    *modify.end(),
                )?;
                return Ok(Modification::Modify(delta));
            }
            _ => println!("Not a valid answer!"),
        }
    }
}
