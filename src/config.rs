//! Layered configuration.
//!
//! Layers, later overriding earlier:
//! programmed defaults < user config < project config < explicit overrides.
//! Unreadable or malformed files never abort loading; they are reported as
//! [`SettingsEvent`]s and skipped.

pub mod settings;
pub mod user;

use std::path::Path;

pub use settings::{PROJECT_CONFIG_FILE, Settings, SettingsError, SettingsFile};
pub use user::{load_user_config, user_config_path};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsLoadOutcome {
    pub settings: Settings,
    pub events: Vec<SettingsEvent>,
}

pub fn load_settings(root_path: Option<&Path>, overrides: SettingsFile) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    // Layer 2: user config from XDG_CONFIG_HOME
    let user = load_user_config_with_events(&mut events).unwrap_or_default();

    // Layer 3: project config from root_path/rangekeeper.toml
    let project = load_project_settings(root_path, &mut events).unwrap_or_default();

    // Layer 1 (defaults) fills whatever the merged layers leave unset
    let merged = user.merge(project).merge(overrides);

    SettingsLoadOutcome {
        settings: Settings::from(merged),
        events,
    }
}

fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<SettingsFile> {
    match load_user_config() {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info("Loaded user config"));
            Some(settings)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {}",
                err
            )));
            None
        }
    }
}

fn load_project_settings(
    root_path: Option<&Path>,
    events: &mut Vec<SettingsEvent>,
) -> Option<SettingsFile> {
    let root = root_path?;
    let config_path = root.join(PROJECT_CONFIG_FILE);
    if !config_path.exists() {
        return None;
    }

    events.push(SettingsEvent::info(format!(
        "Found config file: {}",
        config_path.display()
    )));

    match SettingsFile::load(&config_path) {
        Ok(settings) => Some(settings),
        Err(err) => {
            events.push(SettingsEvent::warning(err.to_string()));
            None
        }
    }
}
