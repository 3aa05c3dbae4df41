use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{DEFAULT_ANGLE_MILLIDEGREES, NEUTRAL_SCALE_THOUSANDTHS};

/// The four integer settings the layer reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    /// Baseline upward half-angle, thousandths of a degree.
    AngleUp,
    /// Baseline downward half-angle magnitude, thousandths of a degree.
    AngleDown,
    /// Upward scale, thousandths of a unit.
    FovUp,
    /// Downward scale, thousandths of a unit.
    FovDown,
}

impl Setting {
    pub const ALL: [Setting; 4] = [
        Setting::AngleUp,
        Setting::AngleDown,
        Setting::FovUp,
        Setting::FovDown,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Setting::AngleUp => "angle_up",
            Setting::AngleDown => "angle_down",
            Setting::FovUp => "fov_up",
            Setting::FovDown => "fov_down",
        }
    }

    /// Value the layer assumes when the setting is absent.
    pub fn default_value(self) -> i64 {
        match self {
            Setting::AngleUp | Setting::AngleDown => DEFAULT_ANGLE_MILLIDEGREES,
            Setting::FovUp | Setting::FovDown => NEUTRAL_SCALE_THOUSANDTHS,
        }
    }

    pub fn is_angle(self) -> bool {
        matches!(self, Setting::AngleUp | Setting::AngleDown)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Setting {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Setting::ALL
            .into_iter()
            .find(|setting| setting.key() == s)
            .ok_or_else(|| SettingsError::UnknownSetting(s.to_string()))
    }
}

#[derive(Debug)]
pub enum SettingsError {
    UnknownSetting(String),
    Unavailable(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownSetting(name) => write!(f, "unknown setting: {name}"),
            SettingsError::Unavailable(msg) => write!(f, "settings store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Named-integer key/value access to the per-user settings namespace.
///
/// `get` answers `None` for anything it cannot read; callers apply
/// [`Setting::default_value`]. `set` overwrites unconditionally.
pub trait SettingsStore {
    fn get(&self, setting: Setting) -> Option<i64>;

    fn set(&mut self, setting: Setting, value: i64) -> Result<(), SettingsError>;

    fn get_or_default(&self, setting: Setting) -> i64 {
        self.get(setting).unwrap_or_else(|| setting.default_value())
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn get(&self, setting: Setting) -> Option<i64> {
        (**self).get(setting)
    }

    fn set(&mut self, setting: Setting, value: i64) -> Result<(), SettingsError> {
        (**self).set(setting, value)
    }
}

/// Process-local settings. Nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    values: HashMap<Setting, i64>,
    read_only: bool,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, setting: Setting, value: i64) -> Self {
        self.values.insert(setting, value);
        self
    }

    /// Every `set` fails, as with an unreachable or locked store.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, setting: Setting) -> Option<i64> {
        self.values.get(&setting).copied()
    }

    fn set(&mut self, setting: Setting, value: i64) -> Result<(), SettingsError> {
        if self.read_only {
            return Err(SettingsError::Unavailable(format!(
                "store is read-only, cannot write {setting}"
            )));
        }
        self.values.insert(setting, value);
        Ok(())
    }
}
