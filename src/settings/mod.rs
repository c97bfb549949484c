//! Host settings and their mapping onto render state.
//!
//! The host persists every option as an integer under a fixed key. Each key
//! maps onto one field of [`RenderSettings`] with its own validation:
//! - `bar_height`: table lookup, unknown values pick the smallest entry
//! - `speed`: 0 to 4 inclusive, anything else is ignored
//! - `mode`: triangles, lines or points (points also read `pointsize`)
//! - `rotation_angle`: negative spins freely, otherwise pins the Y angle
//! - `bar_color_type`: non-negative scheme index
//! - `rotation_speed`: table lookup from -4 to 4

mod store;

pub use store::{JsonSettingsStore, PersistedSettings, SettingsError};

use crate::scene::{BarColorScheme, PrimitiveMode};
use std::fmt;

pub const KEY_BAR_HEIGHT: &str = "bar_height";
pub const KEY_SPEED: &str = "speed";
pub const KEY_MODE: &str = "mode";
pub const KEY_POINT_SIZE: &str = "pointsize";
pub const KEY_ROTATION_ANGLE: &str = "rotation_angle";
pub const KEY_BAR_COLOR_TYPE: &str = "bar_color_type";
pub const KEY_ROTATION_SPEED: &str = "rotation_speed";

/// Largest accepted update lag.
pub const MAX_UPDATE_LAG: u32 = 4;

/// Height scale factors before division by `ln(256)`.
const HEIGHT_FACTORS: [(i32, f32); 5] = [(0, 0.5), (1, 1.0), (2, 2.0), (3, 3.0), (4, 0.33)];

/// Y rotation speed in degrees per frame.
const ROTATION_SPEEDS: [(i32, f32); 9] = [
    (4, 10.0),
    (3, 6.0),
    (2, 3.0),
    (1, 1.5),
    (0, 0.5),
    (-1, 0.25),
    (-2, 0.0625),
    (-3, 0.03125),
    (-4, 0.015625),
];

/// Height scale for a `bar_height` value.
pub fn height_scale(value: i32) -> f32 {
    let factor = HEIGHT_FACTORS
        .iter()
        .find(|(key, _)| *key == value)
        .map_or(HEIGHT_FACTORS[0].1, |(_, f)| *f);
    factor / 256f32.ln()
}

/// Y rotation speed for a `rotation_speed` value.
pub fn rotation_speed(value: i32) -> f32 {
    ROTATION_SPEEDS
        .iter()
        .find(|(key, _)| *key == value)
        .map_or(0.5, |(_, s)| *s)
}

/// Outcome of a setting-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingStatus {
    Ok,
    Unknown,
}

/// A setting value as the host delivers it: text that may hold an integer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingValue(String);

impl SettingValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_int(&self) -> Option<i32> {
        self.0.trim().parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render options derived from host settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Stored for the host; bar geometry uses raw heights.
    pub height_scale: f32,
    pub rotation_speed_y: f32,
    pub rotation_angle_fixed: Option<f32>,
    pub primitive_mode: PrimitiveMode,
    pub point_size: f32,
    /// Audio buffers the host holds back before delivering them.
    pub update_lag: u32,
    pub bar_color_scheme: BarColorScheme,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            height_scale: 1.0 / 256f32.ln(),
            rotation_speed_y: 1.5,
            rotation_angle_fixed: None,
            primitive_mode: PrimitiveMode::Triangles,
            point_size: 0.0,
            update_lag: 0,
            bar_color_scheme: BarColorScheme::ComputedGradient,
        }
    }
}

impl RenderSettings {
    /// Built-in defaults overridden by whatever `lookup` holds.
    ///
    /// Keys missing from `lookup` keep their default.
    pub fn load(lookup: impl Fn(&str) -> Option<i32>) -> Self {
        let mut settings = Self::default();

        if let Some(v) = lookup(KEY_BAR_HEIGHT) {
            settings.set_bar_height(v);
        }
        if let Some(v) = lookup(KEY_SPEED) {
            settings.set_update_lag(v);
        }
        if let Some(v) = lookup(KEY_MODE) {
            settings.set_mode(v, || lookup(KEY_POINT_SIZE));
        }
        if let Some(v) = lookup(KEY_ROTATION_ANGLE) {
            settings.set_rotation_angle(v);
        }
        if let Some(v) = lookup(KEY_BAR_COLOR_TYPE) {
            settings.set_bar_color(v);
        }
        if let Some(v) = lookup(KEY_ROTATION_SPEED) {
            settings.set_rotation_speed(v);
        }

        settings
    }

    /// Apply one setting-change notification.
    ///
    /// `lookup` reads other persisted settings (only `pointsize` is consulted).
    /// Unknown keys, empty names or values, and non-integer values report
    /// [`SettingStatus::Unknown`] and leave the settings untouched.
    pub fn apply(
        &mut self,
        name: &str,
        value: &SettingValue,
        lookup: impl Fn(&str) -> Option<i32>,
    ) -> SettingStatus {
        if name.is_empty() || value.is_empty() {
            return SettingStatus::Unknown;
        }

        let Some(v) = value.as_int() else {
            return SettingStatus::Unknown;
        };

        match name {
            KEY_BAR_HEIGHT => self.set_bar_height(v),
            KEY_SPEED => self.set_update_lag(v),
            KEY_MODE => self.set_mode(v, || lookup(KEY_POINT_SIZE)),
            KEY_ROTATION_ANGLE => self.set_rotation_angle(v),
            KEY_BAR_COLOR_TYPE => self.set_bar_color(v),
            KEY_ROTATION_SPEED => self.set_rotation_speed(v),
            _ => return SettingStatus::Unknown,
        }

        log::debug!("Setting {} = {}", name, v);
        SettingStatus::Ok
    }

    pub fn set_bar_height(&mut self, value: i32) {
        self.height_scale = height_scale(value);
    }

    /// Accepts 0 to [`MAX_UPDATE_LAG`]; other values are ignored.
    pub fn set_update_lag(&mut self, value: i32) {
        if let Ok(lag) = u32::try_from(value) {
            if lag <= MAX_UPDATE_LAG {
                self.update_lag = lag;
            }
        }
    }

    /// Points take their size from `point_size`; other modes reset it to zero.
    pub fn set_mode(&mut self, value: i32, point_size: impl FnOnce() -> Option<i32>) {
        self.primitive_mode = PrimitiveMode::from_setting(value);
        self.point_size = match self.primitive_mode {
            PrimitiveMode::Points => point_size().unwrap_or(0) as f32,
            PrimitiveMode::Triangles | PrimitiveMode::Lines => 0.0,
        };
    }

    pub fn set_rotation_angle(&mut self, value: i32) {
        self.rotation_angle_fixed = (value >= 0).then_some(value as f32);
    }

    /// Negative values are ignored.
    pub fn set_bar_color(&mut self, value: i32) {
        if let Some(scheme) = BarColorScheme::from_setting(value) {
            self.bar_color_scheme = scheme;
        }
    }

    pub fn set_rotation_speed(&mut self, value: i32) {
        self.rotation_speed_y = rotation_speed(value);
    }
}
