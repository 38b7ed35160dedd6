use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::filter::error::{FilterError, Result};

/// Identifies one of the beauty filter stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Bilateral,
    Exposure,
    Brightness,
    Saturation,
}

impl FilterKind {
    /// All kinds in slider order (top to bottom in the filter panel).
    pub const ALL: [FilterKind; 4] = [
        Self::Bilateral,
        Self::Exposure,
        Self::Brightness,
        Self::Saturation,
    ];

    /// Human-readable display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bilateral => "Skin Smoothing",
            Self::Exposure => "Exposure",
            Self::Brightness => "Brightness",
            Self::Saturation => "Saturation",
        }
    }

    /// Snake-case string identifier for UI events and the settings file.
    pub fn as_id_str(self) -> &'static str {
        match self {
            Self::Bilateral => "bilateral",
            Self::Exposure => "exposure",
            Self::Brightness => "brightness",
            Self::Saturation => "saturation",
        }
    }

    /// Parse a snake_case string into a FilterKind.
    ///
    /// Returns `None` if the string does not match any known kind.
    pub fn from_str_id(s: &str) -> Option<Self> {
        match s {
            "bilateral" => Some(Self::Bilateral),
            "exposure" => Some(Self::Exposure),
            "brightness" => Some(Self::Brightness),
            "saturation" => Some(Self::Saturation),
            _ => None,
        }
    }

    /// Nominal `(min, max)` of the stage's native parameter.
    ///
    /// For `Bilateral` this is the distance normalization factor, where a
    /// smaller value means stronger smoothing.
    pub fn native_range(self) -> (f32, f32) {
        match self {
            Self::Bilateral => (1.0, 10.0),
            Self::Exposure => (-10.0, 10.0),
            Self::Brightness => (-1.0, 1.0),
            Self::Saturation => (0.0, 2.0),
        }
    }

    /// Native value installed when the controller is initialised.
    pub fn default_value(self) -> f32 {
        match self {
            Self::Bilateral => 5.5,
            Self::Exposure => 0.0,
            Self::Brightness => 0.0,
            Self::Saturation => 1.0,
        }
    }

    /// Map a slider position to the stage's native parameter value.
    ///
    /// The Bilateral arm reaches 0.0 at full slider, below the nominal
    /// `native_range` minimum of 1.0.
    pub fn to_native(self, v: NormalizedValue) -> f32 {
        let v = v.value();
        match self {
            // Inverse mapping: pushing the slider up smooths more.
            Self::Bilateral => 10.0 - v * 10.0,
            Self::Exposure => v * 20.0 - 10.0,
            Self::Brightness => v * 2.0 - 1.0,
            Self::Saturation => v * 2.0,
        }
    }

    /// Inverse of [`FilterKind::to_native`], clamped into `[0, 1]`.
    pub fn to_normalized(self, native: f32) -> NormalizedValue {
        let v = match self {
            Self::Bilateral => (10.0 - native) / 10.0,
            Self::Exposure => (native + 10.0) / 20.0,
            Self::Brightness => (native + 1.0) / 2.0,
            Self::Saturation => native / 2.0,
        };
        NormalizedValue::clamped(v)
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_id(s).ok_or_else(|| FilterError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_id_str())
    }
}

/// A slider position, clamped to `[0, 1]` on construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct NormalizedValue(f32);

impl NormalizedValue {
    /// Create a normalized value. Out-of-range input is clamped; NaN and
    /// infinities are rejected.
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(FilterError::InvalidValue(value));
        }
        Ok(Self::clamped(value))
    }

    fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Return the raw f32 value.
    pub fn value(self) -> f32 {
        self.0
    }
}

/// A slider movement reported by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterUpdateEvent {
    pub kind: FilterKind,
    pub value: f32,
}

impl ParameterUpdateEvent {
    pub fn new(kind: FilterKind, value: f32) -> Self {
        Self { kind, value }
    }
}

/// A vertex in the processing graph as seen by the host pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum Node {
    Source,
    Stage(FilterKind),
    Sink,
}

/// The effective path frames take from source to sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Source feeds the sink directly.
    Bypass,
    /// Source feeds the entry stage; the exit stage feeds the sink.
    Filtered,
}
