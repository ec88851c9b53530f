use serde::{Deserialize, Serialize};

/// Multiplier applied to the DPI derived from the settings manager
pub const DPI_SCALE_ENV: &str = "SETTINGS_DPI_SCALE";
/// Pins the window scale, overriding whatever the manager publishes
pub const WINDOW_SCALE_ENV: &str = "SETTINGS_SCALE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// When set, the window scale is fixed to this value and the
    /// manager's scaling factor and unscaled DPI are ignored.
    pub fixed_window_scale: Option<i32>,

    /// The application has chosen its own resolution; don't derive
    /// one from the settings.
    pub resolution_set: bool,

    /// Multiplier for the derived DPI. When absent the
    /// `SETTINGS_DPI_SCALE` environment variable is consulted
    /// each time the DPI is derived.
    pub dpi_scale: Option<f64>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            fixed_window_scale: std::env::var(WINDOW_SCALE_ENV)
                .ok()
                .and_then(|s| parse_window_scale(&s)),
            ..Self::default()
        }
    }

    pub fn fixed_scale(&self) -> bool {
        self.fixed_window_scale.is_some()
    }

    pub fn effective_dpi_scale(&self) -> Option<f64> {
        match self.dpi_scale {
            Some(scale) if is_valid_dpi_scale(scale) => Some(scale),
            Some(_) => None,
            None => dpi_scale_from_env(),
        }
    }
}

fn is_valid_dpi_scale(scale: f64) -> bool {
    scale.is_finite() && scale != 0.0
}

/// Invalid values behave as though the variable were unset
pub fn parse_dpi_scale(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|scale| is_valid_dpi_scale(*scale))
}

pub fn parse_window_scale(value: &str) -> Option<i32> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|scale| *scale > 0)
}

pub fn dpi_scale_from_env() -> Option<f64> {
    std::env::var(DPI_SCALE_ENV)
        .ok()
        .and_then(|s| parse_dpi_scale(&s))
}
