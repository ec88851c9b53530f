//! Settings computed from what the manager publishes rather than
//! taken from it directly.
use crate::config::ClientConfig;
use crate::sink::SettingsSink;
use xsettings_wire::names::{UNSCALED_DPI, WINDOW_SCALING_FACTOR, XFT_DPI};
use xsettings_wire::XSettingsMap;

/// Xft/DPI is published in 1024ths of a dot per inch
const DPI_UNITS: f64 = 1024.0;

/// When the window scale is not fixed, toolkits should see the DPI
/// from before the manager applied its window scaling, so copy the
/// unscaled DPI over the published one.
pub fn inject_unscaled_dpi(settings: &mut XSettingsMap, fixed_scale: bool) {
    if fixed_scale {
        return;
    }
    if let Some(unscaled) = settings.get(UNSCALED_DPI).cloned() {
        settings.insert(XFT_DPI.to_string(), unscaled);
    }
}

/// The screen resolution in DPI, or -1.0 if the settings don't say
pub fn resolution(settings: Option<&XSettingsMap>, dpi_scale: Option<f64>) -> f64 {
    let raw = settings
        .and_then(|settings| settings.get(XFT_DPI))
        .and_then(|value| value.as_integer())
        .unwrap_or(-1);

    if raw <= 0 {
        return -1.0;
    }

    let dpi = raw as f64 / DPI_UNITS;
    match dpi_scale {
        Some(scale) => dpi * scale,
        None => dpi,
    }
}

pub fn window_scale(settings: Option<&XSettingsMap>, fixed_scale: bool) -> Option<i32> {
    if fixed_scale {
        return None;
    }
    settings
        .and_then(|settings| settings.get(WINDOW_SCALING_FACTOR))
        .and_then(|value| value.as_integer())
}

/// Publish the derived resolution and window scale for a new
/// generation of settings. Call after [inject_unscaled_dpi].
pub fn publish_derived(
    screen: usize,
    settings: Option<&XSettingsMap>,
    config: &ClientConfig,
    sink: &mut dyn SettingsSink,
) {
    if !config.resolution_set {
        let dpi = resolution(settings, config.effective_dpi_scale());
        log::debug!("screen {}: resolution {}", screen, dpi);
        sink.set_resolution(screen, dpi);
    }

    if let Some(scale) = window_scale(settings, config.fixed_scale()) {
        log::debug!("screen {}: window scale {}", screen, scale);
        sink.set_window_scale(screen, scale);
    }
}
