//! Kept apart from the unit tests because it changes the process
//! environment, which the unit tests consult when deriving the DPI.
use k9::assert_equal as assert_eq;
use xsettings_client::config::DPI_SCALE_ENV;
use xsettings_client::derived::publish_derived;
use xsettings_client::{ClientConfig, SettingAction, SettingsSink, XSetting, XSettingsMap};

#[derive(Default)]
struct Resolutions(Vec<f64>);

impl SettingsSink for Resolutions {
    fn notify(&mut self, _screen: usize, _name: &str, _action: SettingAction) {}

    fn set_resolution(&mut self, _screen: usize, dpi: f64) {
        self.0.push(dpi);
    }

    fn set_window_scale(&mut self, _screen: usize, _factor: i32) {}
}

#[test]
fn dpi_scale_from_environment() {
    let mut settings = XSettingsMap::new();
    settings.insert("toolkit-xft-dpi".to_string(), XSetting::Integer(98304));
    let config = ClientConfig::default();
    let mut sink = Resolutions::default();

    std::env::set_var(DPI_SCALE_ENV, "1.5");
    publish_derived(0, Some(&settings), &config, &mut sink);

    // consulted afresh every time
    std::env::set_var(DPI_SCALE_ENV, "0");
    publish_derived(0, Some(&settings), &config, &mut sink);

    std::env::remove_var(DPI_SCALE_ENV);
    publish_derived(0, Some(&settings), &config, &mut sink);

    // an explicit scale wins over the environment
    std::env::set_var(DPI_SCALE_ENV, "3");
    let explicit = ClientConfig {
        dpi_scale: Some(2.0),
        ..ClientConfig::default()
    };
    publish_derived(0, Some(&settings), &explicit, &mut sink);

    // nothing to scale
    publish_derived(0, None, &config, &mut sink);
    std::env::remove_var(DPI_SCALE_ENV);

    assert_eq!(sink.0, vec![144.0, 96.0, 96.0, 192.0, -1.0]);
}
