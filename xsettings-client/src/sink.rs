/// How a setting changed between two generations of the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingAction {
    Added,
    Changed,
    Deleted,
}

/// The toolkit side of the settings client.
/// All calls are made from the thread that dispatches X events.
pub trait SettingsSink {
    /// A consumer-visible setting was added, changed or deleted
    fn notify(&mut self, screen: usize, name: &str, action: SettingAction);

    /// The font resolution in dots per inch; negative means unset
    fn set_resolution(&mut self, screen: usize, dpi: f64);

    /// The integer window scale the settings manager asks for
    fn set_window_scale(&mut self, screen: usize, factor: i32);
}
