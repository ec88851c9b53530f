use xsettings_wire::{XSetting, XSettingsMap};

/// Holds the current generation of settings for a screen.
/// `None` means no settings are known, which is different from
/// a manager publishing an empty set.
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: Option<XSettingsMap>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&XSetting> {
        self.current.as_ref().and_then(|settings| settings.get(name))
    }

    pub fn current(&self) -> Option<&XSettingsMap> {
        self.current.as_ref()
    }

    /// Swap in a new generation, returning the previous one
    pub fn replace(&mut self, settings: Option<XSettingsMap>) -> Option<XSettingsMap> {
        std::mem::replace(&mut self.current, settings)
    }

    pub fn clear(&mut self) -> Option<XSettingsMap> {
        self.current.take()
    }
}
