//! Keeps a toolkit up to date with the settings published by the X11
//! settings manager of each screen.
//!
//! An [XSettingsClient] watches the `_XSETTINGS_S<N>` selection, reads
//! the manager's settings property whenever it changes and reports the
//! differences to a [SettingsSink], along with the font resolution
//! and window scale derived from them. The X server is reached through
//! the [XConnection] trait; enable the `x11` feature for an
//! implementation based on xcb.
mod client;
pub mod config;
pub mod conn;
pub mod derived;
pub mod diff;
mod screen;
mod sink;
mod store;

#[cfg(test)]
mod testing;

#[cfg(all(feature = "x11", unix, not(target_os = "macos")))]
pub mod x11;

pub use client::XSettingsClient;
pub use config::ClientConfig;
pub use conn::{RawEvent, XConnection};
pub use screen::ScreenSettings;
pub use sink::{SettingAction, SettingsSink};
pub use store::SettingsStore;
pub use xsettings_wire::{XSetting, XSettingsMap};
