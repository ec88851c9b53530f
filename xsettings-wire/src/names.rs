//! Translation from the names settings managers publish on the wire
//! to the stable names the toolkit consumes.
use crate::value::SettingType;
use std::collections::HashMap;

/// Names meant for upward propagation start with this prefix.
pub const CONSUMER_PREFIX: &str = "toolkit-";

/// Translated but never propagated; feeds window scale derivation.
pub const WINDOW_SCALING_FACTOR: &str = "internal-window-scaling-factor";
/// Translated but never propagated; the DPI before window scaling.
pub const UNSCALED_DPI: &str = "internal-unscaled-dpi";
/// The font resolution, in 1024ths of a dot per inch.
pub const XFT_DPI: &str = "toolkit-xft-dpi";

/// wire name, internal name, the type the toolkit expects
const SETTING_NAMES: &[(&str, &str, SettingType)] = &[
    ("Net/DoubleClickTime", "toolkit-double-click-time", SettingType::Integer),
    ("Net/DoubleClickDistance", "toolkit-double-click-distance", SettingType::Integer),
    ("Net/DndDragThreshold", "toolkit-dnd-drag-threshold", SettingType::Integer),
    ("Net/CursorBlink", "toolkit-cursor-blink", SettingType::Integer),
    ("Net/CursorBlinkTime", "toolkit-cursor-blink-time", SettingType::Integer),
    ("Net/ThemeName", "toolkit-theme-name", SettingType::String),
    ("Net/IconThemeName", "toolkit-icon-theme-name", SettingType::String),
    ("Net/FallbackIconTheme", "toolkit-fallback-icon-theme", SettingType::String),
    ("Net/SoundThemeName", "toolkit-sound-theme-name", SettingType::String),
    ("Net/EnableEventSounds", "toolkit-enable-event-sounds", SettingType::Integer),
    ("Net/EnableInputFeedbackSounds", "toolkit-enable-input-feedback-sounds", SettingType::Integer),
    ("Gtk/ColorPalette", "toolkit-color-palette", SettingType::String),
    ("Gtk/ColorScheme", "toolkit-color-scheme", SettingType::String),
    ("Gtk/FontName", "toolkit-font-name", SettingType::String),
    ("Gtk/KeyThemeName", "toolkit-key-theme-name", SettingType::String),
    ("Gtk/ToolbarStyle", "toolkit-toolbar-style", SettingType::String),
    ("Gtk/ToolbarIconSize", "toolkit-toolbar-icon-size", SettingType::String),
    ("Gtk/IMPreeditStyle", "toolkit-im-preedit-style", SettingType::String),
    ("Gtk/IMStatusStyle", "toolkit-im-status-style", SettingType::String),
    ("Gtk/IMModule", "toolkit-im-module", SettingType::String),
    ("Gtk/Modules", "toolkit-modules", SettingType::String),
    ("Gtk/FileChooserBackend", "toolkit-file-chooser-backend", SettingType::String),
    ("Gtk/ButtonImages", "toolkit-button-images", SettingType::Integer),
    ("Gtk/MenuImages", "toolkit-menu-images", SettingType::Integer),
    ("Gtk/MenuBarAccel", "toolkit-menu-bar-accel", SettingType::String),
    ("Gtk/CursorThemeName", "toolkit-cursor-theme-name", SettingType::String),
    ("Gtk/CursorThemeSize", "toolkit-cursor-theme-size", SettingType::Integer),
    ("Gtk/CursorBlinkTimeout", "toolkit-cursor-blink-timeout", SettingType::Integer),
    ("Gtk/EnableAnimations", "toolkit-enable-animations", SettingType::Integer),
    ("Gtk/EnableAccels", "toolkit-enable-accels", SettingType::Integer),
    ("Gtk/EnableMnemonics", "toolkit-enable-mnemonics", SettingType::Integer),
    ("Gtk/EnablePrimaryPaste", "toolkit-enable-primary-paste", SettingType::Integer),
    ("Gtk/TouchscreenMode", "toolkit-touchscreen-mode", SettingType::Integer),
    ("Gtk/ScrolledWindowPlacement", "toolkit-scrolled-window-placement", SettingType::Integer),
    ("Gtk/ShowInputMethodMenu", "toolkit-show-input-method-menu", SettingType::Integer),
    ("Gtk/ShowUnicodeMenu", "toolkit-show-unicode-menu", SettingType::Integer),
    ("Gtk/TimeoutInitial", "toolkit-timeout-initial", SettingType::Integer),
    ("Gtk/TimeoutRepeat", "toolkit-timeout-repeat", SettingType::Integer),
    ("Gtk/ShellShowsAppMenu", "toolkit-shell-shows-app-menu", SettingType::Integer),
    ("Gtk/ShellShowsMenubar", "toolkit-shell-shows-menubar", SettingType::Integer),
    ("Gtk/ShellShowsDesktop", "toolkit-shell-shows-desktop", SettingType::Integer),
    ("Gtk/SessionBusId", "toolkit-session-bus-id", SettingType::String),
    ("Gtk/DecorationLayout", "toolkit-decoration-layout", SettingType::String),
    ("Gtk/TitlebarDoubleClick", "toolkit-titlebar-double-click", SettingType::String),
    ("Gtk/TitlebarMiddleClick", "toolkit-titlebar-middle-click", SettingType::String),
    ("Gtk/TitlebarRightClick", "toolkit-titlebar-right-click", SettingType::String),
    ("Gtk/DialogsUseHeader", "toolkit-dialogs-use-header", SettingType::Integer),
    ("Gtk/PrimaryButtonWarpsSlider", "toolkit-primary-button-warps-slider", SettingType::Integer),
    ("Gtk/RecentFilesMaxAge", "toolkit-recent-files-max-age", SettingType::Integer),
    ("Gtk/RecentFilesEnabled", "toolkit-recent-files-enabled", SettingType::Integer),
    ("Gtk/KeynavUseCaret", "toolkit-keynav-use-caret", SettingType::Integer),
    ("Gtk/OverlayScrolling", "toolkit-overlay-scrolling", SettingType::Integer),
    ("Xft/Antialias", "toolkit-xft-antialias", SettingType::Integer),
    ("Xft/Hinting", "toolkit-xft-hinting", SettingType::Integer),
    ("Xft/HintStyle", "toolkit-xft-hintstyle", SettingType::String),
    ("Xft/RGBA", "toolkit-xft-rgba", SettingType::String),
    ("Xft/DPI", XFT_DPI, SettingType::Integer),
    ("Fontconfig/Timestamp", "toolkit-fontconfig-timestamp", SettingType::Integer),
    ("Gdk/WindowScalingFactor", WINDOW_SCALING_FACTOR, SettingType::Integer),
    ("Gdk/UnscaledDPI", UNSCALED_DPI, SettingType::Integer),
];

/// The result of translating a wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub name: &'static str,
    pub expected_type: SettingType,
}

lazy_static::lazy_static! {
    static ref TRANSLATIONS: HashMap<&'static [u8], Translation> = build_map();
}

fn build_map() -> HashMap<&'static [u8], Translation> {
    SETTING_NAMES
        .iter()
        .map(|&(wire, name, expected_type)| {
            (
                wire.as_bytes(),
                Translation {
                    name,
                    expected_type,
                },
            )
        })
        .collect()
}

/// Translate a wire name; `None` means the setting is not one we track.
/// Managers write names as C strings, so the name ends at the first NUL
/// even if the declared length runs past it.
pub fn translate(wire_name: &[u8]) -> Option<Translation> {
    TRANSLATIONS.get(c_name(wire_name)).copied()
}

/// The part of a wire name before the first NUL
pub fn c_name(wire_name: &[u8]) -> &[u8] {
    match wire_name.iter().position(|b| *b == 0) {
        Some(end) => &wire_name[..end],
        None => wire_name,
    }
}

/// Map an internal name back to the name used on the wire
pub fn wire_name(internal_name: &str) -> Option<&'static str> {
    SETTING_NAMES
        .iter()
        .find(|(_, name, _)| *name == internal_name)
        .map(|(wire, _, _)| *wire)
}

/// Whether `name` is meant to be seen by toolkit consumers
pub fn is_consumer_visible(name: &str) -> bool {
    name.starts_with(CONSUMER_PREFIX)
}
