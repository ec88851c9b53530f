use bytes::Bytes;
use std::collections::BTreeMap;

/// A parsed settings dictionary, keyed by translated setting name.
pub type XSettingsMap = BTreeMap<String, XSetting>;

/// The type code carried by each entry on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    Integer,
    String,
    Color,
}

impl SettingType {
    pub fn from_wire(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Integer),
            1 => Some(Self::String),
            2 => Some(Self::Color),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Self::Integer => 0,
            Self::String => 1,
            Self::Color => 2,
        }
    }
}

/// A single setting value.
///
/// Strings are kept as opaque bytes: managers are not required to
/// publish UTF-8. Colors keep the raw 16-bit channels in the order
/// red, green, blue, alpha.
///
/// Equality is strict: variants must match, strings compare byte
/// for byte and colors compare every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XSetting {
    Integer(i32),
    String(Bytes),
    Color(u16, u16, u16, u16),
}

impl XSetting {
    /// Build a string setting, taking a private copy of `data`.
    pub fn string(data: &[u8]) -> Self {
        Self::String(Bytes::copy_from_slice(data))
    }

    pub fn setting_type(&self) -> SettingType {
        match self {
            Self::Integer(_) => SettingType::Integer,
            Self::String(_) => SettingType::String,
            Self::Color(..) => SettingType::Color,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Returns the string value if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|s| std::str::from_utf8(s).ok())
    }

    /// Returns the color normalized to `0.0..=1.0` per channel
    pub fn as_rgba(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Color(r, g, b, a) => {
                let norm = |c: &u16| *c as f64 / 65535.0;
                Some((norm(r), norm(g), norm(b), norm(a)))
            }
            _ => None,
        }
    }
}
