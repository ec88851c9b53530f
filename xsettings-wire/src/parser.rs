//! This module parses xsettings data.
//! The data format is slightly incorrectly documented here:
//! <https://specifications.freedesktop.org/xsettings-spec/xsettings-latest.html>
//! The string length is documented as a 16-bit value but managers
//! write (and libxsettings-client reads) a 32-bit value, so we do too.
use crate::error::{Error, Result};
use crate::names::{c_name, translate};
use crate::reader::{ByteOrder, WireReader};
use crate::value::{SettingType, XSetting, XSettingsMap};
use std::collections::btree_map::Entry;

/// A successfully parsed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSettings {
    /// The manager's serial for this generation of the settings
    pub serial: u32,
    pub settings: XSettingsMap,
}

pub fn parse_xsettings(data: &[u8]) -> Result<XSettingsMap> {
    parse_xsettings_with_serial(data).map(|parsed| parsed.settings)
}

/// Parse a settings property into a map keyed by translated name.
///
/// Entries whose names we don't translate are dropped.
/// An entry with an unknown type code cannot be skipped because its
/// length is unknown: it is tolerated only as the final entry.
/// Any other problem rejects the payload as a whole.
pub fn parse_xsettings_with_serial(data: &[u8]) -> Result<ParsedSettings> {
    let (&byte_order, rest) = data.split_first().ok_or(Error::Truncated {
        wanted: 1,
        remaining: 0,
    })?;
    let mut reader = WireReader::new(rest, ByteOrder::from_wire(byte_order)?);

    reader.skip(3)?;
    let serial = reader.read_u32()?;
    let num_settings = reader.read_u32()?;

    let mut settings = XSettingsMap::new();

    for idx in 0..num_settings {
        let type_code = reader.read_u8()?;
        reader.skip(1)?;
        let name_len = reader.read_u16()?;
        let wire_name = c_name(reader.read_padded_string(name_len.into())?);
        let _last_change_serial = reader.read_u32()?;

        let value = match SettingType::from_wire(type_code) {
            Some(SettingType::Integer) => XSetting::Integer(reader.read_i32()?),
            Some(SettingType::String) => {
                let len = reader.read_u32()?;
                XSetting::string(reader.read_padded_string(len)?)
            }
            Some(SettingType::Color) => {
                let red = reader.read_u16()?;
                let green = reader.read_u16()?;
                let blue = reader.read_u16()?;
                let alpha = reader.read_u16()?;
                XSetting::Color(red, green, blue, alpha)
            }
            None if idx + 1 == num_settings => {
                log::debug!(
                    "ignoring trailing setting {} with unknown type {}",
                    String::from_utf8_lossy(wire_name),
                    type_code
                );
                break;
            }
            None => return Err(Error::UnknownType(type_code)),
        };

        let translation = match translate(wire_name) {
            Some(t) => t,
            None => {
                log::trace!(
                    "dropping untranslated setting {}",
                    String::from_utf8_lossy(wire_name)
                );
                continue;
            }
        };

        if value.setting_type() != translation.expected_type {
            log::debug!(
                "setting {} has type {:?} but {:?} was expected; keeping it anyway",
                translation.name,
                value.setting_type(),
                translation.expected_type
            );
        }

        match settings.entry(translation.name.to_string()) {
            Entry::Occupied(_) => {
                return Err(Error::DuplicateKey(translation.name.to_string()));
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    Ok(ParsedSettings { serial, settings })
}
