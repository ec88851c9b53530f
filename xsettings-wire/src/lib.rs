//! The XSETTINGS wire format.
//!
//! Settings managers publish a dictionary of typed values in the
//! `_XSETTINGS_SETTINGS` property of the window that owns the per-screen
//! `_XSETTINGS_S<N>` selection. This crate turns such a property into
//! an [XSettingsMap] keyed by the names the toolkit uses, without
//! talking to the X server itself.
mod error;
pub mod names;
mod parser;
pub mod reader;
mod value;

#[cfg(any(test, feature = "encode"))]
pub mod encode;

pub use error::*;
pub use parser::*;
pub use value::*;
