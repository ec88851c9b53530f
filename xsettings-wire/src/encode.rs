//! Build settings payloads in the wire format.
//! This is what a settings manager publishes; we only need it to feed
//! fake managers and to exercise the parser.
use crate::reader::{pad, ByteOrder};
use crate::value::{SettingType, XSetting};
use bytes::BufMut;

pub struct PayloadBuilder {
    order: ByteOrder,
    serial: u32,
    claimed_entries: Option<u32>,
    count: u32,
    entries: Vec<u8>,
}

impl PayloadBuilder {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            serial: 0,
            claimed_entries: None,
            count: 0,
            entries: vec![],
        }
    }

    pub fn serial(mut self, serial: u32) -> Self {
        self.serial = serial;
        self
    }

    /// Write `n` into the entry count field instead of the real count
    pub fn claim_entries(mut self, n: u32) -> Self {
        self.claimed_entries = Some(n);
        self
    }

    pub fn integer(self, name: &str, value: i32) -> Self {
        let mut body = vec![];
        put_u32(&mut body, self.order, value as u32);
        self.raw_entry(SettingType::Integer.to_wire(), name, &body)
    }

    pub fn string(self, name: &str, value: &[u8]) -> Self {
        let mut body = vec![];
        put_u32(&mut body, self.order, value.len() as u32);
        put_padded(&mut body, value);
        self.raw_entry(SettingType::String.to_wire(), name, &body)
    }

    pub fn color(self, name: &str, red: u16, green: u16, blue: u16, alpha: u16) -> Self {
        let mut body = vec![];
        for channel in [red, green, blue, alpha] {
            put_u16(&mut body, self.order, channel);
        }
        self.raw_entry(SettingType::Color.to_wire(), name, &body)
    }

    pub fn setting(self, name: &str, value: &XSetting) -> Self {
        match value {
            XSetting::Integer(i) => self.integer(name, *i),
            XSetting::String(s) => self.string(name, s),
            XSetting::Color(r, g, b, a) => self.color(name, *r, *g, *b, *a),
        }
    }

    /// Append an entry with an arbitrary type code and a pre-encoded body
    pub fn raw_entry(mut self, type_code: u8, name: &str, body: &[u8]) -> Self {
        self.entries.put_u8(type_code);
        self.entries.put_u8(0);
        put_u16(&mut self.entries, self.order, name.len() as u16);
        put_padded(&mut self.entries, name.as_bytes());
        // last change serial
        put_u32(&mut self.entries, self.order, self.serial);
        self.entries.put_slice(body);
        self.count += 1;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(12 + self.entries.len());
        buf.put_u8(self.order.to_wire());
        buf.put_slice(&[0, 0, 0]);
        put_u32(&mut buf, self.order, self.serial);
        put_u32(
            &mut buf,
            self.order,
            self.claimed_entries.unwrap_or(self.count),
        );
        buf.put_slice(&self.entries);
        buf
    }
}

fn put_u16(buf: &mut Vec<u8>, order: ByteOrder, value: u16) {
    match order {
        ByteOrder::MsbFirst => buf.put_u16(value),
        ByteOrder::LsbFirst => buf.put_u16_le(value),
    }
}

fn put_u32(buf: &mut Vec<u8>, order: ByteOrder, value: u32) {
    match order {
        ByteOrder::MsbFirst => buf.put_u32(value),
        ByteOrder::LsbFirst => buf.put_u32_le(value),
    }
}

fn put_padded(buf: &mut Vec<u8>, data: &[u8]) {
    buf.put_slice(data);
    let padded = pad(data.len() as u32).unwrap_or(data.len() as u32) as usize;
    buf.put_bytes(0, padded - data.len());
}
