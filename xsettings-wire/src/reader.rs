//! A bounds-checked cursor over a raw settings property.
//! Every read refuses to step past the end of the buffer; the caller
//! treats any failure as fatal for the whole payload.
use crate::error::{Error, Result};
use bytes::Buf;

/// The byte order declared in the first byte of a payload.
/// The values are the X11 `LSBFirst` and `MSBFirst` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LsbFirst,
    MsbFirst,
}

impl ByteOrder {
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::LsbFirst),
            1 => Ok(Self::MsbFirst),
            n => Err(Error::MalformedHeader(n)),
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Self::LsbFirst => 0,
            Self::MsbFirst => 1,
        }
    }
}

/// Round `len` up to the next multiple of 4.
/// The arithmetic is done in the 32-bit width of the length fields
/// so that a hostile length close to `u32::MAX` is caught here rather
/// than silently wrapping.
pub fn pad(len: u32) -> Result<u32> {
    len.checked_add(3)
        .map(|n| n & !3)
        .ok_or(Error::Overflow(len))
}

pub struct WireReader<'a> {
    buf: &'a [u8],
    order: ByteOrder,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self { buf: data, order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, wanted: usize) -> Result<()> {
        if self.buf.remaining() < wanted {
            return Err(Error::Truncated {
                wanted,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(match self.order {
            ByteOrder::MsbFirst => self.buf.get_u16(),
            ByteOrder::LsbFirst => self.buf.get_u16_le(),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(match self.order {
            ByteOrder::MsbFirst => self.buf.get_u32(),
            ByteOrder::LsbFirst => self.buf.get_u32_le(),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_u32().map(|v| v as i32)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Read `len` bytes of string data followed by the zero padding
    /// that brings the total up to a multiple of 4.
    /// Returns just the `len` bytes of content.
    pub fn read_padded_string(&mut self, len: u32) -> Result<&'a [u8]> {
        let padded_len = pad(len)? as usize;
        self.ensure(padded_len)?;
        let (body, rest) = self.buf.split_at(padded_len);
        self.buf = rest;
        Ok(&body[..len as usize])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use k9::assert_equal as assert_eq;

    #[test]
    fn byte_order_values() {
        assert_eq!(ByteOrder::from_wire(0), Ok(ByteOrder::LsbFirst));
        assert_eq!(ByteOrder::from_wire(1), Ok(ByteOrder::MsbFirst));
        assert_eq!(ByteOrder::from_wire(b'l'), Err(Error::MalformedHeader(b'l')));
    }

    #[test]
    fn endian_fetches() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc];

        let mut lsb = WireReader::new(&data, ByteOrder::LsbFirst);
        assert_eq!(lsb.read_u16().unwrap(), 0x3412);
        assert_eq!(lsb.read_u32().unwrap(), 0xbc9a7856);

        let mut msb = WireReader::new(&data, ByteOrder::MsbFirst);
        assert_eq!(msb.read_u16().unwrap(), 0x1234);
        assert_eq!(msb.read_u32().unwrap(), 0x56789abc);
        assert_eq!(msb.remaining(), 0);
    }

    #[test]
    fn refuses_to_read_past_the_end() {
        let data = [1, 2, 3];
        let mut reader = WireReader::new(&data, ByteOrder::LsbFirst);
        assert_eq!(
            reader.read_u32(),
            Err(Error::Truncated {
                wanted: 4,
                remaining: 3
            })
        );
        // a failed read does not consume anything
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read_u16().unwrap(), 0x0201);
        assert!(reader.skip(2).is_err());
        assert_eq!(reader.read_u8().unwrap(), 3);
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn padded_string_consumes_padding() {
        let data = b"abcde\0\0\0xyz!";
        let mut reader = WireReader::new(data, ByteOrder::LsbFirst);
        assert_eq!(reader.read_padded_string(5).unwrap(), &b"abcde"[..]);
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.read_padded_string(4).unwrap(), &b"xyz!"[..]);
        assert_eq!(reader.read_padded_string(0).unwrap(), &b""[..]);
    }

    #[test]
    fn padded_string_needs_its_padding() {
        // 5 bytes of content need 8 bytes in total
        let data = b"abcde\0\0";
        let mut reader = WireReader::new(data, ByteOrder::LsbFirst);
        assert!(matches!(
            reader.read_padded_string(5),
            Err(Error::Truncated { wanted: 8, .. })
        ));
    }

    #[test]
    fn pad_overflow_is_detected() {
        assert_eq!(pad(0).unwrap(), 0);
        assert_eq!(pad(1).unwrap(), 4);
        assert_eq!(pad(4).unwrap(), 4);
        assert_eq!(pad(u32::MAX - 3).unwrap(), u32::MAX - 3);
        for len in [u32::MAX - 2, u32::MAX - 1, u32::MAX] {
            assert_eq!(pad(len), Err(Error::Overflow(len)));
        }

        let data = [0u8; 16];
        let mut reader = WireReader::new(&data, ByteOrder::MsbFirst);
        assert_eq!(
            reader.read_padded_string(u32::MAX),
            Err(Error::Overflow(u32::MAX))
        );
    }
}
