//! A fixed-capacity, byte-order aware buffer for reading and writing WKB primitives.

use std::io::ErrorKind;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{GeoWkxError, Result};
use crate::io::wkb::common::Endianness;

/// Sequential reader/writer over a byte array.
///
/// Writing past the capacity given to [`allocate`][Self::allocate] fails instead of growing, so
/// a wrong size pre-calculation surfaces as an error.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    position: usize,
    byte_order: Endianness,
}

impl ByteBuffer {
    /// A zero-filled buffer for writing exactly `capacity` bytes.
    pub fn allocate(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            position: 0,
            byte_order: Endianness::default(),
        }
    }

    /// Wrap existing bytes for reading.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            byte_order: Endianness::default(),
        }
    }

    /// Decode a hexadecimal string, as PostGIS prints EWKB.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.len() % 2 != 0 {
            return Err(GeoWkxError::MalformedWkb(format!(
                "hex string has odd length {}",
                hex.len()
            )));
        }
        let data = hex
            .as_bytes()
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| match pair {
                [high, low] if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() => {
                    Ok((hex_value(*high) << 4) | hex_value(*low))
                }
                _ => Err(GeoWkxError::MalformedWkb(format!(
                    "invalid hex digits at offset {}",
                    i * 2
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_bytes(data))
    }

    /// Upper-case hexadecimal rendering of the whole buffer.
    pub fn to_hex(&self) -> String {
        self.data.iter().map(|b| format!("{b:02X}")).collect()
    }

    pub fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.byte_order = byte_order;
    }

    /// Move the cursor back to the start.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn underflow(&self, needed: usize) -> GeoWkxError {
        GeoWkxError::MalformedWkb(format!(
            "buffer underflow: need {needed} bytes at offset {}, {} left",
            self.position,
            self.remaining()
        ))
    }

    fn overflow(&self, needed: usize) -> GeoWkxError {
        GeoWkxError::ValueOutOfRange(format!(
            "buffer overflow: writing {needed} bytes at offset {} exceeds capacity {}",
            self.position,
            self.capacity()
        ))
    }

    /// Run a read of `size` bytes against the unread part of the buffer.
    fn read_with<T>(
        &mut self,
        size: usize,
        read: impl FnOnce(&mut &[u8]) -> std::io::Result<T>,
    ) -> Result<T> {
        let mut rest = &self.data[self.position..];
        match read(&mut rest) {
            Ok(value) => {
                self.position += size;
                Ok(value)
            }
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(self.underflow(size)),
            Err(err) => Err(err.into()),
        }
    }

    /// Run a write of `size` bytes against the unwritten part of the buffer.
    fn write_with(
        &mut self,
        size: usize,
        write: impl FnOnce(&mut &mut [u8]) -> std::io::Result<()>,
    ) -> Result<()> {
        if self.remaining() < size {
            return Err(self.overflow(size));
        }
        let mut rest = &mut self.data[self.position..];
        write(&mut rest)?;
        self.position += size;
        Ok(())
    }

    pub fn get(&mut self) -> Result<u8> {
        self.read_with(1, |r| r.read_u8())
    }

    pub fn put(&mut self, value: u8) -> Result<()> {
        self.write_with(1, |w| w.write_u8(value))
    }

    pub fn get_uint(&mut self) -> Result<u32> {
        match self.byte_order {
            Endianness::BigEndian => self.read_with(4, |r| r.read_u32::<BigEndian>()),
            Endianness::LittleEndian => self.read_with(4, |r| r.read_u32::<LittleEndian>()),
        }
    }

    /// Write an unsigned 32-bit value; fails if `value` exceeds `u32::MAX`.
    pub fn put_uint(&mut self, value: u64) -> Result<()> {
        let value = u32::try_from(value).map_err(|_| {
            GeoWkxError::ValueOutOfRange(format!("{value} does not fit in an unsigned 32-bit field"))
        })?;
        match self.byte_order {
            Endianness::BigEndian => self.write_with(4, |w| w.write_u32::<BigEndian>(value)),
            Endianness::LittleEndian => self.write_with(4, |w| w.write_u32::<LittleEndian>(value)),
        }
    }

    pub fn get_int(&mut self) -> Result<i32> {
        match self.byte_order {
            Endianness::BigEndian => self.read_with(4, |r| r.read_i32::<BigEndian>()),
            Endianness::LittleEndian => self.read_with(4, |r| r.read_i32::<LittleEndian>()),
        }
    }

    pub fn put_int(&mut self, value: i32) -> Result<()> {
        match self.byte_order {
            Endianness::BigEndian => self.write_with(4, |w| w.write_i32::<BigEndian>(value)),
            Endianness::LittleEndian => self.write_with(4, |w| w.write_i32::<LittleEndian>(value)),
        }
    }

    pub fn get_double(&mut self) -> Result<f64> {
        match self.byte_order {
            Endianness::BigEndian => self.read_with(8, |r| r.read_f64::<BigEndian>()),
            Endianness::LittleEndian => self.read_with(8, |r| r.read_f64::<LittleEndian>()),
        }
    }

    pub fn put_double(&mut self, value: f64) -> Result<()> {
        match self.byte_order {
            Endianness::BigEndian => self.write_with(8, |w| w.write_f64::<BigEndian>(value)),
            Endianness::LittleEndian => self.write_with(8, |w| w.write_f64::<LittleEndian>(value)),
        }
    }

    /// Read `out.len()` doubles in one bounds check.
    pub fn get_doubles(&mut self, out: &mut [f64]) -> Result<()> {
        let size = out.len() * 8;
        if self.remaining() < size {
            return Err(self.underflow(size));
        }
        let bytes = &self.data[self.position..self.position + size];
        match self.byte_order {
            Endianness::BigEndian => BigEndian::read_f64_into(bytes, out),
            Endianness::LittleEndian => LittleEndian::read_f64_into(bytes, out),
        }
        self.position += size;
        Ok(())
    }
}

/// Value of an ASCII hex digit.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
