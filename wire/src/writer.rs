//! Append-only byte encoding of wire primitives.

use crate::error::{WireError, WireResult};

const VAR_INT_MAX_BYTES: usize = 5;

/// Append-only writer for the primitive encodings the packet layouts use.
///
/// Multi-byte integers and floats are big-endian. Varints are the protocol's
/// LEB128 variant: 7 value bits per byte, high bit as continuation, at most
/// 5 bytes for 32-bit values.
#[derive(Debug, Default, Clone)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn write_var_u32(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Signed varint: two's-complement bits, same continuation scheme, so
    /// negative values always take 5 bytes.
    #[allow(clippy::cast_sign_loss)]
    pub fn write_var_i32(&mut self, value: i32) {
        self.write_var_u32(value as u32);
    }

    /// Varint byte length followed by UTF-8 bytes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_str(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.write_var_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
    }

    /// UUID as most-significant then least-significant 64 bits, big-endian.
    pub fn write_uuid_bits(&mut self, msb: u64, lsb: u64) {
        self.buf.extend_from_slice(&msb.to_be_bytes());
        self.buf.extend_from_slice(&lsb.to_be_bytes());
    }

    /// Rotation angle in degrees as a single byte: `angle * 256 / 360`,
    /// wrapped by the narrowing cast rather than clamped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_angle(&mut self, degrees: f32) {
        let scaled = (degrees * 256.0 / 360.0) as i32;
        self.buf.push(scaled as u8);
    }

    /// Fixed-point coordinate: `floor(value * 32)` as a big-endian i32, the
    /// 1/32-block grid legacy spawn and teleport layouts use.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_fixed_point(&mut self, value: f64) {
        self.write_i32((value * 32.0).floor() as i32);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

/// Encoded length of a varint without writing it.
#[must_use]
pub const fn var_u32_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x001F_FFFF => 3,
        0x0020_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Reads a varint from the front of `buf`, returning the value and the
/// number of bytes consumed.
pub fn read_var_u32(buf: &[u8]) -> WireResult<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if i >= VAR_INT_MAX_BYTES {
            return Err(WireError::VarIntTooLong);
        }
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(WireError::VarIntTruncated { read: buf.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var_u32_bytes(value: u32) -> Vec<u8> {
        let mut writer = PacketWriter::new();
        writer.write_var_u32(value);
        writer.into_bytes()
    }

    #[test]
    fn var_u32_known_vectors() {
        assert_eq!(var_u32_bytes(0), vec![0x00]);
        assert_eq!(var_u32_bytes(1), vec![0x01]);
        assert_eq!(var_u32_bytes(127), vec![0x7F]);
        assert_eq!(var_u32_bytes(128), vec![0x80, 0x01]);
        assert_eq!(var_u32_bytes(300), vec![0xAC, 0x02]);
        assert_eq!(var_u32_bytes(25565), vec![0xDD, 0xC7, 0x01]);
        assert_eq!(var_u32_bytes(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn var_i32_negative_takes_five_bytes() {
        let mut writer = PacketWriter::new();
        writer.write_var_i32(-1);
        assert_eq!(writer.into_bytes(), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn var_u32_len_matches_encoding() {
        for value in [0, 127, 128, 16383, 16384, 2_097_151, 2_097_152, u32::MAX] {
            assert_eq!(
                var_u32_len(value),
                var_u32_bytes(value).len(),
                "length mismatch for {value}"
            );
        }
    }

    #[test]
    fn read_var_u32_roundtrip() {
        for value in [0u32, 1, 127, 128, 300, 25565, u32::MAX] {
            let bytes = var_u32_bytes(value);
            let (read, consumed) = read_var_u32(&bytes).unwrap();
            assert_eq!(read, value);
            assert_eq!(consumed, bytes.len());
        }
    }

    #[test]
    fn read_var_u32_trailing_bytes_ignored() {
        let (value, consumed) = read_var_u32(&[0x7F, 0xAA, 0xBB]).unwrap();
        assert_eq!(value, 127);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn read_var_u32_too_long() {
        let err = read_var_u32(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).unwrap_err();
        assert_eq!(err, WireError::VarIntTooLong);
    }

    #[test]
    fn read_var_u32_truncated() {
        let err = read_var_u32(&[0x80, 0x80]).unwrap_err();
        assert_eq!(err, WireError::VarIntTruncated { read: 2 });
    }

    #[test]
    fn read_var_u32_empty() {
        let err = read_var_u32(&[]).unwrap_err();
        assert_eq!(err, WireError::VarIntTruncated { read: 0 });
    }

    #[test]
    fn angle_quadrants() {
        let mut writer = PacketWriter::new();
        writer.write_angle(0.0);
        writer.write_angle(90.0);
        writer.write_angle(180.0);
        writer.write_angle(270.0);
        writer.write_angle(360.0);
        assert_eq!(writer.into_bytes(), vec![0, 64, 128, 192, 0]);
    }

    #[test]
    fn angle_negative_wraps() {
        let mut writer = PacketWriter::new();
        writer.write_angle(-90.0);
        assert_eq!(writer.into_bytes(), vec![192]);
    }

    #[test]
    fn fixed_point_floors_on_the_32_grid() {
        let mut writer = PacketWriter::new();
        writer.write_fixed_point(1.0);
        writer.write_fixed_point(-0.5);
        writer.write_fixed_point(2.53125);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[0..4], &32i32.to_be_bytes());
        assert_eq!(&bytes[4..8], &(-16i32).to_be_bytes());
        assert_eq!(&bytes[8..12], &81i32.to_be_bytes());
    }

    #[test]
    fn string_is_length_prefixed_utf8() {
        let mut writer = PacketWriter::new();
        writer.write_str("hi");
        assert_eq!(writer.into_bytes(), vec![0x02, b'h', b'i']);
    }

    #[test]
    fn uuid_bits_big_endian() {
        let mut writer = PacketWriter::new();
        writer.write_uuid_bits(0x0102_0304_0506_0708, 0x090A_0B0C_0D0E_0F10);
        assert_eq!(
            writer.into_bytes(),
            (1u8..=16).collect::<Vec<u8>>(),
            "sixteen ascending bytes"
        );
    }

    #[test]
    fn i16_big_endian() {
        let mut writer = PacketWriter::new();
        writer.write_i16(-2);
        assert_eq!(writer.into_bytes(), vec![0xFF, 0xFE]);
    }

    #[test]
    fn bool_is_single_byte() {
        let mut writer = PacketWriter::new();
        writer.write_bool(true);
        writer.write_bool(false);
        assert_eq!(writer.into_bytes(), vec![1, 0]);
    }
}
