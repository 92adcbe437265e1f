// src/command/builder.rs

//! Forward-only byte buffer used by every encoder.
//!
//! Printer command streams are written strictly front to back: headers
//! precede payloads and nothing is patched afterwards, so the builder offers
//! append operations only.

use crate::utils::error::{CodecError, Result};
use byteorder::{ByteOrder, LittleEndian};

/// An append-only byte buffer with chaining helpers for command framing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuilder {
    buffer: Vec<u8>,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CommandBuilder {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn append_byte(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    /// Appends the low 8 bits of `value`.
    pub fn append_int(&mut self, value: i32) -> &mut Self {
        self.buffer.push((value & 0xFF) as u8);
        self
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Appends a 16-bit value low byte first (`nL nH`).
    pub fn append_u16_le(&mut self, value: u16) -> &mut Self {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.buffer.extend_from_slice(&buf);
        self
    }

    /// Appends `value` as a little-endian 16-bit field, failing if it does
    /// not fit. `field` names the value in the error.
    pub fn append_u16_le_checked(&mut self, value: usize, field: &str) -> Result<&mut Self> {
        let value = u16::try_from(value)
            .map_err(|_| CodecError::EncodingError(format!("{} {} (max 65535)", field, value)))?;
        Ok(self.append_u16_le(value))
    }

    /// Appends `value` as a single byte, failing if it does not fit.
    pub fn append_u8_checked(&mut self, value: i64, field: &str) -> Result<&mut Self> {
        let value = u8::try_from(value)
            .map_err(|_| CodecError::EncodingError(format!("{} {} (range 0-255)", field, value)))?;
        Ok(self.append_byte(value))
    }

    /// Appends an ASCII string. Any non-ASCII content is an `EncodingError`
    /// naming the string.
    pub fn append_ascii(&mut self, text: &str) -> Result<&mut Self> {
        if !text.is_ascii() {
            return Err(CodecError::EncodingError(format!("non-ASCII text {:?}", text)));
        }
        self.buffer.extend_from_slice(text.as_bytes());
        Ok(self)
    }

    /// Appends the decimal text form of an integer.
    pub fn append_decimal(&mut self, value: i64) -> &mut Self {
        self.buffer.extend_from_slice(value.to_string().as_bytes());
        self
    }

    /// Appends upper-case hexadecimal text for `bytes`.
    pub fn append_hex(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(hex::encode_upper(bytes).as_bytes());
        self
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the builder, yielding the finished command.
    pub fn finish(self) -> EncodedCommand {
        EncodedCommand(self.buffer)
    }
}

/// A finished printer command stream, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedCommand(Vec<u8>);

impl EncodedCommand {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncodedCommand {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<EncodedCommand> for Vec<u8> {
    fn from(cmd: EncodedCommand) -> Self {
        cmd.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_chain_in_order() {
        let mut b = CommandBuilder::new();
        b.append_byte(0x1D).append_bytes(b"v0").append_int(0x100).append_u16_le(0x0102);
        assert_eq!(b.as_bytes(), &[0x1D, b'v', b'0', 0x00, 0x02, 0x01]);
    }

    #[test]
    fn append_int_masks_to_a_byte() {
        let mut b = CommandBuilder::new();
        b.append_int(-1).append_int(300);
        assert_eq!(b.as_bytes(), &[0xFF, 44]);
    }

    #[test]
    fn checked_u16_rejects_overflow() {
        let mut b = CommandBuilder::new();
        b.append_u16_le_checked(65535, "width").unwrap();
        let err = b.append_u16_le_checked(65536, "width").unwrap_err();
        assert!(matches!(err, CodecError::EncodingError(ref m) if m.contains("65536")));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn checked_u8_rejects_out_of_range() {
        let mut b = CommandBuilder::new();
        assert!(b.append_u8_checked(255, "density").is_ok());
        assert!(b.append_u8_checked(-1, "density").is_err());
        assert!(b.append_u8_checked(256, "density").is_err());
    }

    #[test]
    fn ascii_rejects_non_ascii_and_names_it() {
        let mut b = CommandBuilder::new();
        b.append_ascii("~LOGO;").unwrap();
        let err = b.append_ascii("logö").unwrap_err();
        assert!(err.to_string().contains("logö"));
        assert_eq!(b.as_bytes(), b"~LOGO;");
    }

    #[test]
    fn decimal_and_hex_are_text() {
        let mut b = CommandBuilder::new();
        b.append_decimal(-12).append_hex(&[0xAB, 0x01]);
        assert_eq!(b.finish().as_bytes(), b"-12AB01");
    }
}
