// Little-endian byte cursor over a borrowed buffer

use crate::core::constants::MAX_LENGTH;
use crate::core::error::{Result, TrsError};
use std::io::Write;

/// Sequential reader over a byte slice. Running out of bytes is a format error,
/// since every caller is parsing a structure whose size the file declared.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(TrsError::format(format!(
                "unexpected end of data: needed {} bytes but only {} remain",
                n,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads an unsigned little-endian integer stored in `width` bytes (at most 8).
    pub fn read_uint(&mut self, width: usize) -> Result<u64> {
        if width > 8 {
            return Err(TrsError::format(format!(
                "integer field of {} bytes does not fit in 64 bits",
                width
            )));
        }
        let bytes = self.take(width)?;
        Ok(bytes
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | (u64::from(*b) << (8 * i))))
    }

    /// Reads a `u16` byte count followed by that many UTF-8 bytes.
    pub fn read_name(&mut self) -> Result<String> {
        let len = usize::from(self.read_u16()?);
        let bytes = self.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// Writes `name` as a `u16` byte count followed by its UTF-8 bytes.
pub fn write_name<W: Write>(writer: &mut W, name: &str) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() > MAX_LENGTH {
        return Err(TrsError::format(format!(
            "parameter name of {} bytes exceeds maximum length ({})",
            bytes.len(),
            MAX_LENGTH
        )));
    }
    writer.write_all(&(bytes.len() as u16).to_le_bytes())?;
    writer.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x34, 0x12, 0x01, 0x02, 0x03];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_uint(3).unwrap(), 0x030201);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_short_read_is_format_error() {
        let data = [0x01];
        let mut reader = ByteReader::new(&data);
        let err = reader.read_u16().unwrap_err();
        assert!(err.is_format());
        // a failed read does not advance the cursor
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_name_round_trip() {
        let mut out = Vec::new();
        write_name(&mut out, "씨브").unwrap();
        assert_eq!(&out[..2], &[6, 0]);
        assert_eq!(ByteReader::new(&out).read_name().unwrap(), "씨브");
    }

    #[test]
    fn test_oversized_name_rejected() {
        let name = "X".repeat(MAX_LENGTH + 1);
        assert!(write_name(&mut Vec::new(), &name).unwrap_err().is_format());
    }
}
