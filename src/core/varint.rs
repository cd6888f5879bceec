// Variable-width length field used by the header TLV records
//
// 0x00..=0x7F is stored as a single byte. Larger values are stored as a
// control byte 0x80 | n followed by n little-endian bytes.

use crate::core::bytes::ByteReader;
use crate::core::constants::MAX_LENGTH;
use crate::core::error::{Result, TrsError};
use std::io::Write;

const LONG_FORM: u8 = 0x80;
const SHORT_FORM_MAX: u64 = 0x7F;

pub fn encode_length(length: u64) -> Vec<u8> {
    if length <= SHORT_FORM_MAX {
        return vec![length as u8];
    }
    let n = (64 - length.leading_zeros() as usize).div_ceil(8);
    let mut out = Vec::with_capacity(n + 1);
    out.push(LONG_FORM | n as u8);
    out.extend_from_slice(&length.to_le_bytes()[..n]);
    out
}

pub fn write_length<W: Write>(writer: &mut W, length: u64) -> Result<()> {
    writer.write_all(&encode_length(length))?;
    Ok(())
}

/// Decodes a length without range validation. Used to skip records whose tag is unknown.
pub fn read_length_unchecked(reader: &mut ByteReader<'_>) -> Result<u64> {
    let first = reader.read_u8()?;
    if first & LONG_FORM == 0 {
        return Ok(u64::from(first));
    }
    let n = usize::from(first & !LONG_FORM);
    reader.read_uint(n)
}

/// Decodes a length and checks it lies within [0, 0xFFFF].
pub fn read_length(reader: &mut ByteReader<'_>) -> Result<usize> {
    let length = read_length_unchecked(reader)?;
    check_length(length)
}

pub(crate) fn check_length(length: u64) -> Result<usize> {
    if length > MAX_LENGTH as u64 {
        return Err(TrsError::format(format!(
            "length field has value '{:X}', which is not between 0 and 0xffff",
            length
        )));
    }
    Ok(length as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<usize> {
        read_length(&mut ByteReader::new(bytes))
    }

    #[test]
    fn test_round_trip_boundaries() {
        for length in [0u64, 1, 0x7F, 0x80, 0xFF, 0x1000, 0xFFFF] {
            let encoded = encode_length(length);
            assert_eq!(decode(&encoded).unwrap() as u64, length, "length {:#X}", length);
        }
    }

    #[test]
    fn test_exact_bytes() {
        assert_eq!(encode_length(0x7F), vec![0x7F]);
        assert_eq!(encode_length(0x80), vec![0x81, 0x80]);
        assert_eq!(encode_length(0xFF), vec![0x81, 0xFF]);
        assert_eq!(encode_length(0x1000), vec![0x82, 0x00, 0x10]);
        assert_eq!(encode_length(0xFFFF), vec![0x82, 0xFF, 0xFF]);
    }

    #[test]
    fn test_rejects_lengths_above_limit() {
        let encoded = encode_length(0x10000);
        assert_eq!(encoded, vec![0x83, 0x00, 0x00, 0x01]);
        assert!(decode(&encoded).unwrap_err().is_format());
        // the unchecked variant still decodes it so unknown records can be skipped
        let raw = read_length_unchecked(&mut ByteReader::new(&encoded)).unwrap();
        assert_eq!(raw, 0x10000);
    }

    #[test]
    fn test_truncated_long_form() {
        assert!(decode(&[0x82, 0x01]).unwrap_err().is_format());
    }
}
