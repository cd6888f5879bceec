// Sample coding selection and conversion

use crate::core::constants::SampleCoding;
use crate::core::error::{Result, TrsError};

/// Picks the narrowest coding that stores every sample exactly.
///
/// Any NaN or infinite sample yields `Illegal`, which cannot be written.
pub fn preferred_coding(samples: &[f32]) -> SampleCoding {
    let mut min = 0f32;
    let mut max = 0f32;
    let mut is_real = false;

    for &s in samples {
        if !s.is_finite() {
            return SampleCoding::Illegal;
        }
        min = min.min(s);
        max = max.max(s);
        if s != (s as i32) as f32 {
            is_real = true;
        }
    }

    if is_real {
        SampleCoding::Float
    } else if max > f32::from(i16::MAX) || min < f32::from(i16::MIN) {
        SampleCoding::Int
    } else if max > f32::from(i8::MAX) || min < f32::from(i8::MIN) {
        SampleCoding::Short
    } else {
        SampleCoding::Byte
    }
}

fn too_small(name: &str) -> TrsError {
    TrsError::argument(format!("{} sample encoding too small", name))
}

/// Encodes samples little-endian. Integer codings require every sample to fit exactly.
pub fn encode_samples(samples: &[f32], coding: SampleCoding) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(samples.len() * coding.size().unwrap_or(0));

    match coding {
        SampleCoding::Illegal => return Err(TrsError::format("Illegal sample encoding")),
        SampleCoding::Byte => {
            for &s in samples {
                let v = s as i8;
                if f32::from(v) != s {
                    return Err(too_small("Byte"));
                }
                out.push(v as u8);
            }
        }
        SampleCoding::Short => {
            for &s in samples {
                let v = s as i16;
                if f32::from(v) != s {
                    return Err(too_small("Short"));
                }
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        SampleCoding::Int => {
            for &s in samples {
                let v = s as i32;
                if v as f32 != s {
                    return Err(too_small("Int"));
                }
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        SampleCoding::Float => {
            for &s in samples {
                out.extend_from_slice(&s.to_le_bytes());
            }
        }
    }
    Ok(out)
}

/// Decodes `count` samples from the start of `bytes`.
pub fn decode_samples(bytes: &[u8], coding: SampleCoding, count: usize) -> Result<Vec<f32>> {
    let width = coding.size().ok_or_else(|| {
        TrsError::format(format!(
            "Error reading TRS file: unknown sample coding '{}'",
            coding.value()
        ))
    })?;
    let needed = count * width;
    if bytes.len() < needed {
        return Err(TrsError::format(format!(
            "expected {} bytes of samples but found {}",
            needed,
            bytes.len()
        )));
    }
    let bytes = &bytes[..needed];

    let samples = match coding {
        SampleCoding::Byte => bytes.iter().map(|b| f32::from(*b as i8)).collect(),
        SampleCoding::Short => bytes
            .chunks_exact(2)
            .map(|c| f32::from(i16::from_le_bytes([c[0], c[1]])))
            .collect(),
        SampleCoding::Int => bytes
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f32)
            .collect(),
        SampleCoding::Float => bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        SampleCoding::Illegal => Vec::new(),
    };
    Ok(samples)
}
