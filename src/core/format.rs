// Shape of a trace record as declared by the header

use crate::core::constants::{SampleCoding, TRS_VERSION_LEGACY};
use crate::core::error::{Result, TrsError};
use crate::core::metadata::TrsMetaData;
use crate::core::tags::TrsTag;

/// Byte layout shared by every record of a trace set: title, parameter block, samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub title_space: usize,
    /// Per-trace parameter block, or the raw data blob for legacy files.
    pub parameter_size: usize,
    pub sample_count: usize,
    pub coding: SampleCoding,
    pub legacy: bool,
}

fn non_negative(metadata: &TrsMetaData, tag: TrsTag) -> Result<usize> {
    let value = metadata.get_int(tag)?;
    usize::try_from(value).map_err(|_| {
        TrsError::format(format!("{:?} has negative value {}", tag, value))
    })
}

impl RecordLayout {
    pub fn from_metadata(metadata: &TrsMetaData) -> Result<Self> {
        let code = metadata.get_int(TrsTag::SampleCoding)?;
        let coding = u8::try_from(code)
            .ok()
            .and_then(SampleCoding::from_u8)
            .filter(|c| c.size().is_some())
            .ok_or_else(|| {
                TrsError::format(format!(
                    "Error reading TRS file: unknown sample coding '{}'",
                    code
                ))
            })?;

        let legacy = is_legacy(metadata)?;
        let parameter_size = if legacy {
            non_negative(metadata, TrsTag::DataLength)?
        } else {
            metadata.trace_parameter_definitions().total_size()
        };

        Ok(Self {
            title_space: non_negative(metadata, TrsTag::TitleSpace)?,
            parameter_size,
            sample_count: non_negative(metadata, TrsTag::NumberOfSamples)?,
            coding,
            legacy,
        })
    }

    pub fn sample_size(&self) -> u64 {
        self.coding.size().unwrap_or(0) as u64 * self.sample_count as u64
    }

    /// Bytes per record. Fails when the declared shape does not fit in a u64.
    pub fn record_size(&self) -> Result<u64> {
        (self.title_space as u64)
            .checked_add(self.parameter_size as u64)
            .and_then(|n| n.checked_add(self.sample_size()))
            .ok_or_else(|| TrsError::format("Error reading TRS file: record size overflows"))
    }
}

/// Files at version 1 or below store an untyped data blob instead of typed parameters.
pub fn is_legacy(metadata: &TrsMetaData) -> Result<bool> {
    Ok(metadata.get_int(TrsTag::TrsVersion)? <= TRS_VERSION_LEGACY)
}
