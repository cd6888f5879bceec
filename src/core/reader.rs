// Read session over a memory-mapped window of a TRS file

use crate::core::config::ReaderConfig;
use crate::core::constants::LEGACY_DATA;
use crate::core::encoding::decode_samples;
use crate::core::error::{Result, TrsError};
use crate::core::format::RecordLayout;
use crate::core::header::read_metadata;
use crate::core::metadata::TrsMetaData;
use crate::core::parameter::TraceParameter;
use crate::core::parameter_map::TraceParameterMap;
use crate::core::tags::TrsTag;
use crate::core::text::read_title;
use crate::core::trace::Trace;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// A read-only mapping of `[start, start + map.len())` of the file.
struct Window {
    map: Mmap,
    start: u64,
}

impl Window {
    fn map(file: &File, start: u64, len: u64) -> Result<Self> {
        let len = usize::try_from(len).map_err(|_| {
            TrsError::argument(format!("window of {} bytes cannot be mapped on this platform", len))
        })?;
        // SAFETY: the mapping is read-only and owned by this session; the file is
        // not written through this process while the session is open.
        let map = unsafe { MmapOptions::new().offset(start).len(len).map(file)? };
        Ok(Self { map, start })
    }

    fn end(&self) -> u64 {
        self.start + self.map.len() as u64
    }

    fn contains(&self, start: u64, end: u64) -> bool {
        self.start <= start && end <= self.end()
    }

    fn slice(&self, start: u64, len: usize) -> &[u8] {
        let from = (start - self.start) as usize;
        &self.map[from..from + len]
    }
}

pub(crate) struct ReadSession {
    file: File,
    file_size: u64,
    header_size: u64,
    max_window_size: u64,
    window: Window,
}

impl ReadSession {
    /// Maps the first window of `path` and parses the header from it.
    pub fn open(path: &Path, config: &ReaderConfig) -> Result<(Self, TrsMetaData)> {
        config.validate()?;
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let window = Window::map(&file, 0, file_size.min(config.max_window_size))?;

        let (metadata, header_size) = read_metadata(&window.map).map_err(|e| {
            if window.end() < file_size {
                TrsError::format(format!(
                    "{} (the header must fit in the first read window of {} bytes)",
                    e,
                    window.map.len()
                ))
            } else {
                e
            }
        })?;
        debug!(
            "opened {} ({} bytes, header {} bytes)",
            path.display(),
            file_size,
            header_size
        );

        let session = Self {
            file,
            file_size,
            header_size: header_size as u64,
            max_window_size: config.max_window_size,
            window,
        };
        Ok((session, metadata))
    }

    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    pub fn get(&mut self, index: usize, metadata: &TrsMetaData) -> Result<Trace> {
        let layout = RecordLayout::from_metadata(metadata)?;
        let record_size = layout.record_size()?;
        let trace_count = u64::try_from(metadata.get_int(TrsTag::NumberOfTraces)?).unwrap_or(0);
        if index as u64 >= trace_count {
            return Err(TrsError::argument(format!(
                "Requested trace index ({}) is larger than the total number of available traces ({}).",
                index, trace_count
            )));
        }

        let expected = record_size
            .checked_mul(trace_count)
            .and_then(|n| n.checked_add(self.header_size));
        if expected != Some(self.file_size) {
            return Err(TrsError::Consistency {
                file_size: self.file_size,
                header_size: self.header_size,
                record_size,
                trace_count,
            });
        }

        let start = self.header_size + index as u64 * record_size;
        self.move_window_if_necessary(start, record_size)?;
        let record = self.window.slice(start, record_size as usize);

        let (title_bytes, rest) = record.split_at(layout.title_space);
        let (parameter_bytes, sample_bytes) = rest.split_at(layout.parameter_size);

        let mut title = read_title(title_bytes);
        if title.trim().is_empty() {
            title = format!("{} {}", metadata.get_string(TrsTag::GlobalTitle)?, index);
        }

        let parameters = if layout.legacy {
            let mut legacy = TraceParameterMap::new();
            if !parameter_bytes.is_empty() {
                legacy.put(LEGACY_DATA, TraceParameter::Byte(parameter_bytes.to_vec()))?;
            }
            legacy.into_read_only()
        } else {
            TraceParameterMap::deserialize(parameter_bytes, metadata.trace_parameter_definitions())?
        };

        let samples = decode_samples(sample_bytes, layout.coding, layout.sample_count)?;
        Ok(Trace::with_title(title, samples, parameters))
    }

    fn move_window_if_necessary(&mut self, start: u64, record_size: u64) -> Result<()> {
        let end = start + record_size;
        if self.window.contains(start, end) {
            return Ok(());
        }
        let len = (self.file_size - start).min(self.max_window_size.max(record_size));
        debug!("remapping read window to [{}, {})", start, start + len);
        self.window = Window::map(&self.file, start, len)?;
        Ok(())
    }

    /// Unmaps the window and closes the file.
    pub fn close(self) {
        let Self { file, window, .. } = self;
        drop(window);
        drop(file);
    }
}
