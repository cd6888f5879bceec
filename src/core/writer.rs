// Write session: speculative header, appended records, header rewrite on close

use crate::core::constants::{SampleCoding, LEGACY_DATA, MAX_LENGTH, TRS_VERSION_CURRENT};
use crate::core::definition::TraceParameterDefinitionMap;
use crate::core::encoding::encode_samples;
use crate::core::error::{Result, TrsError};
use crate::core::format::{is_legacy, RecordLayout};
use crate::core::header::write_metadata;
use crate::core::metadata::TrsMetaData;
use crate::core::parameter::TraceParameter;
use crate::core::parameter_map::TraceParameterMap;
use crate::core::tags::TrsTag;
use crate::core::text::{fit_utf8, truncate_utf8};
use crate::core::trace::Trace;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) struct WriteSession {
    path: PathBuf,
    out: BufWriter<File>,
    /// Locked by the first added trace.
    layout: Option<RecordLayout>,
}

impl WriteSession {
    /// Creates (or truncates) `path`. The metadata is marked as the current format
    /// version unless it already carries a version, and its trace count restarts at 0.
    pub fn create(path: &Path, metadata: &mut TrsMetaData) -> Result<Self> {
        metadata.put_with(TrsTag::TrsVersion, TRS_VERSION_CURRENT, false)?;
        metadata.put(TrsTag::NumberOfTraces, 0)?;
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            layout: None,
        })
    }

    pub fn add(&mut self, trace: &mut Trace, metadata: &mut TrsMetaData) -> Result<()> {
        let (record, staged) = match self.layout {
            Some(layout) => (build_record(trace, metadata, &layout)?, None),
            None => {
                let mut staged = metadata.clone();
                let layout = lock_shape(trace, &mut staged)?;
                let record = build_record(trace, &staged, &layout)?;
                write_metadata(&mut self.out, &mut staged)?;
                self.layout = Some(layout);
                (record, Some(staged))
            }
        };
        if let Some(staged) = staged {
            *metadata = staged;
        }

        self.out.write_all(&record.bytes)?;
        record.apply(trace);
        trace.set_trace_set_path(&self.path);

        let count = metadata.get_int(TrsTag::NumberOfTraces)?;
        metadata.put(TrsTag::NumberOfTraces, count + 1)?;
        Ok(())
    }

    /// Rewrites the header with the final metadata and releases the file.
    /// The file is closed even if the rewrite fails.
    pub fn close(mut self, metadata: &mut TrsMetaData) -> Result<()> {
        let result = self.finish(metadata);
        let Self { path, out, .. } = self;
        match out.into_inner() {
            Ok(file) => drop(file),
            Err(e) => {
                let (error, _) = e.into_parts();
                if result.is_ok() {
                    return Err(error.into());
                }
            }
        }
        debug!("closed {}", path.display());
        result
    }

    fn finish(&mut self, metadata: &mut TrsMetaData) -> Result<()> {
        self.out.seek(SeekFrom::Start(0))?;
        write_metadata(&mut self.out, metadata)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Derives the record shape from the first trace. Values the caller already set
/// in the metadata are kept.
fn lock_shape(trace: &Trace, metadata: &mut TrsMetaData) -> Result<RecordLayout> {
    let coding = trace.preferred_coding();
    if coding == SampleCoding::Illegal {
        return Err(TrsError::format(
            "Illegal sample encoding: the trace contains NaN or infinite samples",
        ));
    }

    let legacy = is_legacy(metadata)?;
    let data_length = if legacy {
        trace.data().map_or(0, |d| d.len())
    } else {
        let definitions = TraceParameterDefinitionMap::create_from(trace.parameters())?;
        let size = definitions.total_size();
        metadata.put(TrsTag::TraceParameterDefinitions, definitions)?;
        size
    };
    if data_length > MAX_LENGTH {
        return Err(TrsError::format(format!(
            "trace data of {} bytes exceeds the maximum of {} bytes",
            data_length, MAX_LENGTH
        )));
    }

    let title_space = truncate_utf8(trace.title(), usize::from(u8::MAX)).len();
    metadata.put_with(TrsTag::NumberOfSamples, to_i32(trace.number_of_samples())?, false)?;
    // typed files size the parameter block from the definitions, so DATA_LENGTH must follow them
    metadata.put_with(TrsTag::DataLength, data_length as i32, !legacy)?;
    metadata.put_with(TrsTag::TitleSpace, title_space as i32, false)?;
    metadata.put_with(
        TrsTag::SampleCoding,
        i32::from(coding.value()),
        false,
    )?;
    RecordLayout::from_metadata(metadata)
}

fn to_i32(value: usize) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| TrsError::argument(format!("{} does not fit in a TRS header field", value)))
}

/// A validated record and the fitted values to hand back to its trace once it is written.
#[derive(Debug)]
struct Record {
    bytes: Vec<u8>,
    title: String,
    parameters: Option<TraceParameterMap>,
}

impl Record {
    fn apply(self, trace: &mut Trace) {
        trace.set_title(self.title);
        if let Some(parameters) = self.parameters {
            trace.set_parameters(parameters);
        }
    }
}

/// Checks the shape of `trace` against the locked layout and returns the record bytes.
/// `trace` itself is left untouched.
fn build_record(trace: &Trace, metadata: &TrsMetaData, layout: &RecordLayout) -> Result<Record> {
    if trace.number_of_samples() != layout.sample_count {
        return Err(TrsError::argument(format!(
            "All traces in a set need to be the same length, but current trace length ({}) differs from the previous trace(s) ({})",
            trace.number_of_samples(),
            layout.sample_count
        )));
    }

    let title = fit_utf8(trace.title(), layout.title_space);
    let mut bytes = Vec::with_capacity(usize::try_from(layout.record_size()?).unwrap_or(0));
    bytes.extend_from_slice(title.as_bytes());

    let mut fitted_parameters = None;
    if layout.legacy {
        let data = legacy_data(trace.parameters())?;
        check_data_length(data.len(), layout.parameter_size)?;
        bytes.extend_from_slice(&data);
    } else {
        let definitions = metadata.trace_parameter_definitions();
        fitted_parameters = fit_string_parameters(trace.parameters(), definitions)?;
        let parameters = fitted_parameters.as_ref().unwrap_or(trace.parameters());
        check_data_length(parameters.serialized_size(), layout.parameter_size)?;
        for (name, definition) in definitions.iter() {
            let parameter = parameters.get(name).ok_or_else(|| {
                TrsError::argument(format!(
                    "Parameter {} is defined in the header, but missing from the trace",
                    name
                ))
            })?;
            if parameter.param_type() != definition.param_type
                || parameter.len() != usize::from(definition.length)
            {
                return Err(TrsError::argument(format!(
                    "Parameter {} ({} x {}) does not match its header definition ({} x {})",
                    name,
                    parameter.param_type().name(),
                    parameter.len(),
                    definition.param_type.name(),
                    definition.length
                )));
            }
            parameter.serialize(&mut bytes)?;
        }
    }

    bytes.extend_from_slice(&encode_samples(trace.samples(), layout.coding)?);
    Ok(Record {
        bytes,
        title: truncate_utf8(trace.title(), layout.title_space).to_string(),
        parameters: fitted_parameters,
    })
}

fn check_data_length(actual: usize, locked: usize) -> Result<()> {
    if actual != locked {
        return Err(TrsError::argument(format!(
            "All traces in a set need to have the same data length, but current trace data length ({}) differs from the previous trace(s) ({})",
            actual, locked
        )));
    }
    Ok(())
}

fn legacy_data(parameters: &TraceParameterMap) -> Result<Vec<u8>> {
    if let Some(name) = parameters.keys().find(|k| *k != LEGACY_DATA) {
        return Err(TrsError::argument(format!(
            "Parameter {} is saved in the trace, but was not found in the header definition",
            name
        )));
    }
    Ok(parameters.get_value::<Vec<u8>>(LEGACY_DATA)?.unwrap_or_default())
}

/// Copies `parameters` with every string padded or truncated to the byte length its
/// definition fixes. `None` when nothing needs fitting.
fn fit_string_parameters(
    parameters: &TraceParameterMap,
    definitions: &TraceParameterDefinitionMap,
) -> Result<Option<TraceParameterMap>> {
    if let Some(name) = parameters.keys().find(|k| !definitions.contains_key(k)) {
        return Err(TrsError::argument(format!(
            "Parameter {} is saved in the trace, but was not found in the header definition",
            name
        )));
    }

    let mut fitted = Vec::new();
    for (name, definition) in definitions.iter() {
        if let Some(TraceParameter::String(value)) = parameters.get(name) {
            let budget = usize::from(definition.length);
            if value.len() != budget {
                fitted.push((name.to_string(), fit_utf8(value, budget)));
            }
        }
    }
    if fitted.is_empty() {
        return Ok(None);
    }

    let mut copy = parameters.to_mutable();
    for (name, value) in fitted {
        copy.put(name, TraceParameter::String(value))?;
    }
    Ok(Some(copy))
}
