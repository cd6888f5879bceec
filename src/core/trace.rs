// A single trace record held in memory

use crate::core::constants::{SampleCoding, LEGACY_DATA};
use crate::core::encoding::preferred_coding;
use crate::core::error::Result;
use crate::core::parameter_map::TraceParameterMap;
use std::path::{Path, PathBuf};

/// One sample array plus its title and per-trace parameters.
///
/// Samples are owned by the trace. A trace read back from a file carries a
/// read-only parameter map and the path of the set it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    title: String,
    samples: Vec<f32>,
    parameters: TraceParameterMap,
    shift: i32,
    sample_frequency: f32,
    force_float: bool,
    trace_set_path: Option<PathBuf>,
}

impl Trace {
    pub fn new(samples: Vec<f32>) -> Self {
        Self::with_title(String::new(), samples, TraceParameterMap::new())
    }

    pub fn with_title(
        title: impl Into<String>,
        samples: Vec<f32>,
        parameters: TraceParameterMap,
    ) -> Self {
        Self {
            title: title.into(),
            samples,
            parameters,
            shift: 0,
            sample_frequency: 1.0,
            force_float: false,
            trace_set_path: None,
        }
    }

    /// A trace whose auxiliary data is an untyped blob, as stored by version 1 files.
    pub fn with_data(title: impl Into<String>, data: &[u8], samples: Vec<f32>) -> Result<Self> {
        let mut parameters = TraceParameterMap::new();
        if !data.is_empty() {
            parameters.put_value(LEGACY_DATA, data.to_vec())?;
        }
        Ok(Self::with_title(title, samples, parameters))
    }

    pub fn with_sample_frequency(mut self, sample_frequency: f32) -> Self {
        self.sample_frequency = sample_frequency;
        self
    }

    pub fn with_shift(mut self, shift: i32) -> Self {
        self.shift = shift;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn number_of_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn parameters(&self) -> &TraceParameterMap {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut TraceParameterMap {
        &mut self.parameters
    }

    /// The legacy data blob, if this trace has one.
    pub fn data(&self) -> Option<Vec<u8>> {
        self.parameters.get_value::<Vec<u8>>(LEGACY_DATA).ok().flatten()
    }

    pub fn shift(&self) -> i32 {
        self.shift
    }

    pub fn sample_frequency(&self) -> f32 {
        self.sample_frequency
    }

    /// Stores samples as 32-bit floats even if a narrower coding would be exact.
    pub fn force_float_coding(&mut self) {
        self.force_float = true;
    }

    pub fn preferred_coding(&self) -> SampleCoding {
        let coding = preferred_coding(&self.samples);
        if self.force_float && coding != SampleCoding::Illegal {
            SampleCoding::Float
        } else {
            coding
        }
    }

    /// Path of the trace set this trace was added to or read from.
    pub fn trace_set_path(&self) -> Option<&Path> {
        self.trace_set_path.as_deref()
    }

    pub(crate) fn set_trace_set_path(&mut self, path: &Path) {
        self.trace_set_path = Some(path.to_path_buf());
    }

    pub(crate) fn set_parameters(&mut self, parameters: TraceParameterMap) {
        self.parameters = parameters;
    }
}
