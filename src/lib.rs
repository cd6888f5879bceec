// TRS trace set reader and writer
// Main library entry point

pub mod core;

// Re-export main types
pub use core::config::ReaderConfig;
pub use core::constants::{ParameterType, SampleCoding, KEY, INPUT, LEGACY_DATA, OUTPUT, SAMPLES, TITLE};
pub use core::definition::{ParameterDefinition, TraceParameterDefinitionMap};
pub use core::error::{Result, TrsError};
pub use core::metadata::{Diagnostic, MetaValue, PutOutcome, TrsMetaData};
pub use core::parameter::{Ref, TraceParameter};
pub use core::parameter_map::{Access, MapValue, ParameterMap, TraceParameterMap};
pub use core::tags::{TagType, TrsTag};
pub use core::trace::Trace;
pub use core::trace_set::{Mode, TraceSet};
pub use core::traceset_parameters::{TraceSetParameter, TraceSetParameterMap};
pub use core::typed::ParameterValue;
