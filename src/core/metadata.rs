// Header metadata: one value per registered tag

use crate::core::definition::TraceParameterDefinitionMap;
use crate::core::error::{Result, TrsError};
use crate::core::tags::{TagDefault, TagType, TrsTag};
use crate::core::traceset_parameters::TraceSetParameterMap;
use std::fmt;
use tracing::warn;

/// A value held for a header tag.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    Str(String),
    TraceSetParameters(TraceSetParameterMap),
    TraceParameterDefinitions(TraceParameterDefinitionMap),
}

impl MetaValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            MetaValue::Int(_) => TagType::Int,
            MetaValue::Float(_) => TagType::Float,
            MetaValue::Bool(_) => TagType::Bool,
            MetaValue::Str(_) => TagType::String,
            MetaValue::TraceSetParameters(_) => TagType::TraceSetParameters,
            MetaValue::TraceParameterDefinitions(_) => TagType::TraceParameterDefinitions,
        }
    }

    fn from_default(tag: TrsTag) -> Self {
        match tag.descriptor().default {
            TagDefault::Int(v) => MetaValue::Int(v),
            TagDefault::Float(v) => MetaValue::Float(v),
            TagDefault::Bool(v) => MetaValue::Bool(v),
            TagDefault::Str(v) => MetaValue::Str(v.to_string()),
            TagDefault::EmptyBlock => match tag.tag_type() {
                TagType::TraceParameterDefinitions => {
                    MetaValue::TraceParameterDefinitions(TraceParameterDefinitionMap::new())
                }
                _ => MetaValue::TraceSetParameters(TraceSetParameterMap::new()),
            },
        }
    }

    /// Default comparison ignores the read-only flag of block values.
    fn equals_default(&self, tag: TrsTag) -> bool {
        match (self, tag.descriptor().default) {
            (MetaValue::Int(v), TagDefault::Int(d)) => *v == d,
            (MetaValue::Float(v), TagDefault::Float(d)) => v.to_bits() == d.to_bits(),
            (MetaValue::Bool(v), TagDefault::Bool(d)) => *v == d,
            (MetaValue::Str(v), TagDefault::Str(d)) => v == d,
            (MetaValue::TraceSetParameters(m), TagDefault::EmptyBlock) => m.is_empty(),
            (MetaValue::TraceParameterDefinitions(m), TagDefault::EmptyBlock) => m.is_empty(),
            _ => false,
        }
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        MetaValue::Int(v)
    }
}

impl From<f32> for MetaValue {
    fn from(v: f32) -> Self {
        MetaValue::Float(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Str(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Str(v.to_string())
    }
}

impl From<TraceSetParameterMap> for MetaValue {
    fn from(v: TraceSetParameterMap) -> Self {
        MetaValue::TraceSetParameters(v)
    }
}

impl From<TraceParameterDefinitionMap> for MetaValue {
    fn from(v: TraceParameterDefinitionMap) -> Self {
        MetaValue::TraceParameterDefinitions(v)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(v) => write!(f, "{}", v),
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Bool(v) => write!(f, "{}", v),
            MetaValue::Str(v) => write!(f, "{}", v),
            MetaValue::TraceSetParameters(m) => write!(f, "{} trace set parameter(s)", m.len()),
            MetaValue::TraceParameterDefinitions(m) => {
                write!(f, "{} trace parameter definition(s)", m.len())
            }
        }
    }
}

/// Soft events that do not fail the operation that raised them.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A write to a tag holding a non-default value was dropped.
    IgnoredOverwrite {
        tag: TrsTag,
        kept: String,
        rejected: String,
    },
    /// The header held a tag byte missing from the registry; its value was skipped.
    UnknownTag { value: u8, length: u64 },
    /// The header was written through a stream not positioned at the start.
    RewoundHeader { position: u64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IgnoredOverwrite { tag, kept, rejected } => write!(
                f,
                "{:?}: Ignoring new value ({}) because previously defined value is non-default ({}) and overwrite is disabled.",
                tag, rejected, kept
            ),
            Diagnostic::UnknownTag { value, length } => write!(
                f,
                "ignored unknown metadata tag '{:02X}' ({} bytes) while reading a TRS file",
                value, length
            ),
            Diagnostic::RewoundHeader { position } => write!(
                f,
                "The output stream is not at the start of the file (position {}). Rewinding stream.",
                position
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Stored,
    Ignored,
}

/// Every registered tag mapped to a value, starting from the compiled-in defaults.
#[derive(Debug, Clone)]
pub struct TrsMetaData {
    values: Vec<MetaValue>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for TrsMetaData {
    fn default() -> Self {
        Self {
            values: TrsTag::ALL.iter().map(|t| MetaValue::from_default(*t)).collect(),
            diagnostics: Vec::new(),
        }
    }
}

impl TrsMetaData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, overwriting any existing value.
    pub fn put(&mut self, tag: TrsTag, value: impl Into<MetaValue>) -> Result<()> {
        self.put_with(tag, value, true).map(|_| ())
    }

    /// Stores `value` if the tag still holds its default or `overwrite_non_default` is set.
    /// Otherwise the write is dropped and recorded as a diagnostic.
    pub fn put_with(
        &mut self,
        tag: TrsTag,
        value: impl Into<MetaValue>,
        overwrite_non_default: bool,
    ) -> Result<PutOutcome> {
        let value = value.into();
        if value.tag_type() != tag.tag_type() {
            return Err(TrsError::argument(format!(
                "Failed to add tag {:?}: Expected type ({:?}) does not match actual type ({:?}).",
                tag,
                tag.tag_type(),
                value.tag_type()
            )));
        }

        if self.has_default_value(tag) || overwrite_non_default {
            self.values[tag.index()] = value;
            return Ok(PutOutcome::Stored);
        }

        let diagnostic = Diagnostic::IgnoredOverwrite {
            tag,
            kept: self.get(tag).to_string(),
            rejected: value.to_string(),
        };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
        Ok(PutOutcome::Ignored)
    }

    pub fn get(&self, tag: TrsTag) -> &MetaValue {
        &self.values[tag.index()]
    }

    fn type_error(&self, tag: TrsTag, wanted: &str) -> TrsError {
        TrsError::argument(format!(
            "Tag {:?} holds a {:?} value, not {}",
            tag,
            self.get(tag).tag_type(),
            wanted
        ))
    }

    pub fn get_int(&self, tag: TrsTag) -> Result<i32> {
        match self.get(tag) {
            MetaValue::Int(v) => Ok(*v),
            _ => Err(self.type_error(tag, "an int")),
        }
    }

    pub fn get_float(&self, tag: TrsTag) -> Result<f32> {
        match self.get(tag) {
            MetaValue::Float(v) => Ok(*v),
            _ => Err(self.type_error(tag, "a float")),
        }
    }

    pub fn get_bool(&self, tag: TrsTag) -> Result<bool> {
        match self.get(tag) {
            MetaValue::Bool(v) => Ok(*v),
            _ => Err(self.type_error(tag, "a bool")),
        }
    }

    pub fn get_string(&self, tag: TrsTag) -> Result<&str> {
        match self.get(tag) {
            MetaValue::Str(v) => Ok(v),
            _ => Err(self.type_error(tag, "a string")),
        }
    }

    pub fn trace_set_parameters(&self) -> &TraceSetParameterMap {
        match self.get(TrsTag::TraceSetParameters) {
            MetaValue::TraceSetParameters(m) => m,
            _ => unreachable!("type checked on put"),
        }
    }

    pub fn trace_parameter_definitions(&self) -> &TraceParameterDefinitionMap {
        match self.get(TrsTag::TraceParameterDefinitions) {
            MetaValue::TraceParameterDefinitions(m) => m,
            _ => unreachable!("type checked on put"),
        }
    }

    pub fn has_default_value(&self, tag: TrsTag) -> bool {
        self.get(tag).equals_default(tag)
    }

    /// Tags whose value differs from the default, in registry order.
    pub fn non_default_tags(&self) -> impl Iterator<Item = TrsTag> + '_ {
        TrsTag::ALL
            .iter()
            .copied()
            .filter(|t| !self.has_default_value(*t))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Copy in which both parameter blocks are read-only.
    pub(crate) fn into_read_only(mut self) -> Self {
        let params = TraceSetParameterMap::read_only(self.trace_set_parameters());
        let definitions = TraceParameterDefinitionMap::read_only(self.trace_parameter_definitions());
        self.values[TrsTag::TraceSetParameters.index()] = MetaValue::TraceSetParameters(params);
        self.values[TrsTag::TraceParameterDefinitions.index()] =
            MetaValue::TraceParameterDefinitions(definitions);
        self
    }
}

impl fmt::Display for TrsMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in TrsTag::ALL {
            let d = tag.descriptor();
            writeln!(
                f,
                "{:?} (value={:X}, name={}, {}required, type={:?}, length={}, description={})",
                tag,
                d.value,
                d.name,
                if d.required { "" } else { "not " },
                d.tag_type,
                d.length,
                d.description
            )?;
            writeln!(f, "\tValue = {}", self.get(*tag))?;
        }
        Ok(())
    }
}
