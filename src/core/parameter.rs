// Typed parameter values carried per trace and per trace set

use crate::core::bytes::ByteReader;
use crate::core::constants::ParameterType;
use crate::core::error::{Result, TrsError};
use std::fmt;
use std::io::Write;

/// Index into an externally held table of values.
#[derive(Debug, Clone, Default)]
pub struct Ref {
    pub index: i32,
    pub name: String,
}

impl Ref {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            name: String::new(),
        }
    }
}

// Only the index is stored on disk, so only the index takes part in equality.
impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

/// A parameter value. Every variant except `String` is an array of at least one element;
/// a scalar is an array of length one.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceParameter {
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Long(Vec<i64>),
    Double(Vec<f64>),
    Bool(Vec<bool>),
    String(String),
    Ref(Vec<Ref>),
}

fn non_empty<T>(values: Vec<T>) -> Result<Vec<T>> {
    if values.is_empty() {
        return Err(TrsError::argument(
            "Array length must be positive and non-zero.",
        ));
    }
    Ok(values)
}

macro_rules! array_constructors {
    ($($ctor:ident => $variant:ident($elem:ty)),* $(,)?) => {
        impl TraceParameter {
            $(
                pub fn $ctor(values: Vec<$elem>) -> Result<Self> {
                    non_empty(values).map(TraceParameter::$variant)
                }
            )*
        }
    };
}

array_constructors! {
    bytes => Byte(u8),
    shorts => Short(i16),
    ints => Int(i32),
    floats => Float(f32),
    longs => Long(i64),
    doubles => Double(f64),
    bools => Bool(bool),
    refs => Ref(Ref),
}

impl TraceParameter {
    pub fn string(value: impl Into<String>) -> Self {
        TraceParameter::String(value.into())
    }

    pub fn param_type(&self) -> ParameterType {
        match self {
            TraceParameter::Byte(_) => ParameterType::Byte,
            TraceParameter::Short(_) => ParameterType::Short,
            TraceParameter::Int(_) => ParameterType::Int,
            TraceParameter::Float(_) => ParameterType::Float,
            TraceParameter::Long(_) => ParameterType::Long,
            TraceParameter::Double(_) => ParameterType::Double,
            TraceParameter::Bool(_) => ParameterType::Bool,
            TraceParameter::String(_) => ParameterType::String,
            TraceParameter::Ref(_) => ParameterType::Ref,
        }
    }

    /// Element count; for strings, the UTF-8 byte length.
    pub fn len(&self) -> usize {
        match self {
            TraceParameter::Byte(v) => v.len(),
            TraceParameter::Short(v) => v.len(),
            TraceParameter::Int(v) => v.len(),
            TraceParameter::Float(v) => v.len(),
            TraceParameter::Long(v) => v.len(),
            TraceParameter::Double(v) => v.len(),
            TraceParameter::Bool(v) => v.len(),
            TraceParameter::String(s) => s.len(),
            TraceParameter::Ref(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails for an array variant with no elements. Empty strings are allowed.
    pub fn check_not_empty(&self, key: &str) -> Result<()> {
        match self {
            TraceParameter::String(_) => Ok(()),
            _ if self.is_empty() => Err(TrsError::argument(format!(
                "Parameter {}: array length must be positive and non-zero.",
                key
            ))),
            _ => Ok(()),
        }
    }

    pub fn serialized_size(&self) -> usize {
        self.len() * self.param_type().byte_size()
    }

    /// Fails unless this parameter holds exactly one element. Strings are always scalar.
    pub fn check_scalar(&self) -> Result<()> {
        match self {
            TraceParameter::String(_) => Ok(()),
            _ if self.len() == 1 => Ok(()),
            _ => Err(TrsError::argument(format!(
                "Parameter represents an array value of length {}",
                self.len()
            ))),
        }
    }

    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            TraceParameter::Byte(v) => writer.write_all(v)?,
            TraceParameter::Short(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&x.to_le_bytes()))?,
            TraceParameter::Int(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&x.to_le_bytes()))?,
            TraceParameter::Float(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&x.to_le_bytes()))?,
            TraceParameter::Long(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&x.to_le_bytes()))?,
            TraceParameter::Double(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&x.to_le_bytes()))?,
            TraceParameter::Bool(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&[u8::from(*x)]))?,
            TraceParameter::String(s) => writer.write_all(s.as_bytes())?,
            TraceParameter::Ref(v) => v
                .iter()
                .try_for_each(|x| writer.write_all(&x.index.to_le_bytes()))?,
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        // writing into a Vec cannot fail
        let _ = self.serialize(&mut out);
        out
    }

    /// Reads `count` elements of `param_type`, consuming exactly `count * byte_size` bytes.
    pub fn deserialize(
        reader: &mut ByteReader<'_>,
        param_type: ParameterType,
        count: usize,
    ) -> Result<Self> {
        let expected = count * param_type.byte_size();
        if expected > reader.remaining() {
            return Err(TrsError::format(format!(
                "Error parsing {} parameter: Expected ({}) bytes but found ({})",
                param_type.name(),
                expected,
                reader.remaining()
            )));
        }
        let raw = reader.take(expected)?;

        if param_type == ParameterType::String {
            let text = String::from_utf8(raw.to_vec())?;
            return Ok(TraceParameter::String(text));
        }
        if count == 0 {
            return Err(TrsError::format(format!(
                "Error parsing {} parameter: zero-length arrays are not allowed",
                param_type.name()
            )));
        }

        let parameter = match param_type {
            ParameterType::Byte => TraceParameter::Byte(raw.to_vec()),
            ParameterType::Short => TraceParameter::Short(
                raw.chunks_exact(2)
                    .map(|c| i16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
            ParameterType::Int => TraceParameter::Int(
                raw.chunks_exact(4)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ParameterType::Float => TraceParameter::Float(
                raw.chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ParameterType::Long => TraceParameter::Long(
                raw.chunks_exact(8)
                    .map(|c| i64::from_le_bytes(le8(c)))
                    .collect(),
            ),
            ParameterType::Double => TraceParameter::Double(
                raw.chunks_exact(8)
                    .map(|c| f64::from_le_bytes(le8(c)))
                    .collect(),
            ),
            ParameterType::Bool => TraceParameter::Bool(raw.iter().map(|b| *b != 0).collect()),
            ParameterType::Ref => TraceParameter::Ref(
                raw.chunks_exact(4)
                    .map(|c| Ref::new(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                    .collect(),
            ),
            ParameterType::String => unreachable!("handled above"),
        };
        Ok(parameter)
    }
}

fn le8(c: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(c);
    out
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, "]")
}

impl fmt::Display for TraceParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceParameter::Byte(v) => v.iter().try_for_each(|b| write!(f, "{:02X}", b)),
            TraceParameter::Short(v) => write_list(f, v),
            TraceParameter::Int(v) => write_list(f, v),
            TraceParameter::Float(v) => write_list(f, v),
            TraceParameter::Long(v) => write_list(f, v),
            TraceParameter::Double(v) => write_list(f, v),
            TraceParameter::Bool(v) => write_list(f, v),
            TraceParameter::String(s) => write!(f, "{}", s),
            TraceParameter::Ref(v) => {
                let indices: Vec<i32> = v.iter().map(|r| r.index).collect();
                write_list(f, &indices)
            }
        }
    }
}
