// Global parameters serialized once in the header

use crate::core::bytes::{write_name, ByteReader};
use crate::core::constants::{ParameterType, MAX_LENGTH};
use crate::core::error::{Result, TrsError};
use crate::core::parameter::TraceParameter;
use crate::core::parameter_map::{MapValue, ParameterMap};
use crate::core::typed::{extract, ParameterValue};

/// A trace-set parameter carries its own type and element count on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSetParameter(pub TraceParameter);

impl TraceSetParameter {
    pub fn value(&self) -> &TraceParameter {
        &self.0
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<()> {
        let length = self.0.len();
        if length > MAX_LENGTH {
            return Err(TrsError::format(format!(
                "length of parameter ({}) exceeds maximum length ({})",
                length, MAX_LENGTH
            )));
        }
        out.push(self.0.param_type().value());
        out.extend_from_slice(&(length as u16).to_le_bytes());
        self.0.serialize(out)
    }

    fn deserialize(reader: &mut ByteReader<'_>) -> Result<Self> {
        let code = reader.read_u8()?;
        let param_type = ParameterType::from_u8(code)
            .ok_or_else(|| TrsError::format(format!("Unknown parameter type: {:#04X}", code)))?;
        let length = usize::from(reader.read_u16()?);
        TraceParameter::deserialize(reader, param_type, length).map(TraceSetParameter)
    }
}

impl MapValue for TraceSetParameter {
    fn validate(&self, key: &str) -> Result<()> {
        self.0.check_not_empty(key)
    }
}

impl From<TraceParameter> for TraceSetParameter {
    fn from(value: TraceParameter) -> Self {
        TraceSetParameter(value)
    }
}

pub type TraceSetParameterMap = ParameterMap<TraceSetParameter>;

impl ParameterMap<TraceSetParameter> {
    pub fn put_value<T: ParameterValue>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        let parameter = value.into_parameter()?;
        self.put(key, TraceSetParameter(parameter)).map(|_| ())
    }

    pub fn get_value<T: ParameterValue>(&self, key: &str) -> Result<Option<T>> {
        self.get(key).map(|p| extract(key, &p.0)).transpose()
    }

    pub fn require_value<T: ParameterValue>(&self, key: &str) -> Result<T> {
        self.get_value(key)?.ok_or_else(|| {
            TrsError::argument(format!("Parameter {} was not found in the trace set.", key))
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.len() > MAX_LENGTH {
            return Err(TrsError::format(format!(
                "too many trace set parameters ({})",
                self.len()
            )));
        }
        let mut out = Vec::new();
        out.extend_from_slice(&(self.len() as u16).to_le_bytes());
        for (name, parameter) in self.iter() {
            parameter.0.check_not_empty(name)?;
            write_name(&mut out, name)?;
            parameter.serialize(&mut out)?;
        }
        Ok(out)
    }

    /// Parses a trace-set parameter block. The result is read-only.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut result = Self::new();
        if !bytes.is_empty() {
            let mut reader = ByteReader::new(bytes);
            let count = reader.read_u16()?;
            for _ in 0..count {
                let name = reader.read_name()?;
                let parameter = TraceSetParameter::deserialize(&mut reader)?;
                result.put(name, parameter)?;
            }
        }
        Ok(result.into_read_only())
    }
}
