// Per-trace parameter layout carried in the header

use crate::core::bytes::{write_name, ByteReader};
use crate::core::constants::{ParameterType, MAX_LENGTH};
use crate::core::error::{Result, TrsError};
use crate::core::parameter_map::{MapValue, ParameterMap, TraceParameterMap};

/// Where a named parameter lives inside the fixed-size per-trace parameter block.
/// `offset` is in bytes; `length` is an element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub param_type: ParameterType,
    pub offset: u16,
    pub length: u16,
}

impl ParameterDefinition {
    pub fn new(param_type: ParameterType, offset: u16, length: u16) -> Self {
        Self {
            param_type,
            offset,
            length,
        }
    }

    pub fn byte_size(&self) -> usize {
        usize::from(self.length) * self.param_type.byte_size()
    }

    fn serialize(&self, out: &mut Vec<u8>) {
        out.push(self.param_type.value());
        out.extend_from_slice(&self.length.to_le_bytes());
        out.extend_from_slice(&self.offset.to_le_bytes());
    }

    fn deserialize(reader: &mut ByteReader<'_>) -> Result<Self> {
        let code = reader.read_u8()?;
        let param_type = ParameterType::from_u8(code)
            .ok_or_else(|| TrsError::format(format!("Unknown parameter type: {:#04X}", code)))?;
        let length = reader.read_u16()?;
        let offset = reader.read_u16()?;
        Ok(Self::new(param_type, offset, length))
    }
}

impl MapValue for ParameterDefinition {}

pub type TraceParameterDefinitionMap = ParameterMap<ParameterDefinition>;

impl ParameterMap<ParameterDefinition> {
    /// Derives definitions from `parameters` in insertion order with cumulative offsets.
    pub fn create_from(parameters: &TraceParameterMap) -> Result<Self> {
        let mut definitions = Self::new();
        let mut offset = 0usize;
        for (name, parameter) in parameters.iter() {
            parameter.check_not_empty(name)?;
            if offset > MAX_LENGTH || parameter.len() > MAX_LENGTH {
                return Err(TrsError::format(format!(
                    "parameter `{}` does not fit in the trace parameter block (offset {}, length {})",
                    name,
                    offset,
                    parameter.len()
                )));
            }
            definitions.put(
                name,
                ParameterDefinition::new(
                    parameter.param_type(),
                    offset as u16,
                    parameter.len() as u16,
                ),
            )?;
            offset += parameter.serialized_size();
        }
        Ok(definitions)
    }

    /// Size in bytes of the per-trace parameter block these definitions describe.
    pub fn total_size(&self) -> usize {
        self.values().map(ParameterDefinition::byte_size).sum()
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.len() > MAX_LENGTH {
            return Err(TrsError::format(format!(
                "too many parameter definitions ({})",
                self.len()
            )));
        }
        let mut out = Vec::new();
        out.extend_from_slice(&(self.len() as u16).to_le_bytes());
        for (name, definition) in self.iter() {
            write_name(&mut out, name)?;
            definition.serialize(&mut out);
        }
        Ok(out)
    }

    /// Parses a definitions block. The result is read-only.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut result = Self::new();
        if !bytes.is_empty() {
            let mut reader = ByteReader::new(bytes);
            let count = reader.read_u16()?;
            for _ in 0..count {
                let name = reader.read_name()?;
                let definition = ParameterDefinition::deserialize(&mut reader)?;
                result.put(name, definition)?;
            }
        }
        Ok(result.into_read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters() -> TraceParameterMap {
        let mut map = TraceParameterMap::new();
        map.put_value("INPUT", vec![0u8; 16]).unwrap();
        map.put_value("COUNTER", 5i32).unwrap();
        map.put_value("LABEL", "ab").unwrap();
        map.put_value("WEIGHTS", vec![0.5f64, 1.5]).unwrap();
        map
    }

    #[test]
    fn test_create_from_assigns_cumulative_offsets() {
        let definitions = TraceParameterDefinitionMap::create_from(&parameters()).unwrap();
        let offsets: Vec<(u16, u16)> = definitions.values().map(|d| (d.offset, d.length)).collect();
        assert_eq!(offsets, vec![(0, 16), (16, 1), (20, 2), (22, 2)]);
        assert_eq!(definitions.total_size(), 16 + 4 + 2 + 16);
        assert_eq!(definitions.total_size(), parameters().serialized_size());
    }

    #[test]
    fn test_serialized_layout() {
        let mut map = TraceParameterDefinitionMap::new();
        map.put("A", ParameterDefinition::new(ParameterType::Short, 0, 3))
            .unwrap();
        let bytes = map.serialize().unwrap();
        assert_eq!(bytes, vec![1, 0, 1, 0, b'A', 0x02, 3, 0, 0, 0]);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let definitions = TraceParameterDefinitionMap::create_from(&parameters()).unwrap();
        let back = TraceParameterDefinitionMap::deserialize(&definitions.serialize().unwrap()).unwrap();
        assert!(back.is_read_only());
        assert_eq!(
            back.keys().collect::<Vec<_>>(),
            vec!["INPUT", "COUNTER", "LABEL", "WEIGHTS"]
        );
        assert_eq!(back, definitions);
    }

    #[test]
    fn test_read_only_definitions_reject_put() {
        let mut back = TraceParameterDefinitionMap::deserialize(&[0, 0]).unwrap();
        let err = back
            .put("SHOULD_FAIL", ParameterDefinition::new(ParameterType::Byte, 1, 1))
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(back.is_empty());
    }

    #[test]
    fn test_unknown_type_code_rejected() {
        let bytes = vec![1, 0, 1, 0, b'A', 0x7E, 1, 0, 0, 0];
        assert!(TraceParameterDefinitionMap::deserialize(&bytes)
            .unwrap_err()
            .is_format());
    }
}
