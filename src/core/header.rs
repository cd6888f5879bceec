// TLV header serializer and parser

use crate::core::bytes::ByteReader;
use crate::core::constants::MAX_LENGTH;
use crate::core::definition::TraceParameterDefinitionMap;
use crate::core::error::{Result, TrsError};
use crate::core::metadata::{Diagnostic, MetaValue, TrsMetaData};
use crate::core::tags::{TagType, TrsTag};
use crate::core::traceset_parameters::TraceSetParameterMap;
use crate::core::varint::{check_length, read_length_unchecked, write_length};
use std::io::{Seek, SeekFrom, Write};
use tracing::debug;

/// Writes the full header at the start of `writer` and returns its size in bytes.
///
/// Optional tags still holding their default are omitted. The trace block marker
/// is always written last.
pub fn write_metadata<W: Write + Seek>(writer: &mut W, metadata: &mut TrsMetaData) -> Result<u64> {
    let position = writer.stream_position()?;
    if position != 0 {
        metadata.record(Diagnostic::RewoundHeader { position });
        writer.seek(SeekFrom::Start(0))?;
    }

    let mut header = Vec::new();
    for tag in TrsTag::ALL.iter().copied() {
        if tag == TrsTag::TraceBlock {
            continue;
        }
        if !tag.is_required() && metadata.has_default_value(tag) {
            continue;
        }
        let value = encode_value(tag, metadata.get(tag))?;
        header.push(tag.value());
        write_length(&mut header, value.len() as u64)?;
        header.extend_from_slice(&value);
    }
    header.push(TrsTag::TraceBlock.value());
    write_length(&mut header, 0)?;

    writer.write_all(&header)?;
    debug!("wrote TRS header of {} bytes", header.len());
    Ok(header.len() as u64)
}

fn encode_value(tag: TrsTag, value: &MetaValue) -> Result<Vec<u8>> {
    let width = tag.descriptor().length;
    let bytes = match value {
        MetaValue::Int(v) => {
            if width < 4 && (*v < 0 || i64::from(*v) >= 1i64 << (8 * width)) {
                return Err(TrsError::format(format!(
                    "value {} of tag {:?} does not fit in {} byte(s)",
                    v, tag, width
                )));
            }
            v.to_le_bytes()[..width].to_vec()
        }
        MetaValue::Float(v) => v.to_le_bytes().to_vec(),
        MetaValue::Bool(v) => vec![u8::from(*v)],
        MetaValue::Str(s) => s.as_bytes().to_vec(),
        MetaValue::TraceSetParameters(m) => m.serialize()?,
        MetaValue::TraceParameterDefinitions(m) => m.serialize()?,
    };
    if bytes.len() > MAX_LENGTH {
        return Err(TrsError::format(format!(
            "value of tag {:?} is {} bytes long, which exceeds the maximum of {} bytes",
            tag,
            bytes.len(),
            MAX_LENGTH
        )));
    }
    Ok(bytes)
}

/// Parses a header from the start of `data`.
///
/// Returns the metadata, with both parameter blocks read-only, and the number of
/// bytes the header occupies. Unknown tags are skipped and noted as diagnostics.
pub fn read_metadata(data: &[u8]) -> Result<(TrsMetaData, usize)> {
    let mut metadata = TrsMetaData::new();
    let mut reader = ByteReader::new(data);

    loop {
        if reader.is_empty() {
            return Err(TrsError::format(
                "TRS header ended before the trace block marker was found",
            ));
        }
        let value = reader.read_u8()?;
        let length = read_length_unchecked(&mut reader)?;

        let Some(tag) = TrsTag::from_value(value) else {
            let skip = usize::try_from(length).map_err(|_| {
                TrsError::format(format!("length of unknown tag '{:02X}' is too large", value))
            })?;
            reader.skip(skip)?;
            metadata.record(Diagnostic::UnknownTag { value, length });
            continue;
        };

        let length = check_length(length)?;
        if tag == TrsTag::TraceBlock {
            break;
        }

        let bytes = reader.take(length)?;
        metadata.put(tag, decode_value(tag, bytes)?)?;
    }

    Ok((metadata.into_read_only(), reader.position()))
}

fn decode_value(tag: TrsTag, bytes: &[u8]) -> Result<MetaValue> {
    let mut reader = ByteReader::new(bytes);
    let value = match tag.tag_type() {
        TagType::Int => {
            if bytes.len() > 4 {
                return Err(TrsError::format(format!(
                    "integer tag {:?} has {} bytes, at most 4 are supported",
                    tag,
                    bytes.len()
                )));
            }
            MetaValue::Int(reader.read_uint(bytes.len())? as u32 as i32)
        }
        TagType::Float => MetaValue::Float(f32::from_le_bytes(reader.read_array()?)),
        TagType::Bool => MetaValue::Bool(reader.read_u8()? != 0),
        TagType::String => MetaValue::Str(String::from_utf8(bytes.to_vec())?),
        TagType::TraceSetParameters => {
            MetaValue::TraceSetParameters(TraceSetParameterMap::deserialize(bytes)?)
        }
        TagType::TraceParameterDefinitions => {
            MetaValue::TraceParameterDefinitions(TraceParameterDefinitionMap::deserialize(bytes)?)
        }
    };
    Ok(value)
}
