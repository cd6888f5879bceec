// Ordered name -> value maps backing trace parameters, trace-set parameters and definitions

use crate::core::bytes::ByteReader;
use crate::core::definition::TraceParameterDefinitionMap;
use crate::core::error::{Result, TrsError};
use crate::core::parameter::TraceParameter;
use crate::core::typed::{extract, ParameterValue};
use std::io::Write;

/// A value that can be stored in a `ParameterMap`.
pub trait MapValue {
    /// Rejects values that could not be written back to a file.
    fn validate(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

impl MapValue for TraceParameter {
    fn validate(&self, key: &str) -> Result<()> {
        self.check_not_empty(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Mutable,
    ReadOnly,
}

/// Insertion-ordered map. Replacing an existing key keeps its position.
///
/// A read-only map owns its own copy of the entries and rejects every mutation with
/// `TrsError::Unsupported`, leaving its contents unchanged.
#[derive(Debug, Clone)]
pub struct ParameterMap<V> {
    entries: Vec<(String, V)>,
    access: Access,
}

impl<V> Default for ParameterMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            access: Access::Mutable,
        }
    }
}

// Equality compares contents in any order; the access mode is not part of the value.
impl<V: PartialEq> PartialEq for ParameterMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl<V> ParameterMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.access == Access::ReadOnly
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    fn check_mutable(&self, what: impl FnOnce() -> String) -> Result<()> {
        match self.access {
            Access::Mutable => Ok(()),
            Access::ReadOnly => Err(TrsError::Unsupported(format!(
                "{}: This trace set is in read mode and cannot be modified.",
                what()
            ))),
        }
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<V>> {
        self.check_mutable(|| format!("Unable to remove parameter `{}`", key))?;
        Ok(self
            .entries
            .iter()
            .position(|(k, _)| k == key)
            .map(|i| self.entries.remove(i).1))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.check_mutable(|| "Unable to modify".to_string())?;
        self.entries.clear();
        Ok(())
    }
}

impl<V: MapValue> ParameterMap<V> {
    /// Inserts or replaces `key`, returning the previous value.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>> {
        let key = key.into();
        self.check_mutable(|| format!("Unable to set parameter `{}`", key))?;
        value.validate(&key)?;
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        self.entries.push((key, value));
        Ok(None)
    }
}

impl<V: Clone> ParameterMap<V> {
    /// A read-only snapshot. Later changes to `source` are not visible through it.
    pub fn read_only(source: &Self) -> Self {
        Self {
            entries: source.entries.clone(),
            access: Access::ReadOnly,
        }
    }

    /// A mutable copy, regardless of this map's access mode.
    pub fn to_mutable(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            access: Access::Mutable,
        }
    }

    /// Puts every entry of `other` into this map, in `other`'s order.
    pub fn merge(&mut self, other: &Self) -> Result<()>
    where
        V: MapValue,
    {
        self.check_mutable(|| "Unable to add all entries".to_string())?;
        for (k, v) in &other.entries {
            self.put(k.clone(), v.clone())?;
        }
        Ok(())
    }
}

impl<V> FromIterator<(String, V)> for ParameterMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            if let Some((_, slot)) = map.entries.iter_mut().find(|(key, _)| *key == k) {
                *slot = v;
            } else {
                map.entries.push((k, v));
            }
        }
        map
    }
}

/// Parameters stored in every trace record.
pub type TraceParameterMap = ParameterMap<TraceParameter>;

impl ParameterMap<TraceParameter> {
    /// Stores a Rust value under `key`. Empty arrays are rejected.
    pub fn put_value<T: ParameterValue>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        let parameter = value.into_parameter()?;
        self.put(key, parameter).map(|_| ())
    }

    pub fn get_value<T: ParameterValue>(&self, key: &str) -> Result<Option<T>> {
        self.get(key).map(|p| extract(key, p)).transpose()
    }

    pub fn require_value<T: ParameterValue>(&self, key: &str) -> Result<T> {
        self.get_value(key)?.ok_or_else(|| {
            TrsError::argument(format!("Parameter {} was not found in the trace set.", key))
        })
    }

    /// Sum of the serialized widths of every parameter.
    pub fn serialized_size(&self) -> usize {
        self.values().map(TraceParameter::serialized_size).sum()
    }

    /// Values concatenated in insertion order. Names and shapes come from the definitions.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.values().try_for_each(|p| p.serialize(writer))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        let _ = self.serialize(&mut out);
        out
    }

    /// Slices `bytes` per definition, in definition order. The result is read-only.
    pub fn deserialize(bytes: &[u8], definitions: &TraceParameterDefinitionMap) -> Result<Self> {
        let total = definitions.total_size();
        if bytes.is_empty() && total != 0 {
            return Err(TrsError::argument(
                "The provided byte array is null or empty, but the provided definitions are not",
            ));
        }
        if bytes.len() != total {
            return Err(TrsError::format(format!(
                "The provided byte array ({} bytes) does not match the total definitions length ({} bytes)",
                bytes.len(),
                total
            )));
        }

        let mut reader = ByteReader::new(bytes);
        let mut result = Self::new();
        for (name, definition) in definitions.iter() {
            let parameter = TraceParameter::deserialize(
                &mut reader,
                definition.param_type,
                usize::from(definition.length),
            )?;
            result.put(name, parameter)?;
        }
        Ok(result.into_read_only())
    }
}
