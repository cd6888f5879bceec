// Format constants for TRS trace sets

/// Largest value a header length field (and a nested-block element count) may carry.
pub const MAX_LENGTH: usize = 0xFFFF;

/// Default upper bound on a single read-only mapping of the file.
pub const DEFAULT_MAX_WINDOW_SIZE: u64 = i32::MAX as u64;

/// Trace-set format version written by new sessions.
pub const TRS_VERSION_CURRENT: i32 = 2;

/// Files at or below this version store per-trace data as an opaque blob.
pub const TRS_VERSION_LEGACY: i32 = 1;

// Well-known parameter keys
pub const LEGACY_DATA: &str = "LEGACY_DATA";
pub const TITLE: &str = "TITLE";
pub const SAMPLES: &str = "SAMPLES";
pub const INPUT: &str = "INPUT";
pub const OUTPUT: &str = "OUTPUT";
pub const KEY: &str = "KEY";

// Sample codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleCoding {
    Illegal = 0x00,
    Byte = 0x01,
    Short = 0x02,
    Int = 0x04,
    Float = 0x14,
}

impl SampleCoding {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x00 => Some(SampleCoding::Illegal),
            0x01 => Some(SampleCoding::Byte),
            0x02 => Some(SampleCoding::Short),
            0x04 => Some(SampleCoding::Int),
            0x14 => Some(SampleCoding::Float),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Bytes per sample on the wire. `Illegal` has no width.
    pub fn size(self) -> Option<usize> {
        match self {
            SampleCoding::Illegal => None,
            SampleCoding::Byte => Some(1),
            SampleCoding::Short => Some(2),
            SampleCoding::Int | SampleCoding::Float => Some(4),
        }
    }
}

// Parameter type codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Byte = 0x01,
    Short = 0x02,
    Int = 0x04,
    Float = 0x14,
    Long = 0x08,
    Double = 0x18,
    String = 0x20,
    Bool = 0x31,
    Ref = 0x40,
}

impl ParameterType {
    pub const ALL: [ParameterType; 9] = [
        ParameterType::Byte,
        ParameterType::Short,
        ParameterType::Int,
        ParameterType::Float,
        ParameterType::Long,
        ParameterType::Double,
        ParameterType::String,
        ParameterType::Bool,
        ParameterType::Ref,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.value() == val)
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn byte_size(self) -> usize {
        match self {
            ParameterType::Byte | ParameterType::String | ParameterType::Bool => 1,
            ParameterType::Short => 2,
            ParameterType::Int | ParameterType::Float | ParameterType::Ref => 4,
            ParameterType::Long | ParameterType::Double => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParameterType::Byte => "byte",
            ParameterType::Short => "short",
            ParameterType::Int => "int",
            ParameterType::Float => "float",
            ParameterType::Long => "long",
            ParameterType::Double => "double",
            ParameterType::String => "string",
            ParameterType::Bool => "bool",
            ParameterType::Ref => "ref",
        }
    }
}
