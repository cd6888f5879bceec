// Header tag registry

use crate::core::constants::SampleCoding;

/// Declared value type of a header tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Int,
    Float,
    Bool,
    String,
    TraceSetParameters,
    TraceParameterDefinitions,
}

/// Compiled-in default value of a header tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagDefault {
    Int(i32),
    Float(f32),
    Bool(bool),
    Str(&'static str),
    EmptyBlock,
}

#[derive(Debug, Clone, Copy)]
pub struct TagDescriptor {
    pub value: u8,
    pub name: &'static str,
    pub required: bool,
    pub tag_type: TagType,
    /// Serialized width for fixed-size types, 0 for variable-length ones.
    pub length: usize,
    pub default: TagDefault,
    pub description: &'static str,
}

macro_rules! tags {
    ($($variant:ident = ($value:literal, $name:literal, $required:literal, $ty:ident, $len:literal, $default:expr, $desc:literal)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TrsTag {
            $($variant),*
        }

        impl TrsTag {
            /// Every tag in canonical header order.
            pub const ALL: &'static [TrsTag] = &[$(TrsTag::$variant),*];

            pub fn descriptor(self) -> &'static TagDescriptor {
                match self {
                    $(TrsTag::$variant => {
                        const D: TagDescriptor = TagDescriptor {
                            value: $value,
                            name: $name,
                            required: $required,
                            tag_type: TagType::$ty,
                            length: $len,
                            default: $default,
                            description: $desc,
                        };
                        &D
                    })*
                }
            }
        }
    };
}

use TagDefault::{Bool as B, EmptyBlock as Block, Float as F, Int as I, Str as S};

tags! {
    NumberOfTraces               = (0x41, "NT", true,  Int,    4, I(0), "Number of traces"),
    NumberOfSamples              = (0x42, "NS", true,  Int,    4, I(0), "Number of samples per trace"),
    SampleCoding                 = (0x43, "SC", true,  Int,    1, I(SampleCoding::Float as i32), "Sample Coding (see SampleCoding)"),
    DataLength                   = (0x44, "DS", false, Int,    2, I(0), "Length of cryptographic data included in trace"),
    TitleSpace                   = (0x45, "TS", false, Int,    1, I(0), "Title space reserved per trace"),
    GlobalTitle                  = (0x46, "GT", false, String, 0, S("trace"), "Global trace title"),
    Description                  = (0x47, "DC", false, String, 0, S(""), "Description"),
    OffsetX                      = (0x48, "XO", false, Int,    4, I(0), "Offset in X-axis for trace representation"),
    LabelX                       = (0x49, "XL", false, String, 0, S(""), "Label of X-axis"),
    LabelY                       = (0x4A, "YL", false, String, 0, S(""), "Label of Y-axis"),
    ScaleX                       = (0x4B, "XS", false, Float,  4, F(1.0), "Scale value for X-axis"),
    ScaleY                       = (0x4C, "YS", false, Float,  4, F(1.0), "Scale value for Y-axis"),
    TraceOffset                  = (0x4D, "TO", false, Int,    4, I(0), "Trace offset for displaying trace numbers"),
    LogarithmicScale             = (0x4E, "LS", false, Bool,   1, B(false), "Logarithmic scale"),
    TrsVersion                   = (0x4F, "VS", false, Int,    1, I(0), "The version of the traceset format"),
    AcquisitionRangeOfScope      = (0x55, "RG", false, Float,  4, F(0.0), "Range of the scope used to perform acquisition"),
    AcquisitionCouplingOfScope   = (0x56, "CL", false, Int,    4, I(0), "Coupling of the scope used to perform acquisition"),
    AcquisitionOffsetOfScope     = (0x57, "OS", false, Float,  4, F(0.0), "Offset of the scope used to perform acquisition"),
    AcquisitionInputImpedance    = (0x58, "II", false, Float,  4, F(0.0), "Input impedance of the scope used to perform acquisition"),
    AcquisitionDeviceId          = (0x59, "AI", false, String, 0, S(""), "Device ID of the scope used to perform acquisition"),
    AcquisitionTypeFilter        = (0x5A, "FT", false, Int,    4, I(0), "The type of filter used during acquisition"),
    AcquisitionFrequencyFilter   = (0x5B, "FF", false, Float,  4, F(0.0), "Frequency of the filter used during acquisition"),
    AcquisitionRangeFilter       = (0x5C, "FR", false, Float,  4, F(0.0), "Range of the filter used during acquisition"),
    TraceBlock                   = (0x5F, "TB", true,  Int,    0, I(0), "Trace block marker: an empty TLV that marks the end of the header"),
    ExternalClockUsed            = (0x60, "EU", false, Bool,   1, B(false), "External clock used"),
    ExternalClockThreshold       = (0x61, "ET", false, Float,  4, F(0.0), "External clock threshold"),
    ExternalClockMultiplier      = (0x62, "EM", false, Int,    4, I(0), "External clock multiplier"),
    ExternalClockPhaseShift      = (0x63, "EP", false, Int,    4, I(0), "External clock phase shift"),
    ExternalClockResamplerMask   = (0x64, "ER", false, Int,    4, I(0), "External clock resampler mask"),
    ExternalClockResamplerEnabled = (0x65, "RE", false, Bool,  1, B(false), "External clock resampler enabled"),
    ExternalClockFrequency       = (0x66, "EF", false, Float,  4, F(0.0), "External clock frequency"),
    ExternalClockBase            = (0x67, "EB", false, Int,    4, I(0), "External clock time base"),
    NumberView                   = (0x68, "VT", false, Int,    4, I(0), "View number of traces: number of traces to show on opening"),
    TraceOverlap                 = (0x69, "OV", false, Bool,   1, B(false), "Overlap: whether to overlap traces in case of multi trace view"),
    GoLastTrace                  = (0x6A, "GL", false, Bool,   1, B(false), "Go to last trace on opening"),
    InputOffset                  = (0x6B, "IO", false, Int,    4, I(0), "Input data offset in trace data"),
    OutputOffset                 = (0x6C, "OO", false, Int,    4, I(0), "Output data offset in trace data"),
    KeyOffset                    = (0x6D, "KO", false, Int,    4, I(0), "Key data offset in trace data"),
    InputLength                  = (0x6E, "IL", false, Int,    4, I(0), "Input data length in trace data"),
    OutputLength                 = (0x6F, "OL", false, Int,    4, I(0), "Output data length in trace data"),
    KeyLength                    = (0x70, "KL", false, Int,    4, I(0), "Key data length in trace data"),
    NumberOfEnabledChannels      = (0x71, "CH", false, Int,    4, I(0), "Number of oscilloscope channels used for measurement"),
    NumberOfUsedOscilloscopes    = (0x72, "NO", false, Int,    4, I(0), "Number of oscilloscopes used for measurement"),
    XyScanWidth                  = (0x73, "WI", false, Int,    4, I(0), "Number of steps in the \"x\" direction during XY scan"),
    XyScanHeight                 = (0x74, "HE", false, Int,    4, I(0), "Number of steps in the \"y\" direction during XY scan"),
    XyMeasurementsPerSpot        = (0x75, "ME", false, Int,    4, I(0), "Number of consecutive measurements done per spot during XY scan"),
    TraceSetParameters           = (0x76, "GP", false, TraceSetParameters, 0, Block, "The set of custom global trace set parameters"),
    TraceParameterDefinitions    = (0x77, "LP", false, TraceParameterDefinitions, 0, Block, "The set of custom local trace parameters"),
}

impl TrsTag {
    pub fn from_value(value: u8) -> Option<TrsTag> {
        Self::ALL.iter().copied().find(|t| t.value() == value)
    }

    pub fn value(self) -> u8 {
        self.descriptor().value
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn is_required(self) -> bool {
        self.descriptor().required
    }

    pub fn tag_type(self) -> TagType {
        self.descriptor().tag_type
    }

    /// Position of this tag in `ALL`; used as a dense index by `TrsMetaData`.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
