// Conversions between Rust values and TraceParameter variants

use crate::core::error::{Result, TrsError};
use crate::core::parameter::{Ref, TraceParameter};

/// A Rust type that can be stored in and read back from a `TraceParameter`.
///
/// Scalars map to single-element arrays. Reading a scalar from an array longer than one
/// element fails; reading a `Vec` from a single element succeeds.
pub trait ParameterValue: Sized {
    const KIND: &'static str;

    fn into_parameter(self) -> Result<TraceParameter>;

    /// Returns `None` when the parameter holds a different kind.
    fn from_parameter(parameter: &TraceParameter) -> Option<Result<Self>>;
}

fn actual_kind(parameter: &TraceParameter) -> &'static str {
    parameter.param_type().name()
}

/// Extracts `T` from `parameter`, reporting a type mismatch against `key`.
pub fn extract<T: ParameterValue>(key: &str, parameter: &TraceParameter) -> Result<T> {
    T::from_parameter(parameter).unwrap_or_else(|| {
        Err(TrsError::TypeMismatch {
            key: key.to_string(),
            expected: T::KIND,
            actual: actual_kind(parameter),
        })
    })
}

macro_rules! array_value {
    ($elem:ty, $variant:ident, $ctor:ident, $kind:literal) => {
        impl ParameterValue for $elem {
            const KIND: &'static str = $kind;

            fn into_parameter(self) -> Result<TraceParameter> {
                TraceParameter::$ctor(vec![self])
            }

            fn from_parameter(parameter: &TraceParameter) -> Option<Result<Self>> {
                match parameter {
                    TraceParameter::$variant(values) => Some(
                        parameter
                            .check_scalar()
                            .map(|_| values[0].clone()),
                    ),
                    _ => None,
                }
            }
        }

        impl ParameterValue for Vec<$elem> {
            const KIND: &'static str = concat!($kind, " array");

            fn into_parameter(self) -> Result<TraceParameter> {
                TraceParameter::$ctor(self)
            }

            fn from_parameter(parameter: &TraceParameter) -> Option<Result<Self>> {
                match parameter {
                    TraceParameter::$variant(values) => Some(Ok(values.clone())),
                    _ => None,
                }
            }
        }
    };
}

array_value!(u8, Byte, bytes, "byte");
array_value!(i16, Short, shorts, "short");
array_value!(i32, Int, ints, "int");
array_value!(f32, Float, floats, "float");
array_value!(i64, Long, longs, "long");
array_value!(f64, Double, doubles, "double");
array_value!(bool, Bool, bools, "bool");
array_value!(Ref, Ref, refs, "ref");

impl ParameterValue for String {
    const KIND: &'static str = "string";

    fn into_parameter(self) -> Result<TraceParameter> {
        Ok(TraceParameter::String(self))
    }

    fn from_parameter(parameter: &TraceParameter) -> Option<Result<Self>> {
        match parameter {
            TraceParameter::String(s) => Some(Ok(s.clone())),
            _ => None,
        }
    }
}

impl ParameterValue for &str {
    const KIND: &'static str = "string";

    fn into_parameter(self) -> Result<TraceParameter> {
        Ok(TraceParameter::string(self))
    }

    // Borrowed strings cannot be produced from a stored parameter; read `String` instead.
    fn from_parameter(_parameter: &TraceParameter) -> Option<Result<Self>> {
        None
    }
}
