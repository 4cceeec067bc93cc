//! Conversion traits between native values and VM values.
//!
//! - [`FromValue`]: read a native value out of a [`Value`]
//! - [`IntoValue`]: turn a native value into a [`Value`]
//!
//! ## Numeric policy
//!
//! Integer conversions are checked in both directions. A VM integer that
//! does not fit the native width fails with `IntegerOverflow`; a `u64` or
//! `usize` above `i64::MAX` fails with `UnsignedOverflow` on its way to the
//! VM. Nothing saturates or wraps.
//!
//! Integers are accepted where a float is expected and round to the
//! nearest representable float: magnitudes above 2^53 lose precision in an
//! `f64`, above 2^24 in an `f32`. Floats are never accepted where an
//! integer is expected.
//!
//! ## Instances
//!
//! Native classes get their codec from `#[derive(NativeClass)]`, which
//! routes through [`instance_from_value`] and [`instance_into_value`].
//!
//! ## Example
//!
//! ```
//! use scriptbind_core::{FromValue, InstanceTable, IntoValue, Value};
//!
//! let mut instances = InstanceTable::new();
//! let value = 42u8.into_value(&mut instances).unwrap();
//! assert_eq!(value, Value::Int(42));
//! assert_eq!(u8::from_value(&value, &instances).unwrap(), 42);
//! assert!(u8::from_value(&Value::Int(300), &instances).is_err());
//! ```

use std::ffi::CString;

use crate::{ConversionError, InstanceTable, NativeClass, ScriptType, Value};

/// Read a native value from a VM value.
pub trait FromValue: ScriptType + Sized {
    /// Convert `value`, consulting `instances` for wrapped instances.
    fn from_value(value: &Value, instances: &InstanceTable) -> Result<Self, ConversionError>;
}

/// Encode a native value as a VM value.
pub trait IntoValue: ScriptType {
    /// Convert `self`; returned instances are inserted into `instances`.
    fn into_value(self, instances: &mut InstanceTable) -> Result<Value, ConversionError>;
}

fn mismatch<T: ScriptType>(value: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: T::type_name(),
        actual: value.type_name(),
    }
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(*v).map_err(|_| ConversionError::IntegerOverflow {
                            value: *v,
                            target_type: stringify!($ty),
                        }),
                        _ => Err(mismatch::<$ty>(value)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_into_value_int {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
                    Ok(Value::Int(i64::from(self)))
                }
            }
        )*
    };
}

impl_into_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for isize {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        // isize is at most 64 bits on every supported target
        Ok(Value::Int(self as i64))
    }
}

macro_rules! impl_into_value_wide_uint {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
                    i64::try_from(self)
                        .map(Value::Int)
                        .map_err(|_| ConversionError::UnsignedOverflow { value: self as u64 })
                }
            }
        )*
    };
}

impl_into_value_wide_uint!(u64, usize);

// ============================================================================
// Float implementations
// ============================================================================

impl FromValue for f32 {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => {
                if !v.is_finite() || (*v <= f32::MAX as f64 && *v >= f32::MIN as f64) {
                    Ok(*v as f32)
                } else {
                    Err(ConversionError::FloatConversion {
                        value: *v,
                        target_type: "f32",
                    })
                }
            }
            Value::Int(v) => Ok(*v as f32),
            _ => Err(mismatch::<f32>(value)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Float(f64::from(self)))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            _ => Err(mismatch::<f64>(value)),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Float(self))
    }
}

// ============================================================================
// Bool, unit and text
// ============================================================================

impl FromValue for bool {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(*v),
            _ => Err(mismatch::<bool>(value)),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Bool(self))
    }
}

impl IntoValue for () {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Nil)
    }
}

impl FromValue for char {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        let Value::Str(s) = value else {
            return Err(mismatch::<char>(value));
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionError::NotAChar {
                length: s.chars().count(),
            }),
        }
    }
}

impl IntoValue for char {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Str(self.to_string()))
    }
}

impl FromValue for String {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            _ => Err(mismatch::<String>(value)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Str(self))
    }
}

impl IntoValue for &'static str {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(Value::Str(self.to_owned()))
    }
}

impl FromValue for CString {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => CString::new(s.as_str()).map_err(|err| ConversionError::InteriorNul {
                position: err.nul_position(),
            }),
            _ => Err(mismatch::<CString>(value)),
        }
    }
}

impl IntoValue for CString {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        self.into_string()
            .map(Value::Str)
            .map_err(|_| ConversionError::InvalidUtf8)
    }
}

// ============================================================================
// Option and passthrough
// ============================================================================

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, instances: &InstanceTable) -> Result<Self, ConversionError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other, instances).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self, instances: &mut InstanceTable) -> Result<Value, ConversionError> {
        match self {
            Some(v) => v.into_value(instances),
            None => Ok(Value::Nil),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value, _: &InstanceTable) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl IntoValue for Value {
    fn into_value(self, _: &mut InstanceTable) -> Result<Value, ConversionError> {
        Ok(self)
    }
}

// ============================================================================
// Instances
// ============================================================================

/// Copy a wrapped instance out of the table.
pub fn instance_from_value<T: NativeClass + Clone>(
    value: &Value,
    instances: &InstanceTable,
) -> Result<T, ConversionError> {
    instances.resolve::<T>(value).cloned()
}

/// Wrap a native instance in a new table entry.
pub fn instance_into_value<T: NativeClass>(value: T, instances: &mut InstanceTable) -> Value {
    Value::Instance(instances.insert(value))
}
