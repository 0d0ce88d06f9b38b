//! Type-erased parameter values.
//!
//! This module provides the closed set of scalar types a parameter can hold:
//! - [`Value`] - Tagged union over `bool`, `i32`, `f32` and `f64`
//! - [`ValueKind`] - The tag of a [`Value`]
//! - [`ParameterValue`] - Maps a Rust type onto its [`Value`] variant
//!
//! Every place that needs a parameter's value, minimum or maximum without
//! static knowledge of its type goes through [`Value`] and matches on it
//! exhaustively.

use std::fmt;

/// Tag identifying which scalar type a [`Value`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Double,
}

impl ValueKind {
    /// Rust type name for diagnostics (e.g., "f32").
    pub const fn type_name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "i32",
            ValueKind::Float => "f32",
            ValueKind::Double => "f64",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A parameter value of any supported scalar type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
}

impl Value {
    /// The tag of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
        }
    }

    /// Numeric view of the value (`true` = 1.0).
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(i) => i as f64,
            Value::Float(v) => v as f64,
            Value::Double(v) => v,
        }
    }

    /// Returns `true` if the value is a floating point NaN.
    pub fn is_nan(&self) -> bool {
        match *self {
            Value::Float(v) => v.is_nan(),
            Value::Double(v) => v.is_nan(),
            Value::Bool(_) | Value::Int(_) => false,
        }
    }

    /// Clamp the value into `[min, max]`.
    ///
    /// Bounds of a different kind are ignored and the value is returned as is.
    /// Returns `None` for NaN, which has no position inside any range.
    pub fn clamp(self, min: Value, max: Value) -> Option<Value> {
        if self.is_nan() {
            return None;
        }

        let clamped = match (self, min, max) {
            (Value::Int(v), Value::Int(lo), Value::Int(hi)) => Value::Int(v.max(lo).min(hi)),
            (Value::Float(v), Value::Float(lo), Value::Float(hi)) => {
                Value::Float(v.max(lo).min(hi))
            }
            (Value::Double(v), Value::Double(lo), Value::Double(hi)) => {
                Value::Double(v.max(lo).min(hi))
            }
            (Value::Bool(v), Value::Bool(lo), Value::Bool(hi)) => Value::Bool(v.max(lo).min(hi)),
            (other, _, _) => other,
        };
        Some(clamped)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Rust types that can back a [`Parameter`](crate::Parameter).
///
/// Implemented for `bool`, `i32`, `f32` and `f64` only.
pub trait ParameterValue:
    sealed::Sealed + Copy + PartialEq + fmt::Debug + fmt::Display + 'static
{
    /// The [`Value`] tag for this type.
    const KIND: ValueKind;

    /// Wrap in the matching [`Value`] variant.
    fn into_value(self) -> Value;

    /// Unwrap a [`Value`].
    ///
    /// A value carrying a different tag is converted numerically (the same
    /// conversion `as` performs). Registry slots always carry the tag of the
    /// handle reading them, so this only matters for hand-built values.
    fn from_value(value: Value) -> Self;
}

impl ParameterValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Bool(v) => v,
            other => other.as_f64() != 0.0,
        }
    }
}

impl ParameterValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Int(v) => v,
            other => other.as_f64() as i32,
        }
    }
}

impl ParameterValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Float(v) => v,
            other => other.as_f64() as f32,
        }
    }
}

impl ParameterValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Double(v) => v,
            other => other.as_f64(),
        }
    }
}
