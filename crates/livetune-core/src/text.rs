//! Text conversion for free-text parameters.
//!
//! Free-text controls hold a string. These two functions are the whole
//! boundary between that string and the parameter's typed value:
//!
//! - [`format`] turns a value into the text shown in the control
//! - [`parse`] turns the control's text back into a value of a given kind
//!
//! # Example
//!
//! ```ignore
//! use livetune_core::text;
//!
//! assert_eq!(text::format(Value::Double(3.14)), "3.14");
//! assert_eq!(text::parse(ValueKind::Int, " 42 "), Ok(Value::Int(42)));
//! assert!(text::parse(ValueKind::Double, "abc").is_err());
//! ```

use crate::error::ConversionError;
use crate::value::{Value, ValueKind};

/// Format a value for a text control.
///
/// Uses the shortest representation that parses back to the same value, so a
/// pushed value never reads back as a different one.
pub fn format(value: Value) -> String {
    value.to_string()
}

/// Parse control text into a value of `kind`.
///
/// Surrounding whitespace is ignored. Booleans accept `true/false`, `on/off`,
/// `yes/no` and `1/0` in any case. NaN is rejected for float kinds.
pub fn parse(kind: ValueKind, text: &str) -> Result<Value, ConversionError> {
    let s = text.trim();
    let malformed = || ConversionError::Malformed {
        text: text.to_string(),
        kind,
    };

    let value = match kind {
        ValueKind::Bool => match s.to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Value::Bool(true),
            "false" | "off" | "no" | "0" => Value::Bool(false),
            _ => return Err(malformed()),
        },
        ValueKind::Int => Value::Int(s.parse().map_err(|_| malformed())?),
        ValueKind::Float => Value::Float(s.parse().map_err(|_| malformed())?),
        ValueKind::Double => Value::Double(s.parse().map_err(|_| malformed())?),
    };

    if value.is_nan() {
        return Err(ConversionError::NotANumber {
            text: text.to_string(),
        });
    }
    Ok(value)
}
