//! Type conversions and equality, with the exact results a conforming engine produces.

use crate::syntax::*;
use once_cell::sync::Lazy;
use regex::Regex;
use unminify_syntax::{JsString, number_to_string};

/// The whitespace and line terminators `trim` and numeric parsing skip.
pub fn is_whitespace(unit: u16) -> bool {
    matches!(
        unit,
        0x09 | 0x0A | 0x0B | 0x0C | 0x0D | 0x20 | 0xA0 | 0x1680 | 0x2000..=0x200A
            | 0x2028 | 0x2029 | 0x202F | 0x205F | 0x3000 | 0xFEFF
    )
}

pub fn trim_units(units: &[u16]) -> &[u16] {
    let start = units.iter().position(|u| !is_whitespace(*u)).unwrap_or(units.len());
    let end = units.iter().rposition(|u| !is_whitespace(*u)).map_or(start, |i| i + 1);
    &units[start..end.max(start)]
}

pub fn trim_start_units(units: &[u16]) -> &[u16] {
    let start = units.iter().position(|u| !is_whitespace(*u)).unwrap_or(units.len());
    &units[start..]
}

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").expect("decimal pattern")
});
static RADIX_PREFIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0([xXoObB])([0-9a-fA-F]+)$").expect("prefixed pattern"));

/// StringToNumber: the whole trimmed string must spell a number, or the result is `NaN`.
pub fn string_to_number(s: &JsString) -> f64 {
    let trimmed = trim_units(s.units());
    let Ok(text) = String::from_utf16(trimmed) else { return f64::NAN };
    if text.is_empty() {
        return 0.0;
    }
    match text.as_str() {
        | "Infinity" | "+Infinity" => return f64::INFINITY,
        | "-Infinity" => return f64::NEG_INFINITY,
        | _ => {}
    }
    if let Some(caps) = RADIX_PREFIXED.captures(&text) {
        let radix = match &caps[1] {
            | "x" | "X" => 16,
            | "o" | "O" => 8,
            | _ => 2,
        };
        return digits_to_number(&caps[2], radix).unwrap_or(f64::NAN);
    }
    if DECIMAL.is_match(&text) {
        return text.parse().unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// Reads `digits` in `radix`, or `None` when any digit is out of range.
pub(crate) fn digits_to_number(digits: &str, radix: u32) -> Option<f64> {
    if radix == 10 {
        return digits.parse().ok();
    }
    let mut value = 0.0;
    for c in digits.chars() {
        value = value * radix as f64 + c.to_digit(radix)? as f64;
    }
    Some(value)
}

pub fn to_boolean(value: &Value) -> bool {
    match value {
        | Value::Undefined => false,
        | Value::Bool(b) => *b,
        | Value::Number(n) => !(n.is_nan() || *n == 0.0),
        | Value::String(s) => !s.is_empty(),
        | Value::Array(_) | Value::RegExp(_) | Value::Builtin(_) => true,
    }
}

/// ToPrimitive with the default hint. Objects have no user-defined conversions here, so
/// arrays join and regular expressions print their source.
pub fn to_primitive(value: &Value) -> Result<Value> {
    match value {
        | Value::Array(_) | Value::RegExp(_) | Value::Builtin(_) => Ok(Value::String(to_string(value)?)),
        | _ => Ok(value.clone()),
    }
}

pub fn to_number(value: &Value) -> Result<f64> {
    Ok(match value {
        | Value::Undefined => f64::NAN,
        | Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        | Value::Number(n) => *n,
        | Value::String(s) => string_to_number(s),
        | _ => to_number(&to_primitive(value)?)?,
    })
}

pub fn to_string(value: &Value) -> Result<JsString> {
    Ok(match value {
        | Value::Undefined => JsString::from("undefined"),
        | Value::Bool(b) => JsString::from(if *b { "true" } else { "false" }),
        | Value::Number(n) => JsString::from(number_to_string(*n)),
        | Value::String(s) => s.clone(),
        | Value::Array(items) => {
            let mut out = JsString::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",");
                }
                if !matches!(item, Value::Undefined) {
                    out = out.concat(&to_string(item)?);
                }
            }
            out
        }
        | Value::RegExp(re) => JsString::from(format!("/{}/{}", re.pattern, re.flags)),
        | Value::Builtin(b) => {
            JsString::from(format!("function {}() {{ [native code] }}", b.name()))
        }
    })
}

/// ToIntegerOrInfinity.
pub fn to_integer(value: &Value) -> Result<f64> {
    let n = to_number(value)?;
    Ok(if n.is_nan() { 0.0 } else { n.trunc() + 0.0 })
}

pub fn to_uint32(value: &Value) -> Result<u32> {
    let n = to_number(value)?;
    if !n.is_finite() {
        return Ok(0);
    }
    Ok(n.trunc().rem_euclid(4294967296.0) as u32)
}

pub fn to_int32(value: &Value) -> Result<i32> {
    Ok(to_uint32(value)? as i32)
}

/// `===`. Objects compare by identity, which only shared allocations can witness.
pub fn strict_equals(left: &Value, right: &Value) -> Result<bool> {
    Ok(match (left, right) {
        | (Value::Undefined, Value::Undefined) => true,
        | (Value::Bool(a), Value::Bool(b)) => a == b,
        | (Value::Number(a), Value::Number(b)) => a == b,
        | (Value::String(a), Value::String(b)) => a == b,
        | (Value::Array(a), Value::Array(b)) if std::rc::Rc::ptr_eq(a, b) => true,
        | (Value::RegExp(a), Value::RegExp(b)) if std::rc::Rc::ptr_eq(a, b) => true,
        | (Value::Builtin(a), Value::Builtin(b)) => a == b,
        | (a, b) if a.is_object() && b.is_object() => {
            return Err(EvalError::Unmodeled("object identity".to_string()));
        }
        | _ => false,
    })
}

/// `==`, following the abstract equality algorithm.
pub fn loose_equals(left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        | (Value::Undefined, Value::Undefined) => Ok(true),
        | (Value::Undefined, _) | (_, Value::Undefined) => Ok(false),
        | (Value::Number(_), Value::String(s)) => {
            loose_equals(left, &Value::Number(string_to_number(s)))
        }
        | (Value::String(s), Value::Number(_)) => {
            loose_equals(&Value::Number(string_to_number(s)), right)
        }
        | (Value::Bool(b), _) => loose_equals(&Value::Number(if *b { 1.0 } else { 0.0 }), right),
        | (_, Value::Bool(b)) => loose_equals(left, &Value::Number(if *b { 1.0 } else { 0.0 })),
        | (a, b) if a.is_object() && !b.is_object() => loose_equals(&to_primitive(a)?, b),
        | (a, b) if !a.is_object() && b.is_object() => loose_equals(a, &to_primitive(b)?),
        | _ => strict_equals(left, right),
    }
}
