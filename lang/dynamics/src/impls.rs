//! The built-in functions and methods the evaluator may run.

use crate::{coerce::*, ops::concat_all, syntax::*};
use once_cell::sync::Lazy;
use phf::phf_map;
use regex::Regex;
use std::rc::Rc;
use unminify_syntax::{JsString, number_to_string};

type StringMethod = fn(&JsString, &[Value]) -> Result<Value>;
type ArrayMethod = fn(&Rc<Vec<Value>>, &[Value]) -> Result<Value>;

/// Global functions by name.
static GLOBALS: phf::Map<&'static str, Builtin> = phf_map! {
    "decodeURI" => Builtin::DecodeUri,
    "decodeURIComponent" => Builtin::DecodeUriComponent,
    "unescape" => Builtin::Unescape,
    "parseInt" => Builtin::ParseInt,
    "parseFloat" => Builtin::ParseFloat,
};

static STRING_METHODS: phf::Map<&'static str, StringMethod> = phf_map! {
    "charAt" => char_at as StringMethod,
    "charCodeAt" => char_code_at as StringMethod,
    "indexOf" => index_of as StringMethod,
    "lastIndexOf" => last_index_of as StringMethod,
    "slice" => str_slice as StringMethod,
    "substring" => substring as StringMethod,
    "substr" => substr as StringMethod,
    "toUpperCase" => to_upper_case as StringMethod,
    "toLowerCase" => to_lower_case as StringMethod,
    "trim" => trim as StringMethod,
    "split" => split as StringMethod,
    "concat" => str_concat as StringMethod,
    "toString" => str_value as StringMethod,
    "valueOf" => str_value as StringMethod,
};

/// Array methods that leave the receiver untouched.
static ARRAY_METHODS: phf::Map<&'static str, ArrayMethod> = phf_map! {
    "slice" => arr_slice as ArrayMethod,
    "indexOf" => arr_index_of as ArrayMethod,
    "forEach" => for_each as ArrayMethod,
    "map" => map as ArrayMethod,
    "filter" => filter as ArrayMethod,
    "reduce" => reduce as ArrayMethod,
};

pub fn global(name: &str) -> Option<Builtin> {
    GLOBALS.get(name).copied()
}

/// Whether calling `name` on an array can neither mutate it nor let it escape.
pub fn is_non_mutating_array_method(name: &str) -> bool {
    ARRAY_METHODS.contains_key(name)
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Undefined)
}

fn is_absent(args: &[Value], i: usize) -> bool {
    matches!(args.get(i), None | Some(Value::Undefined))
}

/* --------------------------------- Globals -------------------------------- */

impl Builtin {
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            | Builtin::DecodeUri => decode(&to_string(&arg(args, 0))?, ";/?:@&=+$,#"),
            | Builtin::DecodeUriComponent => decode(&to_string(&arg(args, 0))?, ""),
            | Builtin::Unescape => Ok(Value::String(unescape(&to_string(&arg(args, 0))?))),
            | Builtin::ParseInt => parse_int(&arg(args, 0), &arg(args, 1)),
            | Builtin::ParseFloat => parse_float(&arg(args, 0)),
        }
    }
}

/// Two hex digits as a byte. Signs and other characters `from_str_radix` tolerates are refused.
fn hex_pair(units: &[u16]) -> Option<u8> {
    let [high, low] = units else { return None };
    let digit = |unit: u16| char::from_u32(u32::from(unit))?.to_digit(16);
    Some((digit(*high)? * 16 + digit(*low)?) as u8)
}

/// Percent-decoding as `decodeURI` and `decodeURIComponent` do it. Escapes of characters in
/// `reserved` are left as written.
fn decode(s: &JsString, reserved: &str) -> Result<Value> {
    let units = s.units();
    let mut out = JsString::new();
    let mut i = 0;
    while i < units.len() {
        if units[i] != u16::from(b'%') {
            out.push_units(&units[i..i + 1]);
            i += 1;
            continue;
        }
        let start = i;
        let lead = units.get(i + 1..i + 3).and_then(hex_pair).ok_or(EvalError::Uri)?;
        i += 3;
        if lead < 0x80 {
            if reserved.contains(char::from(lead)) {
                out.push_units(&units[start..i]);
            } else {
                out.push_units(&[u16::from(lead)]);
            }
            continue;
        }
        let count = match lead {
            | 0xC0..=0xDF => 2,
            | 0xE0..=0xEF => 3,
            | 0xF0..=0xF7 => 4,
            | _ => return Err(EvalError::Uri),
        };
        let mut bytes = vec![lead];
        for _ in 1..count {
            if units.get(i) != Some(&u16::from(b'%')) {
                return Err(EvalError::Uri);
            }
            let byte = units.get(i + 1..i + 3).and_then(hex_pair).ok_or(EvalError::Uri)?;
            bytes.push(byte);
            i += 3;
        }
        let decoded = std::str::from_utf8(&bytes).map_err(|_| EvalError::Uri)?;
        out.push_str(decoded);
    }
    Ok(Value::String(out))
}

/// `%XX` and `%uXXXX` escapes. An escape whose digits are not all hex stays as written.
fn unescape(s: &JsString) -> JsString {
    let units = s.units();
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        if units[i] == u16::from(b'%') {
            if units.get(i + 1) == Some(&u16::from(b'u')) {
                let code = units
                    .get(i + 2..i + 6)
                    .and_then(|hex| String::from_utf16(hex).ok())
                    .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|hex| u16::from_str_radix(&hex, 16).ok());
                if let Some(code) = code {
                    out.push(code);
                    i += 6;
                    continue;
                }
            } else if let Some(byte) = units.get(i + 1..i + 3).and_then(hex_pair) {
                out.push(u16::from(byte));
                i += 3;
                continue;
            }
        }
        out.push(units[i]);
        i += 1;
    }
    JsString::from_units(out)
}

fn parse_int(input: &Value, radix: &Value) -> Result<Value> {
    let s = to_string(input)?;
    let text = String::from_utf16_lossy(trim_start_units(s.units()));
    let (sign, mut rest) = match text.strip_prefix('-') {
        | Some(rest) => (-1.0, rest),
        | None => (1.0, text.strip_prefix('+').unwrap_or(&text)),
    };
    let mut radix = to_int32(radix)?;
    let mut strip_prefix = true;
    if radix != 0 {
        if !(2..=36).contains(&radix) {
            return Ok(Value::Number(f64::NAN));
        }
        if radix != 16 {
            strip_prefix = false;
        }
    } else {
        radix = 10;
    }
    if strip_prefix {
        if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            rest = hex;
            radix = 16;
        }
    }
    let radix = radix as u32;
    let end = rest.find(|c: char| c.to_digit(radix).is_none()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    let magnitude = digits_to_number(digits, radix).unwrap_or(f64::NAN);
    Ok(Value::Number(sign * magnitude))
}

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix pattern")
});

fn parse_float(input: &Value) -> Result<Value> {
    let s = to_string(input)?;
    let text = String::from_utf16_lossy(trim_start_units(s.units()));
    let Some(found) = FLOAT_PREFIX.find(&text) else { return Ok(Value::Number(f64::NAN)) };
    let literal = found.as_str();
    let value = match literal.trim_start_matches(['+', '-']) {
        | "Infinity" => {
            if literal.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
        | _ => literal.parse().unwrap_or(f64::NAN),
    };
    Ok(Value::Number(value))
}

/// `String.fromCharCode`.
pub fn from_char_code(args: &[Value]) -> Result<Value> {
    let mut units = Vec::with_capacity(args.len());
    for value in args {
        units.push(to_uint32(value)? as u16);
    }
    Ok(Value::String(JsString::from_units(units)))
}

/* --------------------------- Properties and methods ------------------------ */

/// A data property of a primitive or an array.
pub fn get_property(this: &Value, name: &str) -> Result<Value> {
    match (this, name) {
        | (Value::String(s), "length") => Ok(Value::Number(s.len() as f64)),
        | (Value::Array(items), "length") => Ok(Value::Number(items.len() as f64)),
        | (Value::String(s), _) => match unminify_syntax::array_index(name) {
            | Some(i) if i < s.len() => Ok(Value::String(JsString::from_units(vec![s[i]]))),
            | Some(_) => Ok(Value::Undefined),
            | None => Err(EvalError::Unmodeled(format!("string property `{name}`"))),
        },
        | _ => Err(EvalError::Unmodeled(format!("property `{name}` of {}", this.type_of()))),
    }
}

pub fn call_method(this: &Value, name: &str, args: &[Value]) -> Result<Value> {
    match this {
        | Value::String(s) => match STRING_METHODS.get(name) {
            | Some(method) => method(s, args),
            | None => Err(EvalError::Unmodeled(format!("String.prototype.{name}"))),
        },
        | Value::Number(n) => match name {
            | "toString" => number_to_radix_string(*n, args),
            | "toFixed" => to_fixed(*n, args),
            | "valueOf" => Ok(this.clone()),
            | _ => Err(EvalError::Unmodeled(format!("Number.prototype.{name}"))),
        },
        | Value::Bool(_) => match name {
            | "toString" => Ok(Value::String(to_string(this)?)),
            | "valueOf" => Ok(this.clone()),
            | _ => Err(EvalError::Unmodeled(format!("Boolean.prototype.{name}"))),
        },
        | Value::Array(items) => match ARRAY_METHODS.get(name) {
            | Some(method) => method(items, args),
            | None => Err(EvalError::Unmodeled(format!("Array.prototype.{name}"))),
        },
        | Value::Undefined => {
            Err(EvalError::Type(format!("cannot read properties of undefined (reading '{name}')")))
        }
        | _ => Err(EvalError::Unmodeled(format!("method `{name}` of {}", this.type_of()))),
    }
}

/// A relative index as `slice` reads it, clamped to `0..=len`.
fn relative_index(value: &Value, len: usize) -> Result<usize> {
    let int = to_integer(value)?;
    let len = len as f64;
    let index = if int < 0.0 { (len + int).max(0.0) } else { int.min(len) };
    Ok(index as usize)
}

fn clamp_index(value: &Value, len: usize) -> Result<usize> {
    Ok(to_integer(value)?.clamp(0.0, len as f64) as usize)
}

fn units_value(units: &[u16]) -> Value {
    Value::String(JsString::from_units(units.to_vec()))
}

fn find_units(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..].starts_with(needle))
}

fn char_at(s: &JsString, args: &[Value]) -> Result<Value> {
    let pos = to_integer(&arg(args, 0))?;
    if pos < 0.0 || pos >= s.len() as f64 {
        return Ok(Value::from(""));
    }
    Ok(units_value(&s[pos as usize..pos as usize + 1]))
}

fn char_code_at(s: &JsString, args: &[Value]) -> Result<Value> {
    let pos = to_integer(&arg(args, 0))?;
    if pos < 0.0 || pos >= s.len() as f64 {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(f64::from(s[pos as usize])))
}

fn index_of(s: &JsString, args: &[Value]) -> Result<Value> {
    let search = to_string(&arg(args, 0))?;
    let from = clamp_index(&arg(args, 1), s.len())?;
    let found = find_units(s, &search, from);
    Ok(Value::Number(found.map_or(-1.0, |i| i as f64)))
}

fn last_index_of(s: &JsString, args: &[Value]) -> Result<Value> {
    let search = to_string(&arg(args, 0))?;
    let pos = to_number(&arg(args, 1))?;
    let pos = if pos.is_nan() { f64::INFINITY } else { to_integer(&Value::Number(pos))? };
    if search.len() > s.len() {
        return Ok(Value::Number(-1.0));
    }
    let start = pos.clamp(0.0, s.len() as f64) as usize;
    let start = start.min(s.len() - search.len());
    let found = (0..=start).rev().find(|&i| s[i..].starts_with(&search));
    Ok(Value::Number(found.map_or(-1.0, |i| i as f64)))
}

fn str_slice(s: &JsString, args: &[Value]) -> Result<Value> {
    let from = relative_index(&arg(args, 0), s.len())?;
    let to = if is_absent(args, 1) { s.len() } else { relative_index(&arg(args, 1), s.len())? };
    Ok(units_value(if from < to { &s[from..to] } else { &[] }))
}

fn substring(s: &JsString, args: &[Value]) -> Result<Value> {
    let start = clamp_index(&arg(args, 0), s.len())?;
    let end = if is_absent(args, 1) { s.len() } else { clamp_index(&arg(args, 1), s.len())? };
    Ok(units_value(&s[start.min(end)..start.max(end)]))
}

fn substr(s: &JsString, args: &[Value]) -> Result<Value> {
    let start = relative_index(&arg(args, 0), s.len())?;
    let length = if is_absent(args, 1) { f64::INFINITY } else { to_integer(&arg(args, 1))? };
    let end = (start as f64 + length.max(0.0)).min(s.len() as f64) as usize;
    Ok(units_value(if start < end { &s[start..end] } else { &[] }))
}

fn case_mapped(s: &JsString, f: fn(&str) -> String) -> Result<Value> {
    let text = s
        .to_rust_string()
        .ok_or_else(|| EvalError::Unmodeled("case mapping of lone surrogates".to_string()))?;
    Ok(Value::from(f(&text).as_str()))
}

fn to_upper_case(s: &JsString, _: &[Value]) -> Result<Value> {
    case_mapped(s, str::to_uppercase)
}

fn to_lower_case(s: &JsString, _: &[Value]) -> Result<Value> {
    case_mapped(s, str::to_lowercase)
}

fn trim(s: &JsString, _: &[Value]) -> Result<Value> {
    Ok(units_value(trim_units(s)))
}

fn split(s: &JsString, args: &[Value]) -> Result<Value> {
    let limit = (if is_absent(args, 1) { u32::MAX } else { to_uint32(&arg(args, 1))? }) as usize;
    if let Value::RegExp(_) = arg(args, 0) {
        return Err(EvalError::Unmodeled("split by a regular expression".to_string()));
    }
    if is_absent(args, 0) {
        return Ok(Value::from(vec![Value::String(s.clone())]));
    }
    let separator = to_string(&arg(args, 0))?;
    if limit == 0 {
        return Ok(Value::from(Vec::new()));
    }
    let mut parts = Vec::new();
    if separator.is_empty() {
        for unit in s.iter().take(limit) {
            parts.push(units_value(&[*unit]));
        }
        return Ok(Value::from(parts));
    }
    if s.is_empty() {
        return Ok(Value::from(vec![Value::String(s.clone())]));
    }
    let mut start = 0;
    while let Some(found) = find_units(s, &separator, start) {
        parts.push(units_value(&s[start..found]));
        if parts.len() == limit {
            return Ok(Value::from(parts));
        }
        start = found + separator.len();
    }
    parts.push(units_value(&s[start..]));
    Ok(Value::from(parts))
}

fn str_concat(s: &JsString, args: &[Value]) -> Result<Value> {
    Ok(Value::String(s.concat(&concat_all(args)?)))
}

fn str_value(s: &JsString, _: &[Value]) -> Result<Value> {
    Ok(Value::String(s.clone()))
}

fn number_to_radix_string(n: f64, args: &[Value]) -> Result<Value> {
    let radix = if is_absent(args, 0) { 10.0 } else { to_integer(&arg(args, 0))? };
    if !(2.0..=36.0).contains(&radix) {
        return Err(EvalError::Range("toString() radix must be between 2 and 36".to_string()));
    }
    if radix == 10.0 || !n.is_finite() {
        return Ok(Value::from(number_to_string(n).as_str()));
    }
    if n.fract() != 0.0 || n.abs() >= 9007199254740992.0 {
        return Err(EvalError::Unmodeled("fractional or huge radix conversion".to_string()));
    }
    let radix = radix as u64;
    let mut magnitude = n.abs() as u64;
    let mut digits = Vec::new();
    loop {
        let digit = (magnitude % radix) as u32;
        digits.push(char::from_digit(digit, radix as u32).unwrap_or('0'));
        magnitude /= radix;
        if magnitude == 0 {
            break;
        }
    }
    if n < 0.0 {
        digits.push('-');
    }
    let text: String = digits.into_iter().rev().collect();
    Ok(Value::from(text.as_str()))
}

/// `toFixed`, rounding the exact binary value half up.
fn to_fixed(x: f64, args: &[Value]) -> Result<Value> {
    let digits = to_integer(&arg(args, 0))?;
    if !(0.0..=100.0).contains(&digits) {
        return Err(EvalError::Range("toFixed() digits argument must be between 0 and 100".to_string()));
    }
    if !x.is_finite() || x.abs() >= 1e21 {
        return Ok(Value::from(number_to_string(x).as_str()));
    }
    let digits = digits as usize;
    // every finite double has a terminating decimal expansion well within this precision
    let exact = format!("{:.1100}", x.abs());
    let (int, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut kept: Vec<u8> = int.bytes().chain(frac.bytes().take(digits)).collect();
    if frac.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, b'1');
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }
    let split = kept.len() - digits;
    let mut text = String::new();
    if x < 0.0 {
        text.push('-');
    }
    text.push_str(&String::from_utf8_lossy(&kept[..split]));
    if digits > 0 {
        text.push('.');
        text.push_str(&String::from_utf8_lossy(&kept[split..]));
    }
    Ok(Value::from(text.as_str()))
}

fn arr_slice(items: &Rc<Vec<Value>>, args: &[Value]) -> Result<Value> {
    let from = relative_index(&arg(args, 0), items.len())?;
    let to = if is_absent(args, 1) { items.len() } else { relative_index(&arg(args, 1), items.len())? };
    Ok(Value::from(if from < to { items[from..to].to_vec() } else { Vec::new() }))
}

fn arr_index_of(items: &Rc<Vec<Value>>, args: &[Value]) -> Result<Value> {
    let search = arg(args, 0);
    let from = relative_index(&arg(args, 1), items.len())?;
    for (i, item) in items.iter().enumerate().skip(from) {
        if strict_equals(item, &search)? {
            return Ok(Value::Number(i as f64));
        }
    }
    Ok(Value::Number(-1.0))
}

fn callback(args: &[Value]) -> Result<Builtin> {
    match arg(args, 0) {
        | Value::Builtin(f) => Ok(f),
        | other => Err(EvalError::Type(format!("{} is not a function", other.type_of()))),
    }
}

fn for_each(items: &Rc<Vec<Value>>, args: &[Value]) -> Result<Value> {
    let f = callback(args)?;
    for (i, item) in items.iter().enumerate() {
        f.call(&[item.clone(), Value::Number(i as f64), Value::Array(items.clone())])?;
    }
    Ok(Value::Undefined)
}

fn map(items: &Rc<Vec<Value>>, args: &[Value]) -> Result<Value> {
    let f = callback(args)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(f.call(&[item.clone(), Value::Number(i as f64), Value::Array(items.clone())])?);
    }
    Ok(Value::from(out))
}

fn filter(items: &Rc<Vec<Value>>, args: &[Value]) -> Result<Value> {
    let f = callback(args)?;
    let mut out = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let keep = f.call(&[item.clone(), Value::Number(i as f64), Value::Array(items.clone())])?;
        if to_boolean(&keep) {
            out.push(item.clone());
        }
    }
    Ok(Value::from(out))
}

fn reduce(items: &Rc<Vec<Value>>, args: &[Value]) -> Result<Value> {
    let f = callback(args)?;
    let (mut acc, start) = match args.get(1) {
        | Some(init) => (init.clone(), 0),
        | None => match items.first() {
            | Some(first) => (first.clone(), 1),
            | None => {
                return Err(EvalError::Type("reduce of empty array with no initial value".to_string()));
            }
        },
    };
    for (i, item) in items.iter().enumerate().skip(start) {
        acc = f.call(&[acc, item.clone(), Value::Number(i as f64), Value::Array(items.clone())])?;
    }
    Ok(acc)
}
