use derive_more::{Deref, From};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A script string: a sequence of UTF-16 code units, lone surrogates included.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, From)]
pub struct JsString(Vec<u16>);

impl JsString {
    pub fn new() -> Self {
        JsString(Vec::new())
    }
    pub fn from_units(units: Vec<u16>) -> Self {
        JsString(units)
    }
    pub fn units(&self) -> &[u16] {
        &self.0
    }
    pub fn into_units(self) -> Vec<u16> {
        self.0
    }
    pub fn push_str(&mut self, s: &str) {
        self.0.extend(s.encode_utf16());
    }
    pub fn push_units(&mut self, units: &[u16]) {
        self.0.extend_from_slice(units);
    }
    pub fn concat(&self, other: &JsString) -> JsString {
        let mut units = Vec::with_capacity(self.0.len() + other.0.len());
        units.extend_from_slice(&self.0);
        units.extend_from_slice(&other.0);
        JsString(units)
    }
    /// The exact Rust string, if the contents hold no lone surrogate.
    pub fn to_rust_string(&self) -> Option<String> {
        String::from_utf16(&self.0).ok()
    }
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
    /// Decodes into code points, keeping lone surrogates as they are.
    pub fn code_points(&self) -> Vec<u32> {
        char::decode_utf16(self.0.iter().copied())
            .map(|r| match r {
                | Ok(c) => c as u32,
                | Err(e) => e.unpaired_surrogate() as u32,
            })
            .collect()
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.encode_utf16().collect())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

/// Number-to-String as the language defines it: shortest round-trip digits, exponent
/// notation outside `1e-7 <= |x| < 1e21`.
pub fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x < 0.0 {
        return format!("-{}", number_to_string(-x));
    }
    // Rust's exponent form already carries the shortest round-trip digits.
    let repr = format!("{:e}", x);
    let (mantissa, exponent) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i64;
    let n = exponent + 1;
    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", e.abs())
        }
    }
}

static IDENTIFIER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern"));

/// Whether `s` can follow a `.` in a member access (reserved words included).
pub fn is_identifier_name(s: &str) -> bool {
    IDENTIFIER_NAME.is_match(s)
}

/// The index a property key denotes on an array or string, if it is a canonical one.
pub fn array_index(key: &str) -> Option<usize> {
    let index: u32 = key.parse().ok()?;
    if index == u32::MAX || index.to_string() != key {
        return None;
    }
    Some(index as usize)
}

/// The number a property key spells when it is a canonical numeric string (`"1"`, `"1.5"`).
pub fn canonical_numeric_key(key: &str) -> Option<f64> {
    let value: f64 = key.parse().ok()?;
    (value.is_finite() && value >= 0.0 && number_to_string(value) == key).then_some(value)
}
