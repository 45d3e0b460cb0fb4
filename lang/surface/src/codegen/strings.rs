use unminify_syntax::{JsString, canonical_numeric_key, is_identifier_name, number_to_string};

/// A single-quoted string literal, escaping everything outside printable ASCII.
pub fn quote(value: &JsString) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for cp in value.code_points() {
        match cp {
            | 0x0A => out.push_str("\\n"),
            | 0x0D => out.push_str("\\r"),
            | 0x09 => out.push_str("\\t"),
            | 0x08 => out.push_str("\\b"),
            | 0x0C => out.push_str("\\f"),
            | 0x0B => out.push_str("\\v"),
            | 0x27 => out.push_str("\\'"),
            | 0x5C => out.push_str("\\\\"),
            | 0x20..=0x7E => out.push(char::from(cp as u8)),
            | 0..=0xFF => out.push_str(&format!("\\x{:02X}", cp)),
            | 0x100..=0xFFFF => out.push_str(&format!("\\u{:04X}", cp)),
            | _ => out.push_str(&format!("\\u{{{:X}}}", cp)),
        }
    }
    out.push('\'');
    out
}

/// A property key: bare when it is a name, a number when it spells one, quoted otherwise.
pub fn property_key(key: &str) -> String {
    if is_identifier_name(key) {
        return key.to_string();
    }
    match canonical_numeric_key(key) {
        | Some(n) if n >= 0.0 => number_to_string(n),
        | _ => quote(&JsString::from(key)),
    }
}

/// Numbers as the language spells them, keeping the sign of zero.
pub fn number(value: f64) -> String {
    if value == 0.0 && value.is_sign_negative() {
        return "-0".to_string();
    }
    number_to_string(value)
}
