use unminify_syntax::JsString;

/// Expands the escapes of a quoted string literal (quotes included) into code units.
pub fn unescape_string(lit: &str) -> Result<JsString, String> {
    let inner = lit
        .get(1..lit.len().saturating_sub(1))
        .ok_or_else(|| format!("unterminated string {lit}"))?;
    let mut out = JsString::new();
    let mut chars = inner.chars().peekable();
    let mut buf = [0u16; 2];
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push_units(c.encode_utf16(&mut buf));
            continue;
        }
        let Some(e) = chars.next() else {
            return Err(format!("dangling escape in {lit}"));
        };
        match e {
            | 'n' => out.push_units(&[0x0A]),
            | 't' => out.push_units(&[0x09]),
            | 'r' => out.push_units(&[0x0D]),
            | 'b' => out.push_units(&[0x08]),
            | 'f' => out.push_units(&[0x0C]),
            | 'v' => out.push_units(&[0x0B]),
            // line continuations
            | '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            | '\n' | '\u{2028}' | '\u{2029}' => {}
            | 'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let unit = parse_hex(&hex, 2).ok_or_else(|| format!("bad \\x escape in {lit}"))?;
                out.push_units(&[unit as u16]);
            }
            | 'u' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    let cp = u32::from_str_radix(&hex, 16)
                        .ok()
                        .filter(|cp| !hex.is_empty() && *cp <= 0x10FFFF)
                        .ok_or_else(|| format!("bad \\u{{}} escape in {lit}"))?;
                    match char::from_u32(cp) {
                        | Some(c) => out.push_units(c.encode_utf16(&mut buf)),
                        // a lone surrogate spelled with braces
                        | None => out.push_units(&[cp as u16]),
                    }
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    let unit =
                        parse_hex(&hex, 4).ok_or_else(|| format!("bad \\u escape in {lit}"))?;
                    out.push_units(&[unit as u16]);
                }
            }
            | '0'..='7' => {
                // legacy octal, at most three digits and at most 0o377
                let mut value = e.to_digit(8).unwrap_or(0);
                let max_digits = if e <= '3' { 2 } else { 1 };
                for _ in 0..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        | Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        | None => break,
                    }
                }
                out.push_units(&[value as u16]);
            }
            | other => out.push_units(other.encode_utf16(&mut buf)),
        }
    }
    Ok(out)
}

fn parse_hex(hex: &str, len: usize) -> Option<u32> {
    if hex.len() != len {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// The value of a numeric literal in any of its spellings.
pub fn parse_number(lit: &str) -> Option<f64> {
    let radix = |digits: &str, radix: u32| -> Option<f64> {
        if digits.is_empty() {
            return None;
        }
        digits.chars().try_fold(0f64, |acc, c| Some(acc * radix as f64 + c.to_digit(radix)? as f64))
    };
    let lower = lit.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return radix(hex, 16);
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return radix(oct, 8);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return radix(bin, 2);
    }
    // legacy octal: a leading zero followed only by octal digits
    if lit.len() > 1 && lit.starts_with('0') && lit.chars().all(|c| c.is_digit(8)) {
        return radix(&lit[1..], 8);
    }
    lit.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes() {
        let s = unescape_string(r#"'a\x41B\u{1F600}\n\'\\\101'"#).unwrap();
        assert_eq!(s.to_rust_string().unwrap(), "aAB\u{1F600}\n'\\A");
        let lone = unescape_string(r#""\uD800""#).unwrap();
        assert_eq!(lone.units(), &[0xD800]);
        assert!(unescape_string(r#""\x4""#).is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("0x1f"), Some(31.0));
        assert_eq!(parse_number("0X1F"), Some(31.0));
        assert_eq!(parse_number("0o17"), Some(15.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("017"), Some(15.0));
        assert_eq!(parse_number("019"), Some(19.0));
        assert_eq!(parse_number("1.5e3"), Some(1500.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
    }
}
