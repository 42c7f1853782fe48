//! Canonical JSON rendering for store addressing.
//!
//! Storage keys embed argument values rendered with this module, so the output
//! must be byte-for-byte stable: object keys sorted by UTF-16 code units at every
//! level, arrays in original order, numbers in their shortest round-trip form.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Render a JSON value to its canonical string form.
pub fn to_canonical_string(data: &JsonValue) -> String {
    let mut out = String::new();
    write_value(data, &mut out);
    out
}

fn write_value(data: &JsonValue, out: &mut String) {
    match data {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(true) => out.push_str("true"),
        JsonValue::Bool(false) => out.push_str("false"),
        JsonValue::Number(n) => out.push_str(&canonical_number(n)),
        JsonValue::String(s) => write_string(s, out),
        JsonValue::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        JsonValue::Object(map) => {
            let mut pairs: Vec<(&String, &JsonValue)> = map.iter().collect();
            pairs.sort_by(|a, b| compare_keys(a.0, b.0));

            out.push('{');
            for (i, (k, v)) in pairs.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(k, out);
                out.push(':');
                write_value(v, out);
            }
            out.push('}');
        }
    }
}

/// Compare keys by UTF-16 code units, the order JavaScript's default sort uses.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

fn canonical_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => canonical_float(f),
        None => n.to_string(),
    }
}

fn canonical_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return (f as i64).to_string();
    }

    let abs = f.abs();
    if abs >= 1e21 || abs < 1e-6 {
        return canonical_exponential(&format!("{:e}", f));
    }

    let s = format!("{}", f);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0');
        return trimmed.trim_end_matches('.').to_string();
    }
    s
}

fn canonical_exponential(s: &str) -> String {
    let Some((mantissa, exponent)) = s.split_once(['e', 'E']) else {
        return s.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };

    if exponent >= 0 {
        format!("{}e+{}", mantissa, exponent)
    } else {
        format!("{}e{}", mantissa, exponent)
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c < '\u{0020}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
