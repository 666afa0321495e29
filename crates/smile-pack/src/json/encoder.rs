//! `JsonEncoder` renders a [`SmileValue`] as JSON text, compact or indented.
//!
//! Integer classes print as integers. Floating classes always keep a
//! fraction or exponent (`123.0`, `1e300`) so their kind survives a trip
//! back through a JSON parser. Non-finite floats have no JSON form and
//! print as `null`.

use num_bigint::{BigInt, Sign};

use crate::SmileValue;

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct JsonEncoder {
    out: String,
    pretty: bool,
    level: usize,
}

/// Renders `value` as compact JSON. Never fails.
pub fn render(value: &SmileValue) -> String {
    JsonEncoder::new().encode(value)
}

/// Renders `value` with two-space indentation, one element or member per
/// line.
pub fn render_pretty(value: &SmileValue) -> String {
    JsonEncoder::pretty().encode(value)
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn encode(&mut self, value: &SmileValue) -> String {
        self.out.clear();
        self.level = 0;
        self.write_any(value);
        std::mem::take(&mut self.out)
    }

    pub fn write_any(&mut self, value: &SmileValue) {
        match value {
            SmileValue::Null => self.write_null(),
            SmileValue::Bool(b) => self.write_boolean(*b),
            SmileValue::Int(i) => self.out.push_str(&i.to_string()),
            SmileValue::Long(l) => self.out.push_str(&l.to_string()),
            SmileValue::BigInteger(i) => self.out.push_str(&i.to_string()),
            SmileValue::Float(f) => self.write_float(*f),
            SmileValue::Double(d) => self.write_double(*d),
            SmileValue::BigDecimal { unscaled, scale } => {
                self.out.push_str(&format_big_decimal(unscaled, *scale))
            }
            SmileValue::Str(s) => self.write_str(s),
            SmileValue::Array(arr) => self.write_arr(arr),
            SmileValue::Object(obj) => self.write_obj(obj),
        }
    }

    pub fn write_null(&mut self) {
        self.out.push_str("null");
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.out.push_str(if b { "true" } else { "false" });
    }

    pub fn write_float(&mut self, float: f32) {
        if float.is_finite() {
            self.out.push_str(&format!("{float:?}"));
        } else {
            self.write_null();
        }
    }

    pub fn write_double(&mut self, double: f64) {
        if double.is_finite() {
            // Debug is the shortest round-trip form and keeps ".0" / "eN"
            self.out.push_str(&format!("{double:?}"));
        } else {
            self.write_null();
        }
    }

    /// Write a JSON-encoded string (with escaping).
    pub fn write_str(&mut self, s: &str) {
        let plain = s
            .bytes()
            .all(|b| (32..=126).contains(&b) && b != b'"' && b != b'\\');
        if plain {
            self.out.reserve(s.len() + 2);
            self.out.push('"');
            self.out.push_str(s);
            self.out.push('"');
            return;
        }
        self.out.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{08}' => self.out.push_str("\\b"),
                '\u{0c}' => self.out.push_str("\\f"),
                c if (c as u32) < 0x20 => self.out.push_str(&format!("\\u{:04x}", c as u32)),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    /// Line break plus indentation for the current level; nothing when
    /// compact.
    fn newline(&mut self) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..self.level {
                self.out.push_str(INDENT);
            }
        }
    }

    pub fn write_arr(&mut self, arr: &[SmileValue]) {
        self.out.push('[');
        if !arr.is_empty() {
            self.level += 1;
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline();
                self.write_any(item);
            }
            self.level -= 1;
            self.newline();
        }
        self.out.push(']');
    }

    pub fn write_obj(&mut self, obj: &[(String, SmileValue)]) {
        self.out.push('{');
        if !obj.is_empty() {
            self.level += 1;
            for (i, (key, val)) in obj.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline();
                self.write_str(key);
                self.out.push_str(if self.pretty { ": " } else { ":" });
                self.write_any(val);
            }
            self.level -= 1;
            self.newline();
        }
        self.out.push('}');
    }
}

/// Plain notation when `scale >= 0` and the adjusted exponent is at least
/// -6, scientific (`1.5E+3`) otherwise.
fn format_big_decimal(unscaled: &BigInt, scale: i32) -> String {
    let digits = unscaled.magnitude().to_string();
    let adjusted = digits.len() as i64 - 1 - scale as i64;
    let mut out = String::with_capacity(digits.len() + 8);
    if unscaled.sign() == Sign::Minus {
        out.push('-');
    }
    if scale >= 0 && adjusted >= -6 {
        let scale = scale as usize;
        if scale == 0 {
            out.push_str(&digits);
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            out.push_str(int);
            out.push('.');
            out.push_str(frac);
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(scale - digits.len()));
            out.push_str(&digits);
        }
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('E');
        if adjusted >= 0 {
            out.push('+');
        }
        out.push_str(&adjusted.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(render(&SmileValue::Int(123)), "123");
        assert_eq!(render(&SmileValue::Long(-9_000_000_000)), "-9000000000");
        assert_eq!(
            render(&SmileValue::BigInteger(BigInt::from(u64::MAX))),
            "18446744073709551615"
        );
        assert_eq!(
            render(&SmileValue::BigInteger(-(BigInt::from(1) << 100u32))),
            "-1267650600228229401496703205376"
        );
        assert_eq!(render(&SmileValue::Double(123.0)), "123.0");
        assert_eq!(render(&SmileValue::Double(123.123)), "123.123");
        assert_eq!(render(&SmileValue::Double(1e300)), "1e300");
        assert_eq!(render(&SmileValue::Float(1.5)), "1.5");
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        assert_eq!(render(&SmileValue::Double(f64::NAN)), "null");
        assert_eq!(render(&SmileValue::Double(f64::INFINITY)), "null");
        assert_eq!(render(&SmileValue::Float(f32::NEG_INFINITY)), "null");
    }

    #[test]
    fn big_decimal_notation() {
        let d = |unscaled: i64, scale| {
            render(&SmileValue::BigDecimal {
                unscaled: BigInt::from(unscaled),
                scale,
            })
        };
        assert_eq!(d(12345, 2), "123.45");
        assert_eq!(d(-12345, 2), "-123.45");
        assert_eq!(d(5, 3), "0.005");
        assert_eq!(d(123, 0), "123");
        assert_eq!(d(1, 8), "1E-8");
        assert_eq!(d(1, -3), "1E+3");
        assert_eq!(d(15, -2), "1.5E+3");

        let wide = SmileValue::BigDecimal {
            unscaled: BigInt::from(1) << 100,
            scale: 10,
        };
        assert_eq!(render(&wide), "126765060022822940149.6703205376");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(render(&SmileValue::from("plain")), r#""plain""#);
        assert_eq!(
            render(&SmileValue::from("a\"b\\c\n\u{1}é")),
            r#""a\"b\\c\n\u0001é""#
        );
    }

    #[test]
    fn containers_are_compact() {
        let value = SmileValue::object([
            ("name", SmileValue::from("Clark Kent")),
            ("age", SmileValue::Int(35)),
            ("tags", SmileValue::Array(vec![])),
            ("nested", SmileValue::Object(vec![])),
        ]);
        assert_eq!(
            render(&value),
            r#"{"name":"Clark Kent","age":35,"tags":[],"nested":{}}"#
        );
    }

    #[test]
    fn pretty_output_indents_and_keeps_big_numbers() {
        let value = SmileValue::object([
            ("big", SmileValue::BigInteger(BigInt::from(1) << 100)),
            (
                "list",
                SmileValue::Array(vec![SmileValue::Double(1.0), SmileValue::Array(vec![])]),
            ),
            ("empty", SmileValue::Object(vec![])),
        ]);
        assert_eq!(
            render_pretty(&value),
            concat!(
                "{\n",
                "  \"big\": 1267650600228229401496703205376,\n",
                "  \"list\": [\n    1.0,\n    []\n  ],\n",
                "  \"empty\": {}\n",
                "}"
            )
        );
        assert_eq!(render_pretty(&SmileValue::Int(7)), "7");

        // reusable across documents
        let mut encoder = JsonEncoder::pretty();
        let first = encoder.encode(&value);
        assert_eq!(encoder.encode(&value), first);
    }
}
