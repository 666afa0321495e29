use serde::Deserialize;

use crate::smile::constants::MAX_NESTING_DEPTH;
use crate::SmileValue;

use super::JsonError;

/// Parses one JSON document. Trailing non-whitespace is an error.
///
/// Integer literals become `Int`, `Long` or `BigInteger`, whichever is the
/// narrowest that holds every digit. Every other number becomes `Double`.
/// Nesting is capped at the same depth the Smile decoder accepts.
pub fn parse(text: &str) -> Result<SmileValue, JsonError> {
    parse_slice(text.as_bytes())
}

pub fn parse_slice(bytes: &[u8]) -> Result<SmileValue, JsonError> {
    check_depth(bytes)?;
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = serde_json::Value::deserialize(&mut de)?;
    de.end()?;
    Ok(SmileValue::from(value))
}

/// Scans bracket depth outside of string literals. Malformed text is left
/// for the parser to report.
fn check_depth(bytes: &[u8]) -> Result<(), JsonError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let (mut line, mut line_start) = (1, 0);
    for (offset, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'\n' => {
                line += 1;
                line_start = offset + 1;
            }
            b'[' | b'{' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(JsonError::DepthLimitExceeded {
                        limit: MAX_NESTING_DEPTH,
                        line,
                        column: offset - line_start + 1,
                    });
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn integer_width_classes() {
        assert_eq!(parse("7").unwrap(), SmileValue::Int(7));
        assert_eq!(parse("-2147483648").unwrap(), SmileValue::Int(i32::MIN));
        assert_eq!(parse("2147483648").unwrap(), SmileValue::Long(2_147_483_648));
        assert_eq!(
            parse("18446744073709551615").unwrap(),
            SmileValue::BigInteger(BigInt::from(u64::MAX))
        );
        assert_eq!(
            parse("-123456789012345678901234567890").unwrap(),
            SmileValue::BigInteger(-BigInt::from(123456789012345678901234567890u128))
        );
        assert_eq!(parse("1.0").unwrap(), SmileValue::Double(1.0));
        assert_eq!(parse("1e2").unwrap(), SmileValue::Double(100.0));
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn nesting_past_the_default_recursion_limit() {
        let mut value = parse(&nested(200)).unwrap();
        let mut levels = 0;
        while let SmileValue::Array(mut items) = value {
            levels += 1;
            value = items.pop().unwrap_or(SmileValue::Null);
        }
        assert_eq!(levels, 200);
    }

    #[test]
    fn nesting_limit() {
        let text = format!("\n {}", nested(MAX_NESTING_DEPTH + 1));
        let err = parse(&text).unwrap_err();
        assert!(matches!(
            err,
            JsonError::DepthLimitExceeded { limit: MAX_NESTING_DEPTH, .. }
        ));
        assert_eq!(err.location(), (2, MAX_NESTING_DEPTH + 2));

        // brackets inside strings do not count
        let quoted = format!(r#"["{}\"{}"]"#, "[".repeat(2000), "{".repeat(2000));
        assert!(parse(&quoted).is_ok());
    }

    #[test]
    fn member_order_is_preserved() {
        let value = parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let SmileValue::Object(members) = value else {
            panic!("expected object");
        };
        let keys: Vec<&str> = members.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn malformed_text_is_rejected() {
        for text in ["", "{", "[1,]", "{\"a\" 1}", "nul", "1 2"] {
            let err = parse(text).unwrap_err();
            assert!(matches!(err, JsonError::Syntax(_)), "{text:?}");
        }
        assert_eq!(parse("[1,\n]").unwrap_err().location().0, 2);
    }

    #[test]
    fn slice_input() {
        assert_eq!(
            parse_slice(b"[true, null]").unwrap(),
            SmileValue::Array(vec![SmileValue::Bool(true), SmileValue::Null])
        );
        assert!(parse_slice(b"\"\xff\"").is_err());
    }
}
