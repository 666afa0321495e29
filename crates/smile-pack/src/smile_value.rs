//! [`SmileValue`], the value tree shared by the Smile codec and the text bridge.

use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// One JSON document held in memory.
///
/// Numbers keep the width class they were read with, so a value decoded from
/// a 32-bit Smile integer comes back as [`SmileValue::Int`] and a 64-bit
/// float as [`SmileValue::Double`].
#[derive(Debug, Clone, PartialEq)]
pub enum SmileValue {
    Null,
    Bool(bool),
    /// 32-bit integer (also used for Smile small ints)
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// Integer of any width
    BigInteger(BigInt),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Arbitrary-scale decimal: `unscaled * 10^-scale`
    BigDecimal { unscaled: BigInt, scale: i32 },
    Str(String),
    Array(Vec<SmileValue>),
    /// Object (ordered key-value pairs)
    Object(Vec<(String, SmileValue)>),
}

impl SmileValue {
    /// Narrowest integer class holding `int`.
    pub fn integer(int: impl Into<BigInt>) -> Self {
        let int = int.into();
        if let Some(i) = int.to_i32() {
            SmileValue::Int(i)
        } else if let Some(l) = int.to_i64() {
            SmileValue::Long(l)
        } else {
            SmileValue::BigInteger(int)
        }
    }

    /// Maps a JSON number literal onto the value model.
    ///
    /// Integer literals keep every digit: they take the narrowest of `Int`,
    /// `Long` and `BigInteger`. Literals with a fraction or exponent become
    /// `Double`.
    pub fn from_number(number: &serde_json::Number) -> Self {
        if let Some(l) = number.as_i64() {
            return SmileValue::integer(l);
        }
        let literal = number.to_string();
        let integral = !literal.contains(['.', 'e', 'E']);
        match BigInt::from_str(&literal) {
            Ok(int) if integral => SmileValue::integer(int),
            _ => SmileValue::Double(number.as_f64().unwrap_or(f64::NAN)),
        }
    }

    /// Builds an object from borrowed keys, keeping their order.
    pub fn object<'k>(fields: impl IntoIterator<Item = (&'k str, SmileValue)>) -> Self {
        SmileValue::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SmileValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SmileValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up `key` in an object. Later duplicates win, as in JSON parsers.
    pub fn get(&self, key: &str) -> Option<&SmileValue> {
        match self {
            SmileValue::Object(fields) => fields
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for SmileValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => SmileValue::Null,
            serde_json::Value::Bool(b) => SmileValue::Bool(b),
            serde_json::Value::Number(n) => SmileValue::from_number(&n),
            serde_json::Value::String(s) => SmileValue::Str(s),
            serde_json::Value::Array(arr) => {
                SmileValue::Array(arr.into_iter().map(SmileValue::from).collect())
            }
            serde_json::Value::Object(obj) => SmileValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, SmileValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for SmileValue {
    fn from(b: bool) -> Self {
        SmileValue::Bool(b)
    }
}

impl From<i32> for SmileValue {
    fn from(i: i32) -> Self {
        SmileValue::Int(i)
    }
}

impl From<i64> for SmileValue {
    fn from(l: i64) -> Self {
        SmileValue::Long(l)
    }
}

impl From<BigInt> for SmileValue {
    fn from(int: BigInt) -> Self {
        SmileValue::BigInteger(int)
    }
}

impl From<f64> for SmileValue {
    fn from(d: f64) -> Self {
        SmileValue::Double(d)
    }
}

impl From<&str> for SmileValue {
    fn from(s: &str) -> Self {
        SmileValue::Str(s.to_owned())
    }
}

impl From<String> for SmileValue {
    fn from(s: String) -> Self {
        SmileValue::Str(s)
    }
}
