use std::collections::HashMap;
use std::fmt;

/// Named arguments for one formatting call.
pub type Params = HashMap<String, Value>;

/// An argument value supplied to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    /// Integer reading used by `plural` and `selectordinal`.
    ///
    /// Floats truncate toward zero; strings must hold a signed decimal
    /// integer, surrounding whitespace allowed.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(f) => {
                let t = f.trunc();
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
                if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Some(t as i64)
                } else {
                    None
                }
            }
            Value::String(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => {
                if x.is_nan() {
                    f.write_str("nan")
                } else if x.is_infinite() {
                    f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
                } else if x.fract() == 0.0 {
                    // Integral floats keep a visible fractional part: 2.0, not 2.
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
