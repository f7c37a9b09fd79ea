use serde::Serialize;
use std::fmt;
use std::ops::Add;

/// A number read from a text line; integers stay exact until mixed with floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub const ZERO: Numeric = Numeric::Int(0);

    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Int(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::ZERO
    }
}

impl Add for Numeric {
    type Output = Numeric;

    fn add(self, rhs: Numeric) -> Numeric {
        match (self, rhs) {
            (Numeric::Int(a), Numeric::Int(b)) => match a.checked_add(b) {
                Some(sum) => Numeric::Int(sum),
                None => Numeric::Float(a as f64 + b as f64),
            },
            (a, b) => Numeric::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Strict parse: integer first, then float. Blank or non-numeric gives `None`.
pub fn try_parse_numeric(value: &str) -> Option<Numeric> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(Numeric::Int(v));
    }
    trimmed.parse::<f64>().ok().map(Numeric::Float)
}

/// Lenient parse used when adding files: anything non-numeric counts as zero.
pub fn parse_numeric_or_zero(value: &str) -> Numeric {
    try_parse_numeric(value).unwrap_or(Numeric::ZERO)
}

/// Integer syntax: optional sign, then ASCII digits. Not limited to `i64`.
pub fn is_integer(value: &str) -> bool {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_float(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}
