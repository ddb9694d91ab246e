//! Kubernetes resource quantities.
//!
//! Quantities arrive as strings such as `"1500m"`, `"3912Mi"` or `"2"`. This
//! module parses them once into a base-unit value and exposes the rounded
//! projections the dashboard needs (milli-units, whole units, decimal scales).
//! All projections round up, matching how the API server reports them.

use std::fmt;

use thiserror::Error;

/// Decimal scale exponents used with [`Quantity::scaled_value`].
pub mod scale {
    pub const MILLI: i32 = -3;
    pub const MEGA: i32 = 6;
    pub const GIGA: i32 = 9;
}

/// Error returned for a malformed quantity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity '{input}': {reason}")]
pub struct QuantityError {
    pub input: String,
    pub reason: &'static str,
}

/// A parsed resource quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    raw: String,
    value: f64,
}

const BINARY_SUFFIXES: [(&str, f64); 6] = [
    ("Ki", 1_024.0),
    ("Mi", 1_048_576.0),
    ("Gi", 1_073_741_824.0),
    ("Ti", 1_099_511_627_776.0),
    ("Pi", 1_125_899_906_842_624.0),
    ("Ei", 1_152_921_504_606_846_976.0),
];

const DECIMAL_SUFFIXES: [(&str, f64); 9] = [
    ("n", 1e-9),
    ("u", 1e-6),
    ("m", 1e-3),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
];

impl Quantity {
    /// Parses a quantity string.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let raw = input.trim();
        let err = |reason| QuantityError {
            input: input.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Err(err("empty quantity"));
        }

        let (number, multiplier) = split_suffix(raw);
        if number.is_empty() {
            return Err(err("missing number"));
        }
        let numeric: f64 = number.parse().map_err(|_| err("not a number"))?;
        let value = numeric * multiplier;
        if !value.is_finite() {
            return Err(err("out of range"));
        }

        Ok(Self {
            raw: raw.to_string(),
            value,
        })
    }

    /// The zero quantity, displayed as `"0"`.
    pub fn zero() -> Self {
        Self {
            raw: "0".to_string(),
            value: 0.0,
        }
    }

    /// Value in base units (cores, bytes).
    pub fn as_f64(&self) -> f64 {
        self.value
    }

    /// Value in milli-units, rounded up.
    pub fn milli_value(&self) -> i64 {
        self.scaled_value(scale::MILLI)
    }

    /// Value in whole base units, rounded up.
    pub fn value(&self) -> i64 {
        self.scaled_value(0)
    }

    /// Value divided by `10^scale`, rounded up.
    pub fn scaled_value(&self, scale: i32) -> i64 {
        let scaled = self.value / 10f64.powi(scale);
        // Parsing introduces float noise ("1.1" * 1000 = 1100.0000000000002);
        // treat anything within 1e-9 of an integer as that integer.
        let nearest = scaled.round();
        if (scaled - nearest).abs() < 1e-9 {
            nearest as i64
        } else {
            scaled.ceil() as i64
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_suffix(raw: &str) -> (&str, f64) {
    for (suffix, multiplier) in BINARY_SUFFIXES {
        if let Some(number) = raw.strip_suffix(suffix) {
            return (number, multiplier);
        }
    }
    // "1e3" and "1E3" are exponents, not the E (exa) suffix.
    if looks_like_exponent(raw) {
        return (raw, 1.0);
    }
    for (suffix, multiplier) in DECIMAL_SUFFIXES {
        if let Some(number) = raw.strip_suffix(suffix) {
            return (number, multiplier);
        }
    }
    (raw, 1.0)
}

fn looks_like_exponent(raw: &str) -> bool {
    match raw.find(['e', 'E']) {
        Some(pos) => {
            let exp = &raw[pos + 1..];
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && exp.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Parses an optional API quantity, treating absence as zero.
pub fn parse_or_zero(value: Option<&str>) -> Result<Quantity, QuantityError> {
    match value {
        Some(s) => Quantity::parse(s),
        None => Ok(Quantity::zero()),
    }
}
