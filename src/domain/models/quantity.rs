//! Dimensioned resource quantities (`100m`, `50Mi`, `2`, `1.5Gi`).
//!
//! Values are kept both as the operator's canonical text and as an exact
//! count of nano-units so comparisons and conversions never go through floats.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const NANOS_PER_UNIT: i128 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity '{input}': {reason}")]
pub struct QuantityError {
    pub input: String,
    pub reason: &'static str,
}

/// A non-negative resource quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    text: String,
    nanos: i128,
}

impl Quantity {
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let fail = |reason| QuantityError {
            input: input.to_string(),
            reason,
        };

        let text = input.trim();
        if text.is_empty() {
            return Err(fail("empty quantity"));
        }
        if text.starts_with('-') {
            return Err(fail("quantities cannot be negative"));
        }
        let unsigned = text.strip_prefix('+').unwrap_or(text);

        let split = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(split);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(fail("missing numeric value"));
        }
        if fraction.contains('.') {
            return Err(fail("more than one decimal point"));
        }

        let scale = suffix_scale(suffix).ok_or_else(|| fail("unknown suffix"))?;

        let digits = format!("{whole}{fraction}");
        let mantissa: i128 = digits.parse().map_err(|_| fail("value out of range"))?;
        let divisor = u32::try_from(fraction.len())
            .ok()
            .and_then(|len| 10_i128.checked_pow(len))
            .ok_or_else(|| fail("too many fractional digits"))?;

        let scaled = mantissa
            .checked_mul(scale)
            .ok_or_else(|| fail("value out of range"))?;
        // Sub-nano remainders round up.
        let nanos = scaled / divisor + i128::from(scaled % divisor != 0);

        Ok(Self {
            text: text.to_string(),
            nanos,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Value in milli-units, rounded up (`100m` → 100, `1` → 1000).
    pub fn milli_value(&self) -> i128 {
        ceil_div(self.nanos, 1_000_000)
    }

    /// Value in whole units, rounded up (`50Mi` → 52428800).
    pub fn value(&self) -> i128 {
        ceil_div(self.nanos, NANOS_PER_UNIT)
    }

    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }
}

const fn ceil_div(value: i128, divisor: i128) -> i128 {
    value / divisor + (value % divisor != 0) as i128
}

/// Multiplier from one suffixed unit to nano-units.
fn suffix_scale(suffix: &str) -> Option<i128> {
    let decimal_exponent = match suffix {
        "n" => 0,
        "u" => 3,
        "m" => 6,
        "" => 9,
        "k" => 12,
        "M" => 15,
        "G" => 18,
        "T" => 21,
        "P" => 24,
        "E" => 27,
        _ => {
            let power = match suffix {
                "Ki" => 10,
                "Mi" => 20,
                "Gi" => 30,
                "Ti" => 40,
                "Pi" => 50,
                "Ei" => 60,
                _ => return None,
            };
            return Some((1_i128 << power) * NANOS_PER_UNIT);
        }
    };
    Some(10_i128.pow(decimal_exponent))
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Option<Quantity>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a resource quantity such as \"100m\" or \"50Mi\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            return Ok(None);
        }
        Quantity::parse(v).map(Some).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(QuantityVisitor)?
            .ok_or_else(|| de::Error::custom("empty quantity"))
    }
}

/// Serde adapter for optional quantities where an empty string means unset.
pub mod optional {
    use super::{Quantity, QuantityVisitor};
    use serde::{Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Quantity>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map_or("", Quantity::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Quantity>, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}
