//! Exact precipitation amounts
//!
//! Readings are decimal inches with at most [`PRECIPITATION_DECIMALS`]
//! fractional digits. [`Inches`] holds them as an integer count of
//! ten-thousandths, so sums are exact and do not depend on the order in which
//! readings are added.

use crate::constants::PRECIPITATION_DECIMALS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

const UNITS_PER_INCH: i64 = 10_i64.pow(PRECIPITATION_DECIMALS as u32);

/// Fixed-point precipitation amount in inches
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Inches(i64);

impl Inches {
    pub const ZERO: Inches = Inches(0);

    /// Amount from a count of ten-thousandths of an inch
    pub const fn from_ten_thousandths(units: i64) -> Self {
        Self(units)
    }

    pub const fn ten_thousandths(self) -> i64 {
        self.0
    }

    /// Parse a plain decimal such as `0.80`, `.5` or `12`
    ///
    /// Trailing zeros beyond the held precision are accepted; any other extra
    /// digit is rejected rather than rounded.
    pub fn parse(value: &str) -> Result<Self, String> {
        let invalid = |reason: &str| format!("invalid precipitation '{}': {}", value, reason);

        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.strip_prefix('+').unwrap_or(value)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }

        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > PRECIPITATION_DECIMALS {
            return Err(invalid("too many decimal places"));
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|e| invalid(&e.to_string()))?
        };
        let fraction_units = format!("{:0<width$}", fraction, width = PRECIPITATION_DECIMALS)
            .parse::<i64>()
            .map_err(|e| invalid(&e.to_string()))?;

        let units = whole_units
            .checked_mul(UNITS_PER_INCH)
            .and_then(|units| units.checked_add(fraction_units))
            .ok_or_else(|| invalid("out of range"))?;

        Ok(Self(if negative { -units } else { units }))
    }

    /// Nearest `f64` to the exact amount
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / UNITS_PER_INCH as f64
    }
}

impl FromStr for Inches {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Add for Inches {
    type Output = Inches;

    fn add(self, rhs: Inches) -> Inches {
        Inches(self.0 + rhs.0)
    }
}

impl AddAssign for Inches {
    fn add_assign(&mut self, rhs: Inches) {
        self.0 += rhs.0;
    }
}

impl Sum for Inches {
    fn sum<I: Iterator<Item = Inches>>(iter: I) -> Self {
        iter.fold(Inches::ZERO, Add::add)
    }
}

impl fmt::Display for Inches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}
