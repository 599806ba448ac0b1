//! Fixed-point storage sizes.
//!
//! Sizes are kept as whole hundredths of a gigabyte so that summing many
//! tables never drifts the way repeated `f64` addition does.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const BYTES_PER_GB: u128 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SizeGb(u64);

impl SizeGb {
    pub const ZERO: SizeGb = SizeGb(0);

    /// Rounds half away from zero to two decimals. Negative, NaN and
    /// infinite inputs are not sizes.
    pub fn from_gb(gb: f64) -> Option<Self> {
        if !gb.is_finite() || gb < 0.0 {
            return None;
        }
        Some(Self((gb * 100.0).round() as u64))
    }

    pub fn from_bytes(bytes: u64) -> Self {
        let hundredths = (u128::from(bytes) * 100 + BYTES_PER_GB / 2) / BYTES_PER_GB;
        Self(hundredths as u64)
    }

    pub fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(self) -> u64 {
        self.0
    }

    pub fn as_gb(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Signed change going from `self` to `later`.
    pub fn delta_to(self, later: SizeGb) -> SizeDelta {
        SizeDelta(later.0 as i64 - self.0 as i64)
    }
}

impl Add for SizeGb {
    type Output = SizeGb;

    fn add(self, rhs: SizeGb) -> SizeGb {
        SizeGb(self.0.saturating_add(rhs.0))
    }
}

impl Sum for SizeGb {
    fn sum<I: Iterator<Item = SizeGb>>(iter: I) -> Self {
        iter.fold(SizeGb::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a SizeGb> for SizeGb {
    fn sum<I: Iterator<Item = &'a SizeGb>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for SizeGb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for SizeGb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_gb())
    }
}

impl<'de> Deserialize<'de> for SizeGb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let gb = f64::deserialize(deserializer)?;
        SizeGb::from_gb(gb)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid size in GB: {}", gb)))
    }
}

/// Signed size difference between two assessments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeDelta(i64);

impl SizeDelta {
    pub fn hundredths(self) -> i64 {
        self.0
    }

    pub fn as_gb(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for SizeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for SizeDelta {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_gb())
    }
}
