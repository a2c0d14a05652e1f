//! Length quantities with unit conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    /// SI metre.
    Metre,
    /// 1000 metres.
    Kilometre,
    /// International foot, 0.3048 m.
    Foot,
    /// International nautical mile, 1852 m.
    NauticalMile,
}

impl LengthUnit {
    /// Metres in one of this unit.
    pub const fn metres(self) -> f64 {
        match self {
            Self::Metre => 1.0,
            Self::Kilometre => 1000.0,
            Self::Foot => 0.3048,
            Self::NauticalMile => 1852.0,
        }
    }

    /// Conventional symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Metre => "m",
            Self::Kilometre => "km",
            Self::Foot => "ft",
            Self::NauticalMile => "NM",
        }
    }
}

/// A length expressed in some unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    /// Magnitude in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: LengthUnit,
}

impl Length {
    /// A length in an arbitrary unit.
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// A length in metres.
    pub const fn metres(value: f64) -> Self {
        Self::new(value, LengthUnit::Metre)
    }

    /// A length in kilometres.
    pub const fn kilometres(value: f64) -> Self {
        Self::new(value, LengthUnit::Kilometre)
    }

    /// Magnitude in metres.
    pub fn to_metres(self) -> f64 {
        self.value * self.unit.metres()
    }

    /// The same length expressed in `unit`.
    pub fn to_unit(self, unit: LengthUnit) -> Self {
        Self::new(self.to_metres() / unit.metres(), unit)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let l = Length::kilometres(1.852);
        assert!((l.to_metres() - 1852.0).abs() < 1e-9);
        let nm = l.to_unit(LengthUnit::NauticalMile);
        assert!((nm.value - 1.0).abs() < 1e-12);
        assert_eq!(nm.unit, LengthUnit::NauticalMile);
        assert!((Length::new(1000.0, LengthUnit::Foot).to_metres() - 304.8).abs() < 1e-9);
    }

    #[test]
    fn display() {
        assert_eq!(Length::metres(12.5).to_string(), "12.5 m");
    }
}
