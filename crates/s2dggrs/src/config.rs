//! Configuration for a reference system instance.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Factor between the linear precision of consecutive levels.
///
/// One subdivision step quarters a cell's *area*, which would halve its
/// linear size. The precision table nevertheless divides the linear size by
/// four per level; this constant keeps that behaviour explicit and
/// overridable through [`ReferenceSystemConfig::precision_divisor`].
pub const PRECISION_LEVEL_DIVISOR: f64 = 4.0;

/// Axis lengths of the ellipsoid used to scale areas and precisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Equatorial radius in metres.
    pub semi_major_axis: f64,
    /// Polar radius in metres.
    pub semi_minor_axis: f64,
}

impl Ellipsoid {
    /// WGS 84.
    pub const WGS84: Self = Self {
        semi_major_axis: 6_378_137.0,
        semi_minor_axis: 6_356_752.314_245_179,
    };

    /// GRS 80.
    pub const GRS80: Self = Self {
        semi_major_axis: 6_378_137.0,
        semi_minor_axis: 6_356_752.314_140_356,
    };

    /// A sphere of the given radius.
    pub const fn sphere(radius: f64) -> Self {
        Self {
            semi_major_axis: radius,
            semi_minor_axis: radius,
        }
    }

    /// Mean of the two axes, in metres.
    pub fn mean_radius(&self) -> f64 {
        (self.semi_major_axis + self.semi_minor_axis) / 2.0
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Parameters of a reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSystemConfig {
    /// Ellipsoid used to scale areas and precisions.
    pub ellipsoid: Ellipsoid,
    /// Per-level divisor of the precision table.
    pub precision_divisor: f64,
}

impl Default for ReferenceSystemConfig {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            precision_divisor: PRECISION_LEVEL_DIVISOR,
        }
    }
}

impl ReferenceSystemConfig {
    /// Default settings on a custom ellipsoid.
    pub fn with_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            ..Default::default()
        }
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<()> {
        let Ellipsoid {
            semi_major_axis: a,
            semi_minor_axis: b,
        } = self.ellipsoid;
        if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "ellipsoid axes must be positive, got {a} and {b}"
            )));
        }
        if b > a {
            return Err(Error::InvalidArgument(format!(
                "semi-minor axis {b} exceeds semi-major axis {a}"
            )));
        }
        if !(self.precision_divisor.is_finite() && self.precision_divisor > 1.0) {
            return Err(Error::InvalidArgument(format!(
                "precision divisor must be > 1, got {}",
                self.precision_divisor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_radius() {
        assert_eq!(Ellipsoid::sphere(10.0).mean_radius(), 10.0);
        let r = Ellipsoid::WGS84.mean_radius();
        assert!((r - 6_367_444.657).abs() < 1e-3);
    }

    #[test]
    fn validation() {
        assert!(ReferenceSystemConfig::default().validate().is_ok());
        let inverted = Ellipsoid {
            semi_major_axis: 1.0,
            semi_minor_axis: 2.0,
        };
        assert!(ReferenceSystemConfig::with_ellipsoid(inverted).validate().is_err());
        assert!(
            ReferenceSystemConfig::with_ellipsoid(Ellipsoid::sphere(0.0))
                .validate()
                .is_err()
        );
        let flat = ReferenceSystemConfig {
            precision_divisor: 1.0,
            ..Default::default()
        };
        assert!(flat.validate().is_err());
    }

    #[test]
    fn serde_defaults() {
        let cfg: ReferenceSystemConfig =
            serde_json::from_str(r#"{"ellipsoid":{"semi_major_axis":10.0,"semi_minor_axis":10.0}}"#)
                .unwrap();
        assert_eq!(cfg.ellipsoid, Ellipsoid::sphere(10.0));
        assert_eq!(cfg.precision_divisor, PRECISION_LEVEL_DIVISOR);
        let json = serde_json::to_string(&ReferenceSystemConfig::default()).unwrap();
        let back: ReferenceSystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReferenceSystemConfig::default());
    }
}
