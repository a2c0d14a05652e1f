//! Coordinate reference system codes, positions, and the transform seam.
//!
//! The grid itself only understands geodetic longitude/latitude in
//! [`Crs::CRS84`]. Anything else must be converted by a caller-supplied
//! [`CoordinateTransform`] first.

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    projection::LatLon,
};

/// Identifier of a coordinate reference system, e.g. `"EPSG:4326"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs(Cow<'static, str>);

impl Crs {
    /// WGS84 geographic, longitude first. The grid's base frame.
    pub const CRS84: Self = Self(Cow::Borrowed("OGC:CRS84"));
    /// WGS84 geographic, latitude first.
    pub const EPSG_4326: Self = Self(Cow::Borrowed("EPSG:4326"));

    /// A CRS from an arbitrary code.
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    /// The code string.
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A two-dimensional position tagged with its reference system.
///
/// Ordinates are stored in the axis order of `crs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Frame of the ordinates.
    pub crs: Crs,
    /// First ordinate (longitude in [`Crs::CRS84`]).
    pub x: f64,
    /// Second ordinate (latitude in [`Crs::CRS84`]).
    pub y: f64,
}

impl Position {
    /// A position in an arbitrary frame.
    pub const fn new(crs: Crs, x: f64, y: f64) -> Self {
        Self { crs, x, y }
    }

    /// A position in the base frame from latitude and longitude in degrees.
    pub const fn geodetic(lat: f64, lon: f64) -> Self {
        Self::new(Crs::CRS84, lon, lat)
    }

    /// Interpret a [`Crs::CRS84`] position as latitude/longitude.
    ///
    /// Returns `None` for any other frame.
    pub fn as_lat_lon(&self) -> Option<LatLon> {
        (self.crs == Crs::CRS84).then(|| LatLon::new(self.y, self.x))
    }
}

impl From<LatLon> for Position {
    fn from(ll: LatLon) -> Self {
        Self::geodetic(ll.lat, ll.lon)
    }
}

/// Converts positions between reference systems.
///
/// Implementations return [`Error::TransformFailure`] when no conversion
/// path exists.
pub trait CoordinateTransform: Send + Sync {
    /// Express `position` in `target`.
    fn transform(&self, position: &Position, target: &Crs) -> Result<Position>;
}

/// Swaps axis order between [`Crs::EPSG_4326`] and [`Crs::CRS84`].
///
/// Both describe the same WGS84 datum, so no datum shift is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisOrderTransform;

impl CoordinateTransform for AxisOrderTransform {
    fn transform(&self, position: &Position, target: &Crs) -> Result<Position> {
        let geographic = |crs: &Crs| *crs == Crs::CRS84 || *crs == Crs::EPSG_4326;
        if position.crs == *target {
            return Ok(position.clone());
        }
        if geographic(&position.crs) && geographic(target) {
            return Ok(Position::new(target.clone(), position.y, position.x));
        }
        Err(Error::TransformFailure(format!(
            "no path from {} to {target}",
            position.crs
        )))
    }
}
