//! Query regions and zone boundaries.
//!
//! Only what the covering search needs lives here: a longitude/latitude
//! rectangle, a vertex-list polygon for zone outlines, and the [`Region`]
//! trait the search consumes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    crs::{Crs, Position},
    error::{Error, Result},
    projection::LatLon,
};

/// A region that can be tested against conservative cell bounds.
///
/// `bound` always encloses the whole cell, so `intersects_bound` may report
/// false positives but must never miss a real overlap, and `contains_bound`
/// may only return `true` when the region really contains all of `bound`.
pub trait Region {
    /// Whether `bound` lies entirely inside the region.
    fn contains_bound(&self, bound: &GeographicBoundingBox) -> bool;
    /// Whether `bound` may overlap the region.
    fn intersects_bound(&self, bound: &GeographicBoundingBox) -> bool;
}

/// The whole sphere; contains every bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeSphere;

impl Region for WholeSphere {
    fn contains_bound(&self, _bound: &GeographicBoundingBox) -> bool {
        true
    }

    fn intersects_bound(&self, _bound: &GeographicBoundingBox) -> bool {
        true
    }
}

/// A longitude/latitude rectangle in degrees.
///
/// When `west > east` the box crosses the antimeridian. A box whose
/// longitude span is the full circle is written `west = -180, east = 180`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicBoundingBox {
    /// Western longitude edge.
    pub west: f64,
    /// Southern latitude edge.
    pub south: f64,
    /// Eastern longitude edge.
    pub east: f64,
    /// Northern latitude edge.
    pub north: f64,
}

impl GeographicBoundingBox {
    /// The box covering the whole globe.
    pub const WORLD: Self = Self {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    /// A validated box.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        let finite = [west, south, east, north].iter().all(|v| v.is_finite());
        if !finite
            || !(-90.0..=90.0).contains(&south)
            || !(-90.0..=90.0).contains(&north)
            || south > north
            || !(-180.0..=180.0).contains(&west)
            || !(-180.0..=180.0).contains(&east)
        {
            return Err(Error::InvalidArgument(format!(
                "bad bounding box [{west}, {south}, {east}, {north}]"
            )));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Whether the box spans every longitude.
    pub fn is_full_longitude(&self) -> bool {
        self.west <= -180.0 && self.east >= 180.0
    }

    /// Whether the box crosses the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitude span split into at most two non-wrapping segments.
    fn lon_segments(&self) -> SmallVec<[(f64, f64); 2]> {
        let mut out = SmallVec::new();
        if self.is_full_longitude() {
            out.push((-180.0, 180.0));
        } else if self.crosses_antimeridian() {
            out.push((self.west, 180.0));
            out.push((-180.0, self.east));
        } else {
            out.push((self.west, self.east));
        }
        out
    }

    /// Whether `point` lies inside or on the edge of the box.
    pub fn contains_point(&self, point: LatLon) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && self
                .lon_segments()
                .iter()
                .any(|&(lo, hi)| (lo..=hi).contains(&point.lon))
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        if other.south < self.south || other.north > self.north {
            return false;
        }
        let ours = self.lon_segments();
        other.lon_segments().iter().all(|&(lo, hi)| {
            ours.iter()
                .any(|&(our_lo, our_hi)| our_lo <= lo && hi <= our_hi)
        })
    }

    /// Whether the two boxes share any point.
    pub fn intersects(&self, other: &Self) -> bool {
        if other.south > self.north || other.north < self.south {
            return false;
        }
        let ours = self.lon_segments();
        other.lon_segments().iter().any(|&(lo, hi)| {
            ours.iter()
                .any(|&(our_lo, our_hi)| lo <= our_hi && our_lo <= hi)
        })
    }
}

impl Region for GeographicBoundingBox {
    fn contains_bound(&self, bound: &GeographicBoundingBox) -> bool {
        self.contains(bound)
    }

    fn intersects_bound(&self, bound: &GeographicBoundingBox) -> bool {
        self.intersects(bound)
    }
}

/// A closed ring of vertices in the base frame, listed counter-clockwise
/// when seen from outside the sphere. Edges are geodesics.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Ring vertices, without repeating the first one.
    vertices: SmallVec<[LatLon; 4]>,
}

impl Polygon {
    /// A polygon from its ring.
    pub fn new(vertices: impl Into<SmallVec<[LatLon; 4]>>) -> Self {
        Self {
            vertices: vertices.into(),
        }
    }

    /// Ring vertices as latitude/longitude.
    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    /// Ring vertices as base-frame positions.
    pub fn positions(&self) -> Vec<Position> {
        self.vertices.iter().copied().map(Position::from).collect()
    }

    /// Frame of the vertices.
    pub fn crs(&self) -> Crs {
        Crs::CRS84
    }

    /// Smallest box enclosing the vertices.
    ///
    /// Geodesic edges may bulge poleward of their endpoints, so this is the
    /// vertex envelope rather than a strict bound. Rings spanning more than
    /// half the globe in longitude come back as a full-longitude box.
    pub fn envelope(&self) -> GeographicBoundingBox {
        let mut south = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;
        for v in &self.vertices {
            south = south.min(v.lat);
            north = north.max(v.lat);
        }
        let mut lons: Vec<f64> = self.vertices.iter().map(|v| v.lon).collect();
        lons.sort_by(f64::total_cmp);

        // The widest gap between consecutive longitudes is the part of the
        // circle the ring does not cover.
        let mut best_gap = 0.0;
        let mut bounds = (-180.0, 180.0);
        for (k, &lon) in lons.iter().enumerate() {
            let next = if k + 1 < lons.len() {
                lons[k + 1]
            } else {
                lons[0] + 360.0
            };
            let gap = next - lon;
            if gap > best_gap {
                best_gap = gap;
                let east = lon;
                let west = if next > 180.0 { next - 360.0 } else { next };
                bounds = (west, east);
            }
        }
        let (west, east) = if best_gap < 180.0 {
            (-180.0, 180.0)
        } else {
            bounds
        };
        GeographicBoundingBox {
            west,
            south,
            east,
            north,
        }
    }
}
