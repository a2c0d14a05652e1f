//! The [`DiscreteGlobalGrid`] trait and its cube-sphere implementation.

use std::{
    f64::consts::{FRAC_PI_2, PI},
    fmt::Debug,
};

use glam::DVec3;

use crate::{
    cellid::{CellId, MAX_LEVEL},
    extent::{GeographicBoundingBox, Polygon},
    projection::{self, LatLon},
};

/// Relative slack added to cap radii so rounding never shrinks a bound.
const BOUND_RELATIVE_SLACK: f64 = 1e-9;

/// Absolute slack in radians added to cap radii.
const BOUND_ABSOLUTE_SLACK: f64 = 1e-12;

/// Slack in degrees added around a cell's exact rectangle.
const RECT_SLACK: f64 = 1e-9;

/// Geometry and topology of a hierarchical grid over the unit sphere.
///
/// The identifier algebra ([`CellId`]) is shared; implementations decide how
/// cells map onto the sphere. All lengths and areas here are on the unit
/// sphere; callers scale them by the ellipsoid radius.
pub trait DiscreteGlobalGrid: Debug + Send + Sync {
    /// Short name of the grid.
    fn name(&self) -> &'static str;

    /// One-paragraph description.
    fn info(&self) -> &'static str;

    /// Finest level the grid supports.
    fn max_level(&self) -> u8 {
        MAX_LEVEL
    }

    /// Cell at `level` containing `point`; levels past [`MAX_LEVEL`] give
    /// the leaf.
    fn cell_at(&self, point: LatLon, level: u8) -> CellId;

    /// Cell centre.
    fn cell_center(&self, id: CellId) -> LatLon;

    /// Corners, counter-clockwise seen from outside the sphere.
    fn cell_vertices(&self, id: CellId) -> [LatLon; 4];

    /// Area in steradians.
    fn cell_area(&self, id: CellId) -> f64;

    /// A longitude/latitude box guaranteed to enclose the cell.
    ///
    /// Cheap and loose; suited to pruning a search.
    fn cell_bound(&self, id: CellId) -> GeographicBoundingBox;

    /// The smallest longitude/latitude box enclosing the cell, including
    /// the poleward bulge of its edges, widened only by rounding slack.
    ///
    /// Defaults to [`DiscreteGlobalGrid::cell_bound`].
    fn cell_rect_bound(&self, id: CellId) -> GeographicBoundingBox {
        self.cell_bound(id)
    }

    /// Same-level cells sharing an edge with `id`.
    fn edge_neighbors(&self, id: CellId) -> [CellId; 4] {
        id.edge_neighbors()
    }
}

/// Cube faces projected onto the sphere with a quadratic area-equalising
/// transform, subdivided as quadtrees and ordered by a Hilbert curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeSphere;

impl CubeSphere {
    /// Unit vectors of the four corners, counter-clockwise.
    fn corner_points(id: CellId) -> [DVec3; 4] {
        let (face, i, j) = id.to_face_ij();
        let size = f64::from(CellId::size_ij(id.level()));
        let (i0, j0) = (f64::from(i), f64::from(j));
        let (i1, j1) = (i0 + size, j0 + size);
        [(i0, j0), (i1, j0), (i1, j1), (i0, j1)]
            .map(|(ci, cj)| projection::face_ij_to_point(face, ci, cj))
    }

    /// Unit vector of the cell centre.
    fn center_point(id: CellId) -> DVec3 {
        let (face, i, j) = id.to_face_ij();
        let half = 0.5 * f64::from(CellId::size_ij(id.level()));
        projection::face_ij_to_point(face, f64::from(i) + half, f64::from(j) + half)
    }
}

impl DiscreteGlobalGrid for CubeSphere {
    fn name(&self) -> &'static str {
        "S2"
    }

    fn info(&self) -> &'static str {
        "Six cube faces projected onto the sphere, each split as a quadtree\n\
        down to 30 levels. Cells are quadrilaterals with geodesic edges and\n\
        are numbered along a Hilbert curve, so nearby cells get nearby ids."
    }

    fn cell_at(&self, point: LatLon, level: u8) -> CellId {
        let (face, i, j) = projection::xyz_to_face_ij(point.to_point());
        CellId::leaf(face, i, j).ancestor(level.min(MAX_LEVEL))
    }

    fn cell_center(&self, id: CellId) -> LatLon {
        LatLon::from_point(Self::center_point(id))
    }

    fn cell_vertices(&self, id: CellId) -> [LatLon; 4] {
        Self::corner_points(id).map(LatLon::from_point)
    }

    fn cell_area(&self, id: CellId) -> f64 {
        let [a, b, c, d] = Self::corner_points(id);
        projection::triangle_area(a, b, c) + projection::triangle_area(a, c, d)
    }

    fn cell_bound(&self, id: CellId) -> GeographicBoundingBox {
        // Cells are geodesically convex, so the cap around the centre that
        // reaches the farthest corner encloses the whole cell.
        let center = Self::center_point(id);
        let radius = Self::corner_points(id)
            .iter()
            .map(|corner| projection::angle_between(center, *corner))
            .fold(0.0, f64::max);
        cap_bound(
            center,
            radius * (1.0 + BOUND_RELATIVE_SLACK) + BOUND_ABSOLUTE_SLACK,
        )
    }

    fn cell_rect_bound(&self, id: CellId) -> GeographicBoundingBox {
        let corners = Self::corner_points(id);
        let edges = || (0..4).map(move |k| (corners[k], corners[(k + 1) % 4]));

        let mut south = FRAC_PI_2;
        let mut north = -FRAC_PI_2;
        for (a, b) in edges() {
            let (lo, hi) = edge_latitudes(a, b);
            south = south.min(lo);
            north = north.max(hi);
        }

        // A cell touching a pole spans every longitude. Corners run
        // counter-clockwise, so a pole on or inside the cell is on the left
        // of every edge.
        let touches = |pole: DVec3| edges().all(|(a, b)| a.cross(b).dot(pole) >= 0.0);
        let north_pole = touches(DVec3::Z);
        let south_pole = touches(DVec3::NEG_Z);
        if north_pole {
            north = FRAC_PI_2;
        }
        if south_pole {
            south = -FRAC_PI_2;
        }

        let south = (south.to_degrees() - RECT_SLACK).max(-90.0);
        let north = (north.to_degrees() + RECT_SLACK).min(90.0);
        if north_pole || south_pole {
            return GeographicBoundingBox {
                west: -180.0,
                south,
                east: 180.0,
                north,
            };
        }

        // Off the poles, longitude is monotonic along each edge, so the
        // corners fix the longitude span.
        let envelope = Polygon::new(corners.map(LatLon::from_point)).envelope();
        if envelope.is_full_longitude() {
            return GeographicBoundingBox {
                south,
                north,
                ..envelope
            };
        }
        let mut west = envelope.west - RECT_SLACK;
        let mut east = envelope.east + RECT_SLACK;
        if west < -180.0 {
            west += 360.0;
        }
        if east > 180.0 {
            east -= 360.0;
        }
        GeographicBoundingBox {
            west,
            south,
            east,
            north,
        }
    }
}

/// Latitude range in radians of the geodesic from `a` to `b`.
///
/// Besides the endpoints, the arc may pass through the points of its great
/// circle nearest to either pole.
fn edge_latitudes(a: DVec3, b: DVec3) -> (f64, f64) {
    let (lat_a, lat_b) = (projection::latitude_of(a), projection::latitude_of(b));
    let mut lo = lat_a.min(lat_b);
    let mut hi = lat_a.max(lat_b);

    let normal = a.cross(b);
    let norm2 = normal.length_squared();
    if norm2 == 0.0 {
        return (lo, hi);
    }
    for pole in [DVec3::Z, DVec3::NEG_Z] {
        let nearest = pole - normal * (pole.dot(normal) / norm2);
        if nearest.length_squared() == 0.0 {
            // The great circle is the equator.
            continue;
        }
        let on_arc = a.cross(nearest).dot(normal) > 0.0 && nearest.cross(b).dot(normal) > 0.0;
        if on_arc {
            let lat = projection::latitude_of(nearest.normalize());
            lo = lo.min(lat);
            hi = hi.max(lat);
        }
    }
    (lo, hi)
}

/// Longitude/latitude box enclosing the spherical cap of angular `radius`
/// around the unit vector `center`.
fn cap_bound(center: DVec3, radius: f64) -> GeographicBoundingBox {
    let lat = projection::latitude_of(center);
    let lon = center.y.atan2(center.x);
    let south = lat - radius;
    let north = lat + radius;

    if south <= -FRAC_PI_2 || north >= FRAC_PI_2 || radius >= FRAC_PI_2 {
        // The cap contains a pole, so every longitude is reached.
        return GeographicBoundingBox {
            west: -180.0,
            south: south.to_degrees().max(-90.0),
            east: 180.0,
            north: north.to_degrees().min(90.0),
        };
    }

    let half_width = (radius.sin() / lat.cos()).min(1.0).asin();
    let mut west = lon - half_width;
    let mut east = lon + half_width;
    if west < -PI {
        west += 2.0 * PI;
    }
    if east > PI {
        east -= 2.0 * PI;
    }
    GeographicBoundingBox {
        west: west.to_degrees(),
        south: south.to_degrees(),
        east: east.to_degrees(),
        north: north.to_degrees(),
    }
}
