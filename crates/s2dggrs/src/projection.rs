//! Cube-face projection between the unit sphere and face-local coordinates.
//!
//! Four coordinate spaces are involved:
//!
//! - `xyz`: a point on (or direction towards) the unit sphere.
//! - `(face, u, v)`: the gnomonic projection onto one cube face, `u, v` in
//!   `[-1, 1]`.
//! - `(face, s, t)`: `u, v` passed through a quadratic transform that roughly
//!   equalises cell areas, `s, t` in `[0, 1]`.
//! - `(face, i, j)`: `s, t` discretised into leaf cells, `i, j` in
//!   `[0, MAX_SIZE)`.
//!
//! Face axes are right-handed and chosen so that face `k` points along
//! `+X, +Y, +Z, -X, -Y, -Z` for `k = 0..6`.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Number of leaf cells along one edge of a face (`2^30`).
pub const MAX_SIZE: u32 = 1 << 30;

/// A geodetic position in degrees, treated as spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLon {
    /// Creates a position from latitude and longitude in degrees.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Unit vector pointing at this position.
    pub fn to_point(self) -> DVec3 {
        let phi = self.lat.to_radians();
        let theta = self.lon.to_radians();
        let cos_phi = phi.cos();
        DVec3::new(theta.cos() * cos_phi, theta.sin() * cos_phi, phi.sin())
    }

    /// Position of the direction `p`; `p` need not be normalised.
    pub fn from_point(p: DVec3) -> Self {
        let lat = p.z.atan2(p.x.hypot(p.y));
        let lon = p.y.atan2(p.x);
        Self {
            lat: lat.to_degrees(),
            lon: lon.to_degrees(),
        }
    }

    /// Whether both ordinates are finite numbers.
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Quadratic transform from `s` in `[0, 1]` to `u` in `[-1, 1]`.
#[inline]
pub fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (1.0 / 3.0) * (4.0 * s * s - 1.0)
    } else {
        (1.0 / 3.0) * (1.0 - 4.0 * (1.0 - s) * (1.0 - s))
    }
}

/// Inverse of [`st_to_uv`].
#[inline]
pub fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

/// Leaf coordinate containing `s`, clamped to the face.
#[inline]
pub fn st_to_ij(s: f64) -> u32 {
    let scaled = (f64::from(MAX_SIZE) * s).floor();
    scaled.clamp(0.0, f64::from(MAX_SIZE - 1)) as u32
}

/// The `s` value of a leaf boundary (`i` may equal `MAX_SIZE`).
#[inline]
pub fn ij_to_st(i: f64) -> f64 {
    i / f64::from(MAX_SIZE)
}

/// Point on the cube surface for face-local `(u, v)`.
pub fn face_uv_to_xyz(face: u8, u: f64, v: f64) -> DVec3 {
    match face {
        0 => DVec3::new(1.0, u, v),
        1 => DVec3::new(-u, 1.0, v),
        2 => DVec3::new(-u, -v, 1.0),
        3 => DVec3::new(-1.0, -v, -u),
        4 => DVec3::new(v, -1.0, -u),
        _ => DVec3::new(v, u, -1.0),
    }
}

/// Face whose axis dominates the direction `p`.
pub fn face_of(p: DVec3) -> u8 {
    let a = p.abs();
    let (axis, component) = if a.x >= a.y && a.x >= a.z {
        (0, p.x)
    } else if a.y >= a.z {
        (1, p.y)
    } else {
        (2, p.z)
    };
    if component < 0.0 { axis + 3 } else { axis }
}

/// Face-local `(u, v)` of `p` on a face it is known to project onto.
pub fn valid_face_xyz_to_uv(face: u8, p: DVec3) -> (f64, f64) {
    match face {
        0 => (p.y / p.x, p.z / p.x),
        1 => (-p.x / p.y, p.z / p.y),
        2 => (-p.x / p.z, -p.y / p.z),
        3 => (p.z / p.x, p.y / p.x),
        4 => (p.z / p.y, -p.x / p.y),
        _ => (-p.y / p.z, -p.x / p.z),
    }
}

/// Dominant face of `p` and its face-local coordinates.
pub fn xyz_to_face_uv(p: DVec3) -> (u8, f64, f64) {
    let face = face_of(p);
    let (u, v) = valid_face_xyz_to_uv(face, p);
    (face, u, v)
}

/// Leaf cell `(face, i, j)` containing the direction `p`.
pub fn xyz_to_face_ij(p: DVec3) -> (u8, u32, u32) {
    let (face, u, v) = xyz_to_face_uv(p);
    (face, st_to_ij(uv_to_st(u)), st_to_ij(uv_to_st(v)))
}

/// Unit vector at fractional leaf coordinates on `face`.
pub fn face_ij_to_point(face: u8, i: f64, j: f64) -> DVec3 {
    face_uv_to_xyz(face, st_to_uv(ij_to_st(i)), st_to_uv(ij_to_st(j))).normalize()
}

/// Angle in radians between two unit vectors, stable for tiny and large
/// separations alike.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Area in steradians of the spherical triangle `abc` (unit vectors).
pub fn triangle_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    // a·((b-a)×(c-a)) equals a·(b×c) but keeps its precision for tiny
    // triangles, where b×c is nearly perpendicular to a.
    let numerator = a.dot((b - a).cross(c - a)).abs();
    let denominator = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
    2.0 * numerator.atan2(denominator)
}

/// Latitude in radians of the unit vector `p`, clamped into `[-pi/2, pi/2]`.
pub fn latitude_of(p: DVec3) -> f64 {
    p.z.atan2(p.x.hypot(p.y)).clamp(-FRAC_PI_2, FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn st_uv_inverse() {
        for k in 0..=100 {
            let s = f64::from(k) / 100.0;
            assert!((uv_to_st(st_to_uv(s)) - s).abs() < 1e-14, "s = {s}");
        }
        assert_eq!(st_to_uv(0.0), -1.0);
        assert_eq!(st_to_uv(0.5), 0.0);
        assert_eq!(st_to_uv(1.0), 1.0);
    }

    #[test]
    fn face_centres() {
        let axes = [
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
            DVec3::NEG_X,
            DVec3::NEG_Y,
            DVec3::NEG_Z,
        ];
        for (face, axis) in axes.iter().enumerate() {
            let face = face as u8;
            assert_eq!(face_uv_to_xyz(face, 0.0, 0.0), *axis);
            assert_eq!(face_of(*axis), face);
        }
    }

    #[test]
    fn uv_round_trip_every_face() {
        for face in 0..6u8 {
            for &(u, v) in &[(0.3, -0.2), (-0.9, 0.9), (0.999, -0.999), (0.0, 0.5)] {
                let p = face_uv_to_xyz(face, u, v);
                let (f, u2, v2) = xyz_to_face_uv(p);
                assert_eq!(f, face);
                assert!((u - u2).abs() < 1e-14 && (v - v2).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn faces_are_right_handed() {
        // du x dv must point away from the sphere centre on every face.
        for face in 0..6u8 {
            let o = face_uv_to_xyz(face, 0.0, 0.0);
            let du = face_uv_to_xyz(face, 1.0, 0.0) - o;
            let dv = face_uv_to_xyz(face, 0.0, 1.0) - o;
            assert!(du.cross(dv).dot(o) > 0.0, "face {face}");
        }
    }

    #[test]
    fn latlon_round_trip() {
        for &(lat, lon) in &[(0.0, 0.0), (45.0, 90.0), (-33.9, 151.2), (89.5, -179.0)] {
            let ll = LatLon::new(lat, lon);
            let back = LatLon::from_point(ll.to_point());
            assert!((back.lat - lat).abs() < 1e-12);
            assert!((back.lon - lon).abs() < 1e-12);
        }
    }

    #[test]
    fn octant_triangle_area() {
        let area = triangle_area(DVec3::X, DVec3::Y, DVec3::Z);
        assert!((area - FRAC_PI_2).abs() < 1e-14);
    }

    #[test]
    fn st_to_ij_clamps() {
        assert_eq!(st_to_ij(-0.1), 0);
        assert_eq!(st_to_ij(1.0), MAX_SIZE - 1);
        assert_eq!(st_to_ij(0.5), MAX_SIZE / 2);
    }
}
