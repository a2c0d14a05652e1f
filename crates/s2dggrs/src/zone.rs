//! Zones: cells bound to the reference system that measures them.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
};

use smallvec::SmallVec;

use crate::{
    cellid::CellId,
    crs::Position,
    error::Result,
    extent::Polygon,
    system::ReferenceSystem,
};

/// One cell of a [`ReferenceSystem`], with its geometry and topology.
///
/// Zones are cheap to copy. Two zones are equal when they wrap the same
/// cell of the same reference-system instance.
#[derive(Clone, Copy)]
pub struct Zone<'a> {
    /// Owning reference system.
    system: &'a ReferenceSystem,
    /// The wrapped cell.
    id: CellId,
}

impl<'a> Zone<'a> {
    /// Wrap `id`, which must be a valid cell.
    pub(crate) fn new(system: &'a ReferenceSystem, id: CellId) -> Self {
        debug_assert!(id.is_valid());
        Self { system, id }
    }

    /// The wrapped cell.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Owning reference system.
    pub fn reference_system(&self) -> &'a ReferenceSystem {
        self.system
    }

    /// Hierarchy level.
    pub fn level(&self) -> u8 {
        self.id.level()
    }

    /// Whether this is one of the six top-level zones.
    pub fn is_face(&self) -> bool {
        self.id.is_face()
    }

    /// Whether this zone has no children.
    pub fn is_leaf(&self) -> bool {
        self.id.is_leaf()
    }

    /// Short textual identifier.
    pub fn text_identifier(&self) -> String {
        self.id.to_token()
    }

    /// Numeric identifier.
    pub fn long_identifier(&self) -> u64 {
        self.id.raw()
    }

    /// Surface area in square metres, on a sphere of the ellipsoid's mean
    /// radius.
    pub fn area(&self) -> f64 {
        let r = self.system.ellipsoid().mean_radius();
        self.system.grid_system().cell_area(self.id) * r * r
    }

    /// Corners as a counter-clockwise ring in the base frame.
    pub fn boundary(&self) -> Polygon {
        Polygon::new(self.system.grid_system().cell_vertices(self.id))
    }

    /// Centre in the base frame.
    pub fn position(&self) -> Position {
        Position::from(self.system.grid_system().cell_center(self.id))
    }

    /// The enclosing zone one level up; `None` for a face.
    pub fn parent(&self) -> Option<Self> {
        self.id.parent().map(|p| Self::new(self.system, p))
    }

    /// The four zones one level down; empty for a leaf.
    pub fn children(&self) -> SmallVec<[Self; 4]> {
        self.id
            .children()
            .into_iter()
            .flatten()
            .map(|c| Self::new(self.system, c))
            .collect()
    }

    /// The four same-level zones sharing an edge with this one.
    pub fn neighbors(&self) -> [Self; 4] {
        self.system
            .grid_system()
            .edge_neighbors(self.id)
            .map(|n| Self::new(self.system, n))
    }

    /// Whether `position` falls inside this zone.
    pub fn contains(&self, position: &Position) -> Result<bool> {
        let ll = self.system.to_base(position)?;
        Ok(self.system.cell_at(ll, self.level()) == self.id)
    }
}

impl PartialEq for Zone<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.system, other.system) && self.id == other.id
    }
}

impl Eq for Zone<'_> {}

impl Hash for Zone<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Zone<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Zone").field(&self.id).finish()
    }
}

impl fmt::Display for Zone<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, f64::consts::PI};

    use super::*;
    use crate::{config::ReferenceSystemConfig, projection::LatLon};

    fn zone_at(rs: &ReferenceSystem, lat: f64, lon: f64, level: u8) -> Zone<'_> {
        Zone::new(rs, rs.cell_at(LatLon::new(lat, lon), level))
    }

    #[test]
    fn faces_cover_the_earth() {
        let rs = ReferenceSystem::shared();
        let r = rs.ellipsoid().mean_radius();
        let total: f64 = CellId::faces().iter().map(|&f| Zone::new(rs, f).area()).sum();
        let expected = 4.0 * PI * r * r;
        assert!(((total - expected) / expected).abs() < 1e-12);
    }

    #[test]
    fn topology() {
        let rs = ReferenceSystem::shared();
        let zone = zone_at(rs, 48.85, 2.35, 12);
        let parent = zone.parent().unwrap();
        assert_eq!(parent.level(), 11);
        assert!(parent.children().contains(&zone));
        assert_eq!(zone.children().len(), 4);
        for n in zone.neighbors() {
            assert_eq!(n.level(), 12);
            assert_ne!(n, zone);
            assert!(n.neighbors().contains(&zone));
        }

        let face = Zone::new(rs, CellId::from_face(3).unwrap());
        assert!(face.parent().is_none());
        let leaf = zone_at(rs, 0.0, 0.0, 30);
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn geometry() -> Result<()> {
        let rs = ReferenceSystem::shared();
        let zone = zone_at(rs, -33.86, 151.21, 9);
        assert!(zone.contains(&zone.position())?);
        let ring = zone.boundary();
        assert_eq!(ring.vertices().len(), 4);
        assert!(ring.envelope().contains_point(rs.to_base(&zone.position())?));
        assert!(zone.contains(&Position::geodetic(-33.86, 151.21))?);
        assert!(!zone.contains(&Position::geodetic(33.86, 151.21))?);
        Ok(())
    }

    #[test]
    fn identity_is_per_instance() -> Result<()> {
        let a = ReferenceSystem::new(ReferenceSystemConfig::default())?;
        let b = ReferenceSystem::new(ReferenceSystemConfig::default())?;
        let za = zone_at(&a, 1.0, 1.0, 3);
        let zb = zone_at(&b, 1.0, 1.0, 3);
        assert_eq!(za.id(), zb.id());
        assert_ne!(za, zb);
        assert_eq!(za, zone_at(&a, 1.0, 1.0, 3));

        let set: HashSet<_> = [za, za, zone_at(&a, 50.0, 1.0, 3)].into_iter().collect();
        assert_eq!(set.len(), 2);
        Ok(())
    }

    #[test]
    fn identifiers() {
        let rs = ReferenceSystem::shared();
        let face = Zone::new(rs, CellId::faces()[0]);
        assert_eq!(face.text_identifier(), "1");
        assert_eq!(face.long_identifier(), 1 << 60);
        assert_eq!(face.to_string(), "1");
    }
}
