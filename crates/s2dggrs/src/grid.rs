//! Grids: every zone at one level of the hierarchy.

use crate::{
    cellid::{CellId, NUM_FACES},
    covering::RegionCoverer,
    crs::Position,
    error::Result,
    extent::{Region, WholeSphere},
    system::ReferenceSystem,
    zone::Zone,
};

/// Per-level data kept by a reference system.
///
/// Only level 0 materialises its cells; deeper levels compute zones on
/// demand.
#[derive(Debug, Clone)]
pub(crate) struct GridLevel {
    /// Hierarchy level.
    level: u8,
    /// The face cells, for level 0 only.
    faces: Option<[CellId; NUM_FACES as usize]>,
}

impl GridLevel {
    /// Data for `level`.
    pub(crate) fn new(level: u8) -> Self {
        Self {
            level,
            faces: (level == 0).then(CellId::faces),
        }
    }
}

/// All zones at one level.
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a> {
    /// Owning reference system.
    system: &'a ReferenceSystem,
    /// Level data.
    data: &'a GridLevel,
}

impl<'a> Grid<'a> {
    /// View over `data`.
    pub(crate) fn new(system: &'a ReferenceSystem, data: &'a GridLevel) -> Self {
        Self { system, data }
    }

    /// Hierarchy level of every zone in this grid.
    pub fn level(&self) -> u8 {
        self.data.level
    }

    /// Number of zones at this level, `6 * 4^level`.
    pub fn zone_count(&self) -> u64 {
        u64::from(NUM_FACES) << (2 * u32::from(self.data.level))
    }

    /// The zone containing `position`.
    pub fn zone_at(&self, position: &Position) -> Result<Zone<'a>> {
        let ll = self.system.to_base(position)?;
        Ok(Zone::new(self.system, self.system.cell_at(ll, self.data.level)))
    }

    /// Zones at this level intersecting `extent`, or every zone when
    /// `extent` is `None`.
    ///
    /// The region is first covered, eagerly, by the coarsest disjoint cells
    /// that fit it; zones at this level are kept when their exact
    /// latitude/longitude rectangle meets the region. The iterator then
    /// expands each covering cell to its descendants at this level on
    /// demand, so a large region at a fine level yields a very large number
    /// of zones. Callers are responsible for keeping the `(level, extent)`
    /// combination bounded.
    pub fn zones_in(
        &self,
        extent: Option<&dyn Region>,
    ) -> impl Iterator<Item = Zone<'a>> + use<'a> {
        let system = self.system;
        let level = self.data.level;
        let cells = match (extent, self.data.faces) {
            (None, Some(faces)) => faces.to_vec(),
            (extent, _) => RegionCoverer::new(level)
                .covering(system.grid_system(), extent.unwrap_or(&WholeSphere)),
        };
        cells
            .into_iter()
            .flat_map(move |cell| cell.descendants(level))
            .map(move |cell| Zone::new(system, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::GeographicBoundingBox;

    #[test]
    fn level_zero_lists_faces() {
        let rs = ReferenceSystem::shared();
        let grid = rs.hierarchy().get(0).unwrap();
        let ids: Vec<_> = grid.zones_in(None).map(|z| z.id()).collect();
        assert_eq!(ids, CellId::faces().to_vec());
        assert_eq!(grid.zone_count(), 6);
    }

    #[test]
    fn full_enumeration() {
        let rs = ReferenceSystem::shared();
        let grid = rs.hierarchy().get(2).unwrap();
        let zones: Vec<_> = grid.zones_in(None).collect();
        assert_eq!(zones.len() as u64, grid.zone_count());
        assert_eq!(zones.len(), 96);
        assert!(zones.iter().all(|z| z.level() == 2));
    }

    #[test]
    fn zone_at_matches_level() -> Result<()> {
        let rs = ReferenceSystem::shared();
        let grid = rs.hierarchy().get(7)?;
        let zone = grid.zone_at(&Position::geodetic(40.7, -74.0))?;
        assert_eq!(zone.level(), 7);
        Ok(())
    }

    #[test]
    fn region_query_contains_point_zone() -> Result<()> {
        let rs = ReferenceSystem::shared();
        let grid = rs.hierarchy().get(6)?;
        let bbox = GeographicBoundingBox::new(-10.0, 35.0, 5.0, 45.0)?;
        let zones: Vec<_> = grid.zones_in(Some(&bbox)).collect();
        let madrid = grid.zone_at(&Position::geodetic(40.4, -3.7))?;
        assert!(zones.contains(&madrid));
        let tokyo = grid.zone_at(&Position::geodetic(35.7, 139.7))?;
        assert!(!zones.contains(&tokyo));
        Ok(())
    }

    #[test]
    fn region_query_keeps_only_intersecting_zones() -> Result<()> {
        let rs = ReferenceSystem::shared();
        let grid = rs.hierarchy().get(7)?;
        let bbox = GeographicBoundingBox::new(6.0, 44.0, 14.0, 48.0)?;
        let zones: Vec<_> = grid.zones_in(Some(&bbox)).collect();
        for zone in &zones {
            let rect = rs.grid_system().cell_rect_bound(zone.id());
            assert!(bbox.intersects(&rect), "{zone:?} outside {bbox:?}");
        }
        // A zone just north of the box.
        let outside = grid.zone_at(&Position::geodetic(49.5, 10.0))?;
        assert!(!bbox.intersects(&rs.grid_system().cell_rect_bound(outside.id())));
        assert!(!zones.contains(&outside));
        Ok(())
    }
}
