//! The reference system: metadata, configuration, grid geometry and the
//! per-level grids, bundled behind one handle.

use std::{fmt, sync::OnceLock};

use tracing::debug;

use crate::{
    cellid::{CellId, MAX_LEVEL},
    coder::Coder,
    config::{Ellipsoid, ReferenceSystemConfig},
    crs::{CoordinateTransform, Crs, Position},
    error::{Error, Result},
    grid::GridLevel,
    grid_system::{CubeSphere, DiscreteGlobalGrid},
    hierarchy::Hierarchy,
    projection::LatLon,
};

/// Descriptive information about a reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Stable short identifier.
    pub identifier: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Resource describing the grid.
    pub uri: &'static str,
    /// Search keywords.
    pub keywords: &'static [&'static str],
}

/// Metadata of the cube-sphere system.
const S2_METADATA: Metadata = Metadata {
    identifier: "S2",
    description: "Hierarchical cube-face grid with Hilbert-ordered \
                  64-bit cell identifiers, 30 levels deep.",
    uri: "http://s2geometry.io/",
    keywords: &["dggs", "s2", "hilbert", "cube", "quadtree"],
};

/// A discrete global grid reference system.
///
/// Zones, grids and hierarchies borrow the system they came from, and two
/// zones are only equal when they borrow the same instance.
pub struct ReferenceSystem {
    /// Descriptive information.
    metadata: Metadata,
    /// Ellipsoid and precision settings.
    config: ReferenceSystemConfig,
    /// Cell geometry.
    grid_system: Box<dyn DiscreteGlobalGrid>,
    /// Converts foreign positions into the base frame.
    transform: Option<Box<dyn CoordinateTransform>>,
    /// One entry per hierarchy level.
    levels: Vec<GridLevel>,
}

impl ReferenceSystem {
    /// A cube-sphere system with the given configuration.
    pub fn new(config: ReferenceSystemConfig) -> Result<Self> {
        Self::with_grid_system(config, Box::new(CubeSphere))
    }

    /// A system using a custom grid geometry.
    pub fn with_grid_system(
        config: ReferenceSystemConfig,
        grid_system: Box<dyn DiscreteGlobalGrid>,
    ) -> Result<Self> {
        config.validate()?;
        if grid_system.max_level() != MAX_LEVEL {
            return Err(Error::InvalidArgument(format!(
                "grid system {} supports {} levels, expected {MAX_LEVEL}",
                grid_system.name(),
                grid_system.max_level()
            )));
        }
        Ok(Self::build(config, grid_system))
    }

    /// Assemble a system from an already validated configuration.
    fn build(config: ReferenceSystemConfig, grid_system: Box<dyn DiscreteGlobalGrid>) -> Self {
        debug!(
            grid = grid_system.name(),
            semi_major_axis = config.ellipsoid.semi_major_axis,
            semi_minor_axis = config.ellipsoid.semi_minor_axis,
            precision_divisor = config.precision_divisor,
            "reference system created"
        );
        Self {
            metadata: S2_METADATA,
            config,
            grid_system,
            transform: None,
            levels: (0..MAX_LEVEL).map(GridLevel::new).collect(),
        }
    }

    /// Install a transform used for positions outside the base frame.
    #[must_use]
    pub fn with_transform(mut self, transform: impl CoordinateTransform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// A process-wide WGS84 instance, built on first use.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<ReferenceSystem> = OnceLock::new();
        SHARED.get_or_init(|| Self::build(ReferenceSystemConfig::default(), Box::new(CubeSphere)))
    }

    /// Descriptive information.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Active configuration.
    pub fn config(&self) -> &ReferenceSystemConfig {
        &self.config
    }

    /// Ellipsoid used to scale areas and precisions.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.config.ellipsoid
    }

    /// Frame every position is resolved in.
    pub fn base_crs(&self) -> Crs {
        Crs::CRS84
    }

    /// Cell geometry.
    pub fn grid_system(&self) -> &dyn DiscreteGlobalGrid {
        self.grid_system.as_ref()
    }

    /// The per-level grids.
    pub fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy::new(self)
    }

    /// A fresh coder at level 0.
    pub fn create_coder(&self) -> Coder<'_> {
        Coder::new(self)
    }

    /// Per-level grid data.
    pub(crate) fn levels(&self) -> &[GridLevel] {
        &self.levels
    }

    /// Express `position` as latitude/longitude in the base frame.
    pub fn to_base(&self, position: &Position) -> Result<LatLon> {
        let ll = match position.as_lat_lon() {
            Some(ll) => ll,
            None => {
                let transform = self.transform.as_deref().ok_or_else(|| {
                    Error::TransformFailure(format!(
                        "no transform configured from {} to {}",
                        position.crs,
                        self.base_crs()
                    ))
                })?;
                let base = transform.transform(position, &self.base_crs())?;
                base.as_lat_lon().ok_or_else(|| {
                    Error::TransformFailure(format!("transform returned {}", base.crs))
                })?
            }
        };
        if !ll.is_finite() || !(-90.0..=90.0).contains(&ll.lat) {
            return Err(Error::InvalidArgument(format!(
                "position ({}, {}) is not a geodetic coordinate",
                ll.lat, ll.lon
            )));
        }
        Ok(ll)
    }

    /// Cell at `level` containing `point`.
    pub(crate) fn cell_at(&self, point: LatLon, level: u8) -> CellId {
        self.grid_system.cell_at(point, level)
    }
}

impl fmt::Debug for ReferenceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceSystem")
            .field("identifier", &self.metadata.identifier)
            .field("config", &self.config)
            .field("grid_system", &self.grid_system)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;
    use crate::crs::AxisOrderTransform;

    #[test]
    fn metadata() {
        let rs = ReferenceSystem::shared();
        assert_eq!(rs.metadata().identifier, "S2");
        assert!(!rs.metadata().keywords.is_empty());
        assert_eq!(rs.base_crs(), Crs::CRS84);
        assert!(ptr::eq(rs, ReferenceSystem::shared()));
    }

    #[test]
    fn rejects_bad_config() {
        let cfg = ReferenceSystemConfig::with_ellipsoid(Ellipsoid::sphere(-1.0));
        assert!(matches!(
            ReferenceSystem::new(cfg),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn base_frame_resolution() -> Result<()> {
        let rs = ReferenceSystem::new(ReferenceSystemConfig::default())?;
        let foreign = Position::new(Crs::EPSG_4326, 10.0, 20.0);
        assert!(matches!(rs.to_base(&foreign), Err(Error::TransformFailure(_))));

        let rs = rs.with_transform(AxisOrderTransform);
        assert_eq!(rs.to_base(&foreign)?, LatLon::new(10.0, 20.0));

        let utm = Position::new(Crs::new("EPSG:32633"), 500_000.0, 0.0);
        assert!(matches!(rs.to_base(&utm), Err(Error::TransformFailure(_))));

        let nan = Position::geodetic(f64::NAN, 0.0);
        assert!(matches!(rs.to_base(&nan), Err(Error::InvalidArgument(_))));
        Ok(())
    }
}
