//! A discrete global grid reference system on a Hilbert-ordered cube.
//!
//! The sphere is split into six cube faces, each subdivided as a quadtree
//! down to 30 levels. Every cell has a 64-bit identifier and a short hex
//! token; positions encode to the cell containing them, and cells expose
//! their parent, children, neighbours, boundary and area.
//!
//! # Entry points
//!
//! - [`ReferenceSystem`] owns the configuration and hands out the rest.
//! - [`Hierarchy`] and [`Grid`] look zones up by level, position or region.
//! - [`Coder`] turns positions into identifiers at a chosen precision.
//! - [`Zone`] is one cell with its geometry and topology.
//!
//! ```
//! use s2dggrs::{Position, ReferenceSystem};
//!
//! let rs = ReferenceSystem::shared();
//! let mut coder = rs.create_coder();
//! coder.set_precision_level(10)?;
//! let token = coder.encode(&Position::geodetic(48.8566, 2.3522))?;
//! let zone = rs.hierarchy().resolve(token.as_str())?;
//! assert_eq!(zone.level(), 10);
//! # Ok::<(), s2dggrs::error::Error>(())
//! ```

/// Identifier algebra over 64-bit cell identifiers.
pub mod cellid;
/// Position encoding at a chosen precision.
pub mod coder;
/// Ellipsoid and reference-system settings.
pub mod config;
/// Minimal region covering search.
pub mod covering;
/// Reference system codes, positions and transforms.
pub mod crs;
/// Hilbert curve on a `2^n` square with 64-bit indices.
pub mod curve;
/// Error types used across the crate.
pub mod error;
/// Query regions and zone boundaries.
pub mod extent;
/// Per-level grids.
pub mod grid;
/// The grid geometry trait and the cube-sphere implementation.
pub mod grid_system;
/// Ordered grids and identifier resolution.
pub mod hierarchy;
/// Internal bit operations shared by the curve and the identifiers.
#[doc(hidden)]
pub mod ops;
/// Cube-face projection.
pub mod projection;
/// Lengths with units.
pub mod quantity;
/// The reference system handle.
pub mod system;
/// Zones and their derived properties.
pub mod zone;

pub use crate::{
    cellid::{CellId, MAX_LEVEL},
    coder::Coder,
    config::{Ellipsoid, ReferenceSystemConfig},
    crs::{Crs, Position},
    extent::{GeographicBoundingBox, Polygon, Region},
    grid::Grid,
    hierarchy::{Hierarchy, ZoneIdentifier},
    quantity::{Length, LengthUnit},
    system::ReferenceSystem,
    zone::Zone,
};
