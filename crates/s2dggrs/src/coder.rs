//! Position encoding at a chosen precision.

use std::{cell::OnceCell, f64::consts::PI};

use tracing::debug;

use crate::{
    cellid::MAX_LEVEL,
    crs::Position,
    error::{Error, Result},
    hierarchy::ZoneIdentifier,
    quantity::Length,
    system::ReferenceSystem,
    zone::Zone,
};

/// Encodes positions into zone identifiers at a current level.
///
/// A coder is cheap to create and keeps a lazily built precision table, so
/// it is meant to be owned by one task at a time. It is not `Sync`.
#[derive(Debug)]
pub struct Coder<'a> {
    /// Owning reference system.
    system: &'a ReferenceSystem,
    /// Level used by [`Coder::encode`].
    level: u8,
    /// Nominal linear size of a zone, in metres, per level.
    table: OnceCell<Vec<f64>>,
}

impl<'a> Coder<'a> {
    /// A coder at level 0.
    pub(crate) fn new(system: &'a ReferenceSystem) -> Self {
        Self {
            system,
            level: 0,
            table: OnceCell::new(),
        }
    }

    /// Owning reference system.
    pub fn reference_system(&self) -> &'a ReferenceSystem {
        self.system
    }

    /// Nominal zone size in metres for levels `0..30`, strictly decreasing.
    ///
    /// Level 0 is the side of a square with the area of one face on a
    /// sphere of the ellipsoid's mean radius. Each further level divides the
    /// previous entry by the configured precision divisor.
    pub fn precision_table(&self) -> &[f64] {
        self.table.get_or_init(|| {
            let config = self.system.config();
            let r = config.ellipsoid.mean_radius();
            let mut size = (4.0 * PI * r * r / 6.0).sqrt();
            let mut table = Vec::with_capacity(usize::from(MAX_LEVEL));
            for _ in 0..MAX_LEVEL {
                table.push(size);
                size /= config.precision_divisor;
            }
            debug!(
                levels = table.len(),
                coarsest = table[0],
                "precision table built"
            );
            table
        })
    }

    /// Nominal zone size at the current level.
    pub fn precision(&self) -> Length {
        Length::metres(self.precision_table()[usize::from(self.level)])
    }

    /// Pick the coarsest level whose nominal size is below `target`.
    ///
    /// Falls back to level 0 when no level is fine enough.
    pub fn set_precision(&mut self, target: Length) {
        let target = target.to_metres();
        self.level = self
            .precision_table()
            .iter()
            .position(|&size| size < target)
            .and_then(|level| u8::try_from(level).ok())
            .unwrap_or(0);
    }

    /// Current level.
    pub fn precision_level(&self) -> u8 {
        self.level
    }

    /// Set the current level directly.
    pub fn set_precision_level(&mut self, level: u8) -> Result<()> {
        if level >= MAX_LEVEL {
            return Err(Error::InvalidArgument(format!(
                "precision level {level} outside 0..{MAX_LEVEL}"
            )));
        }
        self.level = level;
        Ok(())
    }

    /// Zone containing `position` at the current level.
    pub fn zone(&self, position: &Position) -> Result<Zone<'a>> {
        self.system.hierarchy().get(self.level)?.zone_at(position)
    }

    /// Token of the zone containing `position`.
    pub fn encode(&self, position: &Position) -> Result<String> {
        self.zone(position).map(|zone| zone.text_identifier())
    }

    /// Raw identifier of the zone containing `position`.
    pub fn encode_identifier(&self, position: &Position) -> Result<u64> {
        self.zone(position).map(|zone| zone.long_identifier())
    }

    /// Zone named by `identifier`.
    pub fn decode<'b>(&self, identifier: impl Into<ZoneIdentifier<'b>>) -> Result<Zone<'a>> {
        self.system.hierarchy().resolve(identifier)
    }
}
