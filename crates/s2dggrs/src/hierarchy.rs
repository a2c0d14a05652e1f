//! The ordered set of grids and identifier resolution.

use std::ptr;

use crate::{
    cellid::CellId,
    error::{Error, Result},
    grid::Grid,
    system::ReferenceSystem,
    zone::Zone,
};

/// Any of the accepted ways to name a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneIdentifier<'a> {
    /// A token as produced by [`Zone::text_identifier`].
    Text(String),
    /// A raw value as produced by [`Zone::long_identifier`].
    Long(u64),
    /// An existing zone handle.
    Zone(Zone<'a>),
}

impl From<&str> for ZoneIdentifier<'_> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ZoneIdentifier<'_> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<u64> for ZoneIdentifier<'_> {
    fn from(raw: u64) -> Self {
        Self::Long(raw)
    }
}

impl<'a> From<Zone<'a>> for ZoneIdentifier<'a> {
    fn from(zone: Zone<'a>) -> Self {
        Self::Zone(zone)
    }
}

/// Grids of a reference system, one per level from 0 to 29.
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy<'a> {
    /// Owning reference system.
    system: &'a ReferenceSystem,
}

impl<'a> Hierarchy<'a> {
    /// Hierarchy of `system`.
    pub(crate) fn new(system: &'a ReferenceSystem) -> Self {
        Self { system }
    }

    /// Number of grids.
    pub fn size(&self) -> usize {
        self.system.levels().len()
    }

    /// The grid at `level`.
    pub fn get(&self, level: u8) -> Result<Grid<'a>> {
        self.system
            .levels()
            .get(usize::from(level))
            .map(|data| Grid::new(self.system, data))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "level {level} outside 0..{}",
                    self.system.levels().len()
                ))
            })
    }

    /// Grids in level order.
    pub fn iter(&self) -> impl Iterator<Item = Grid<'a>> + use<'a> {
        let system = self.system;
        system.levels().iter().map(move |data| Grid::new(system, data))
    }

    /// The zone named by `identifier`.
    ///
    /// Tokens and raw values must decode to a valid cell at any level up to
    /// the leaves. Zone handles must belong to this reference system.
    pub fn resolve<'b>(&self, identifier: impl Into<ZoneIdentifier<'b>>) -> Result<Zone<'a>> {
        let id = match identifier.into() {
            ZoneIdentifier::Text(text) => CellId::from_token(&text)?,
            ZoneIdentifier::Long(raw) => CellId::from_raw(raw)?,
            ZoneIdentifier::Zone(zone) => {
                if !ptr::eq(zone.reference_system(), self.system) {
                    return Err(Error::UnsupportedIdentifierType(format!(
                        "zone {zone} belongs to another reference system"
                    )));
                }
                zone.id()
            }
        };
        Ok(Zone::new(self.system, id))
    }

    /// Canonical token for `identifier`.
    pub fn to_text_identifier<'b>(
        &self,
        identifier: impl Into<ZoneIdentifier<'b>>,
    ) -> Result<String> {
        self.resolve(identifier).map(|zone| zone.text_identifier())
    }

    /// Canonical raw value for `identifier`.
    pub fn to_long_identifier<'b>(
        &self,
        identifier: impl Into<ZoneIdentifier<'b>>,
    ) -> Result<u64> {
        self.resolve(identifier).map(|zone| zone.long_identifier())
    }
}
