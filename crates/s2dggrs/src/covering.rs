//! Region covering: the smallest set of disjoint cells, no finer than a
//! target level, whose union contains a region.

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    cellid::{CellId, MAX_LEVEL},
    extent::Region,
    grid_system::DiscreteGlobalGrid,
};

/// Breadth-first covering search over the cell hierarchy.
///
/// Cells whose bound the region contains are kept whole, even if they are
/// coarser than the target, and cells whose bound misses the region are
/// pruned. Everything else is split down to the target level, where a cell
/// is kept only if its exact rectangle
/// ([`DiscreteGlobalGrid::cell_rect_bound`]) meets the region.
#[derive(Debug, Clone, Copy)]
pub struct RegionCoverer {
    /// Finest level a covering cell may have.
    target_level: u8,
}

impl RegionCoverer {
    /// A coverer producing cells no finer than `target_level`.
    pub fn new(target_level: u8) -> Self {
        Self {
            target_level: target_level.min(MAX_LEVEL),
        }
    }

    /// Finest level a covering cell may have.
    pub fn target_level(&self) -> u8 {
        self.target_level
    }

    /// Disjoint cells covering `region`, in search order.
    ///
    /// Every returned cell intersects `region`. The output size is bounded
    /// only by the number of cells at the target level that straddle the
    /// region's edge.
    pub fn covering(&self, grid: &dyn DiscreteGlobalGrid, region: &dyn Region) -> Vec<CellId> {
        let mut queue: VecDeque<CellId> = CellId::faces().into_iter().collect();
        let mut out = Vec::new();
        let mut visited = 0usize;

        while let Some(cell) = queue.pop_front() {
            visited += 1;
            let bound = grid.cell_bound(cell);
            if !region.intersects_bound(&bound) {
                continue;
            }
            if region.contains_bound(&bound) {
                out.push(cell);
                continue;
            }
            if cell.level() >= self.target_level {
                if region.intersects_bound(&grid.cell_rect_bound(cell)) {
                    out.push(cell);
                }
                continue;
            }
            if let Some(children) = cell.children() {
                queue.extend(children);
            }
        }

        debug!(
            target_level = self.target_level,
            visited,
            cells = out.len(),
            "region covering"
        );
        out
    }

    /// Covering cells expanded to every descendant at the target level.
    ///
    /// The covering itself is computed up front; only the expansion is
    /// lazy.
    pub fn cells_at_target(
        &self,
        grid: &dyn DiscreteGlobalGrid,
        region: &dyn Region,
    ) -> impl Iterator<Item = CellId> + use<> {
        let level = self.target_level;
        self.covering(grid, region)
            .into_iter()
            .flat_map(move |cell| cell.descendants(level))
    }
}
