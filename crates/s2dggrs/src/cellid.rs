//! Identifier algebra over 64-bit cell identifiers.
//!
//! Layout, most significant bit first:
//!
//! ```text
//! fff ddddd...dd 1 000...0
//! │   │          │ └ 2·(30 − level) zero bits
//! │   │          └ marker bit
//! │   └ one 2-bit Hilbert digit per level
//! └ face (0..6)
//! ```
//!
//! The lowest set bit therefore encodes the level, and every operation here
//! is a handful of integer instructions on the raw value.

use std::{fmt, str::FromStr};

use crate::{
    curve,
    error::{Error, Result},
    ops,
    projection::{self, MAX_SIZE},
};

/// Deepest level of the hierarchy; cells at this level are leaves.
pub const MAX_LEVEL: u8 = 30;

/// Number of top-level cube faces.
pub const NUM_FACES: u8 = 6;

/// Bits used by the face index.
const FACE_BITS: u32 = 3;

/// Bits below the face index: 30 digits plus the marker.
const POS_BITS: u32 = u64::BITS - FACE_BITS;

/// A cell at some level of the hierarchy.
///
/// `CellId` values are cheap to copy and order by their position along the
/// face-by-face Hilbert curve, with a parent sorting in the middle of the
/// range spanned by its descendants.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Wrap a raw value, rejecting anything that is not a well-formed cell.
    pub fn from_raw(raw: u64) -> Result<Self> {
        let id = Self(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(Error::InvalidIdentifier(format!("{raw:#018x}")))
        }
    }

    /// The level-0 cell covering `face`.
    pub fn from_face(face: u8) -> Result<Self> {
        if face >= NUM_FACES {
            return Err(Error::InvalidArgument(format!("face {face} out of range")));
        }
        Ok(Self((u64::from(face) << POS_BITS) + Self::lsb_for_level(0)))
    }

    /// The six face cells in face order.
    pub fn faces() -> [Self; NUM_FACES as usize] {
        let mut faces = [Self(0); NUM_FACES as usize];
        for (face, slot) in (0u64..).zip(faces.iter_mut()) {
            *slot = Self((face << POS_BITS) + Self::lsb_for_level(0));
        }
        faces
    }

    /// The leaf cell at leaf coordinates `(i, j)` of `face`.
    ///
    /// Both coordinates must be below [`MAX_SIZE`].
    pub fn from_face_ij(face: u8, i: u32, j: u32) -> Result<Self> {
        if face >= NUM_FACES || i >= MAX_SIZE || j >= MAX_SIZE {
            return Err(Error::InvalidArgument(format!(
                "leaf ({face}, {i}, {j}) outside the cube"
            )));
        }
        Ok(Self::leaf(face, i, j))
    }

    /// [`CellId::from_face_ij`] for coordinates already known to be in range.
    pub(crate) fn leaf(face: u8, i: u32, j: u32) -> Self {
        debug_assert!(face < NUM_FACES && i < MAX_SIZE && j < MAX_SIZE);
        // Odd faces run the curve with swapped axes.
        let (x, y) = if face & 1 == 0 { (j, i) } else { (i, j) };
        let digits = curve::hilbert_index(curve::MAX_ORDER, x, y);
        Self((u64::from(face) << POS_BITS) | (digits << 1) | 1)
    }

    /// Leaf cell at `(i, j)` where the coordinates may lie up to one leaf
    /// outside `face`; such positions resolve onto the adjacent face.
    pub fn from_face_ij_wrap(face: u8, i: i64, j: i64) -> Self {
        let max = i64::from(MAX_SIZE);
        let i = i.clamp(-1, max);
        let j = j.clamp(-1, max);

        // Map to (u, v) linearly, just past the face edge, and let the
        // dominant-axis test pick the neighbouring face.
        let scale = 1.0 / f64::from(MAX_SIZE);
        let limit = 1.0 + f64::EPSILON;
        let u = (scale * (2 * (i - max / 2) + 1) as f64).clamp(-limit, limit);
        let v = (scale * (2 * (j - max / 2) + 1) as f64).clamp(-limit, limit);

        let (face, u, v) = projection::xyz_to_face_uv(projection::face_uv_to_xyz(face, u, v));
        Self::leaf(
            face,
            projection::st_to_ij(0.5 * (u + 1.0)),
            projection::st_to_ij(0.5 * (v + 1.0)),
        )
    }

    /// Raw 64-bit value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether the value has a valid face and a marker bit at an even offset.
    pub const fn is_valid(self) -> bool {
        self.face() < NUM_FACES && (self.lsb() & 0x1555_5555_5555_5555) != 0
    }

    /// Face index in `0..6`.
    pub const fn face(self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// Lowest set bit, i.e. the marker.
    pub const fn lsb(self) -> u64 {
        ops::lowest_set_bit(self.0)
    }

    /// Marker bit for a cell at `level`, which must not exceed [`MAX_LEVEL`].
    pub(crate) const fn lsb_for_level(level: u8) -> u64 {
        1u64 << (2 * (MAX_LEVEL - level) as u32)
    }

    /// Leaf cells along one edge of a cell at `level`; levels past
    /// [`MAX_LEVEL`] count as leaves.
    pub const fn size_ij(level: u8) -> u32 {
        let level = if level > MAX_LEVEL { MAX_LEVEL } else { level };
        1u32 << (MAX_LEVEL - level) as u32
    }

    /// Level in `0..=MAX_LEVEL`.
    pub const fn level(self) -> u8 {
        MAX_LEVEL - (self.0.trailing_zeros() >> 1) as u8
    }

    /// Whether this is one of the six level-0 cells.
    pub const fn is_face(self) -> bool {
        self.0 & ops::bitmask64(POS_BITS - 1) == 0
    }

    /// Whether this cell is at [`MAX_LEVEL`].
    pub const fn is_leaf(self) -> bool {
        self.0 & 1 != 0
    }

    /// The cell one level up, or `None` for a face.
    pub fn parent(self) -> Option<Self> {
        if self.is_face() {
            return None;
        }
        let new_lsb = self.lsb() << 2;
        Some(Self((self.0 & new_lsb.wrapping_neg()) | new_lsb))
    }

    /// Ancestor at `level`, or `None` when `level` is finer than this cell.
    pub fn parent_at(self, level: u8) -> Option<Self> {
        (level <= self.level()).then(|| self.ancestor(level))
    }

    /// Ancestor at a level already known not to be finer than this cell.
    pub(crate) fn ancestor(self, level: u8) -> Self {
        debug_assert!(level <= self.level(), "ancestor finer than cell");
        let new_lsb = Self::lsb_for_level(level);
        Self((self.0 & new_lsb.wrapping_neg()) | new_lsb)
    }

    /// Child `quadrant` (0..4) in curve order, or `None` for a leaf.
    ///
    /// Consecutive quadrants are edge-adjacent.
    pub fn child(self, quadrant: u8) -> Option<Self> {
        if self.is_leaf() || quadrant > 3 {
            return None;
        }
        let new_lsb = self.lsb() >> 2;
        Some(Self(
            self.0 - self.lsb() + (2 * u64::from(quadrant) + 1) * new_lsb,
        ))
    }

    /// The four children in curve order, or `None` for a leaf.
    pub fn children(self) -> Option<[Self; 4]> {
        if self.is_leaf() {
            return None;
        }
        let new_lsb = self.lsb() >> 2;
        let first = self.0 - self.lsb() + new_lsb;
        Some([0u64, 1, 2, 3].map(|k| Self(first + 2 * k * new_lsb)))
    }

    /// All descendants at `level` in curve order.
    ///
    /// The range holds `4^(level - self.level())` cells and is produced
    /// lazily. `None` when `level` is coarser than this cell or past
    /// [`MAX_LEVEL`].
    pub fn children_at(self, level: u8) -> Option<CellRange> {
        (self.level()..=MAX_LEVEL)
            .contains(&level)
            .then(|| self.descendants(level))
    }

    /// Descendants at a level already known to lie in `self.level()..=MAX_LEVEL`.
    pub(crate) fn descendants(self, level: u8) -> CellRange {
        debug_assert!(level >= self.level() && level <= MAX_LEVEL);
        let step_lsb = Self::lsb_for_level(level);
        CellRange {
            next: self.0 - self.lsb() + step_lsb,
            end: self.0 + self.lsb() + step_lsb,
            step: step_lsb << 1,
        }
    }

    /// First leaf contained in this cell.
    pub const fn range_min(self) -> Self {
        Self(self.0 - (self.lsb() - 1))
    }

    /// Last leaf contained in this cell.
    pub const fn range_max(self) -> Self {
        Self(self.0 + (self.lsb() - 1))
    }

    /// Whether `other` is this cell or one of its descendants.
    pub fn contains(self, other: Self) -> bool {
        other >= self.range_min() && other <= self.range_max()
    }

    /// Face and leaf coordinates of the cell's lower-left corner.
    pub fn to_face_ij(self) -> (u8, u32, u32) {
        let face = self.face();
        let level = self.level();
        let pos = self.0 & ops::bitmask64(POS_BITS);
        let digits = pos >> (POS_BITS - 2 * u32::from(level));
        let (x, y) = curve::hilbert_point(u32::from(level), digits);
        let (i, j) = if face & 1 == 0 { (y, x) } else { (x, y) };
        let shift = u32::from(MAX_LEVEL - level);
        (face, i << shift, j << shift)
    }

    /// The four same-level cells sharing an edge with this one, ordered
    /// bottom, right, top, left in face-local coordinates.
    ///
    /// Cells on a face boundary get neighbours on the adjacent face.
    pub fn edge_neighbors(self) -> [Self; 4] {
        let level = self.level();
        let size = i64::from(Self::size_ij(level));
        let max = i64::from(MAX_SIZE);
        let (face, i, j) = self.to_face_ij();
        let (i, j) = (i64::from(i), i64::from(j));

        let step = |di: i64, dj: i64| -> Self {
            let (ni, nj) = (i + di, j + dj);
            let leaf = if (0..max).contains(&ni) && (0..max).contains(&nj) {
                Self::leaf(face, ni as u32, nj as u32)
            } else {
                Self::from_face_ij_wrap(face, ni, nj)
            };
            leaf.ancestor(level)
        };

        [step(0, -size), step(size, 0), step(0, size), step(-size, 0)]
    }

    /// Short printable token: lowercase hex with trailing zeros removed.
    pub fn to_token(self) -> String {
        if self.0 == 0 {
            return "X".to_string();
        }
        let hex = format!("{:016x}", self.0);
        hex.trim_end_matches('0').to_string()
    }

    /// Parse a token produced by [`CellId::to_token`]; either hex case is
    /// accepted.
    pub fn from_token(token: &str) -> Result<Self> {
        let hex = token.bytes().all(|b| b.is_ascii_hexdigit());
        if token.is_empty() || token.len() > 16 || !hex {
            return Err(Error::InvalidIdentifier(format!("malformed token {token:?}")));
        }
        let value = u64::from_str_radix(token, 16)
            .map_err(|e| Error::InvalidIdentifier(format!("token {token:?}: {e}")))?;
        let raw = value << (4 * (16 - token.len() as u32));
        Self::from_raw(raw)
            .map_err(|_| Error::InvalidIdentifier(format!("token {token:?} is not a cell")))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "CellId(invalid {:#018x})", self.0);
        }
        write!(f, "CellId({}/", self.face())?;
        for level in 1..=self.level() {
            let shift = POS_BITS - 2 * u32::from(level);
            write!(f, "{}", (self.0 >> shift) & 3)?;
        }
        f.write_str(")")
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

/// Lazy, ordered run of same-level cells produced by
/// [`CellId::children_at`].
#[derive(Debug, Clone)]
pub struct CellRange {
    /// Raw value of the next cell to yield.
    next: u64,
    /// Raw value one step past the last cell.
    end: u64,
    /// Distance between consecutive cells.
    step: u64,
}

impl Iterator for CellRange {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        if self.next >= self.end {
            return None;
        }
        let id = CellId(self.next);
        self.next += self.step;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end.saturating_sub(self.next) / self.step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRange {}
