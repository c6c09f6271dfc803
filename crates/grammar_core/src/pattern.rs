//! Pattern - a dense 3D block of tiles.
//!
//! Patterns play two roles:
//! - left side (match template): the wildcard means "don't care"
//! - right side (replacement): the wildcard means "leave the cell unchanged"
//!
//! Patterns can be parsed from strings like `"RB/WW"` where:
//! - each character is one tile label
//! - `/` separates Y rows
//! - ` ` (space) separates Z layers
//! - `*` is the wildcard
//!
//! Cells are stored in `x + y * sx + z * sx * sy` order.

use super::region::Bounds;
use super::tile::Tile;
use bevy::math::IVec3;
use std::fmt;

/// Error type for pattern construction.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Pattern string is empty
    EmptyPattern,
    /// Rows or layers have inconsistent lengths
    NonRectangularPattern,
    /// Some extent is zero or negative
    ZeroSize(IVec3),
    /// Number of tiles doesn't match the size
    TileCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::EmptyPattern => write!(f, "empty pattern"),
            PatternError::NonRectangularPattern => write!(f, "non-rectangular pattern"),
            PatternError::ZeroSize(size) => write!(f, "pattern size {} must be at least 1 on every axis", size),
            PatternError::TileCountMismatch { expected, actual } => {
                write!(f, "expected {} tiles, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A dense 3D array of tiles with an integer size vector.
#[derive(Clone, PartialEq, Eq)]
pub struct Pattern {
    size: IVec3,
    tiles: Vec<Tile>,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("size", &format!("[{}x{}x{}]", self.size.x, self.size.y, self.size.z))
            .field("text", &self.to_text())
            .finish()
    }
}

impl Pattern {
    /// Build a pattern from tiles in `x + y * sx + z * sx * sy` order.
    pub fn from_tiles(size: IVec3, tiles: Vec<Tile>) -> Result<Self, PatternError> {
        if size.min_element() < 1 {
            return Err(PatternError::ZeroSize(size));
        }
        let expected = Bounds::from_size(size).volume();
        if tiles.len() != expected {
            return Err(PatternError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self { size, tiles })
    }

    /// Build a pattern where every cell holds `tile`.
    pub fn filled(size: IVec3, tile: Tile) -> Result<Self, PatternError> {
        if size.min_element() < 1 {
            return Err(PatternError::ZeroSize(size));
        }
        let count = Bounds::from_size(size).volume();
        Ok(Self {
            size,
            tiles: vec![tile; count],
        })
    }

    /// Parse a pattern string.
    ///
    /// Format:
    /// - Single characters: "B", "W"
    /// - Horizontal (X): "BW", "RGB"
    /// - 2D with rows (Y): "BW/WB"
    /// - 3D with layers (Z): "BW/WB BB/WW"
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        if text.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        let layers: Vec<Vec<Vec<char>>> = text
            .split(' ')
            .map(|layer| layer.split('/').map(|row| row.chars().collect()).collect())
            .collect();

        let sz = layers.len();
        let sy = layers[0].len();
        let sx = layers[0][0].len();
        if sx == 0 {
            return Err(PatternError::EmptyPattern);
        }

        for layer in &layers {
            if layer.len() != sy || layer.iter().any(|row| row.len() != sx) {
                return Err(PatternError::NonRectangularPattern);
            }
        }

        let mut tiles = Vec::with_capacity(sx * sy * sz);
        for layer in &layers {
            for row in layer {
                tiles.extend(row.iter().map(|&ch| Tile::from(ch)));
            }
        }

        Self::from_tiles(IVec3::new(sx as i32, sy as i32, sz as i32), tiles)
    }

    /// Pattern dimensions (every extent is at least 1).
    #[inline]
    pub fn size(&self) -> IVec3 {
        self.size
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; patterns have at least one cell.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in storage order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (x + y * self.size.x + z * self.size.x * self.size.y) as usize
    }

    /// Tile at a local offset. Panics if the offset is outside the pattern.
    #[inline]
    pub fn get(&self, local: IVec3) -> &Tile {
        &self.tiles[self.index(local.x, local.y, local.z)]
    }

    /// Iterate `(local_offset, tile)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, &Tile)> + '_ {
        let sx = self.size.x;
        let sy = self.size.y;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let i = i as i32;
            (IVec3::new(i % sx, (i / sx) % sy, i / (sx * sy)), tile)
        })
    }

    /// Whether every cell is the wildcard.
    pub fn is_all_wildcard(&self) -> bool {
        self.tiles.iter().all(Tile::is_wildcard)
    }

    /// Rotate 90 degrees around the Y axis (in the XZ plane).
    ///
    /// new[x, y, z] = old[sx - 1 - z, y, x], new size = (sz, sy, sx)
    pub fn y_rotated(&self) -> Self {
        let old = self.size;
        let size = IVec3::new(old.z, old.y, old.x);
        let mut tiles = Vec::with_capacity(self.tiles.len());

        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    tiles.push(self.tiles[self.index(old.x - 1 - z, y, x)].clone());
                }
            }
        }

        Self { size, tiles }
    }

    /// Mirror along the X axis.
    pub fn reflected(&self) -> Self {
        let size = self.size;
        let mut tiles = Vec::with_capacity(self.tiles.len());

        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    tiles.push(self.tiles[self.index(size.x - 1 - x, y, z)].clone());
                }
            }
        }

        Self { size, tiles }
    }

    /// Render back to the string format accepted by [`Pattern::parse`].
    ///
    /// Multi-character labels are written as-is, so the result only
    /// round-trips for single-character labels.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for z in 0..self.size.z {
            if z > 0 {
                out.push(' ');
            }
            for y in 0..self.size.y {
                if y > 0 {
                    out.push('/');
                }
                for x in 0..self.size.x {
                    out.push_str(self.tiles[self.index(x, y, z)].label());
                }
            }
        }
        out
    }
}
