//! Tile labels.
//!
//! A tile is an opaque label shared between grid cells and pattern cells.
//! Equality is by label, so two tiles created from the same string compare
//! equal regardless of where they came from.

use std::fmt;
use std::sync::Arc;

/// Label of the wildcard tile.
///
/// In a left-side pattern it matches any grid content; in a right-side
/// pattern it means "leave the grid cell unchanged".
pub const WILDCARD_LABEL: &str = "*";

/// A labeled grid cell.
///
/// Cloning is cheap (the label is reference counted), which matters because
/// grids and patterns hold one `Tile` per cell.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(Arc<str>);

impl Tile {
    /// Create a tile with the given label.
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    /// The wildcard tile (`*`).
    pub fn wildcard() -> Self {
        Self::new(WILDCARD_LABEL)
    }

    /// The tile's label.
    pub fn label(&self) -> &str {
        &self.0
    }

    /// Whether this tile is the wildcard.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        &*self.0 == WILDCARD_LABEL
    }

    /// Left-side comparison: the wildcard accepts anything.
    #[inline]
    pub fn accepts(&self, other: &Tile) -> bool {
        self.is_wildcard() || self == other
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({:?})", &*self.0)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tile {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<char> for Tile {
    fn from(ch: char) -> Self {
        let mut buf = [0u8; 4];
        Self::new(ch.encode_utf8(&mut buf))
    }
}
