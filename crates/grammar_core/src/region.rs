//! Axis-aligned integer boxes.
//!
//! Used for match bounding boxes, edited regions and search windows.
//! Boxes are half-open: a box covers `position..position + size` on each axis,
//! so two boxes that only touch along a face do not overlap.

use bevy::math::IVec3;

/// An axis-aligned box of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub position: IVec3,
    pub size: IVec3,
}

impl Bounds {
    pub fn new(position: IVec3, size: IVec3) -> Self {
        Self { position, size }
    }

    /// Box covering a whole grid of the given size.
    pub fn from_size(size: IVec3) -> Self {
        Self::new(IVec3::ZERO, size)
    }

    /// Exclusive upper corner.
    #[inline]
    pub fn max(&self) -> IVec3 {
        self.position + self.size
    }

    /// True when some extent is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.min_element() <= 0
    }

    /// Whether the two boxes share at least one cell.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a_max = self.max();
        let b_max = other.max();
        self.position.x < b_max.x
            && other.position.x < a_max.x
            && self.position.y < b_max.y
            && other.position.y < a_max.y
            && self.position.z < b_max.z
            && other.position.z < a_max.z
    }

    /// Whether a cell lies inside the box.
    #[inline]
    pub fn contains(&self, point: IVec3) -> bool {
        point.cmpge(self.position).all() && point.cmplt(self.max()).all()
    }

    /// Smallest box containing both (empty boxes are ignored).
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let min = self.position.min(other.position);
        let max = self.max().max(other.max());
        Bounds::new(min, max - min)
    }

    /// Number of cells covered, saturating at `usize::MAX`.
    pub fn volume(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.size.x as usize)
                .saturating_mul(self.size.y as usize)
                .saturating_mul(self.size.z as usize)
        }
    }
}
