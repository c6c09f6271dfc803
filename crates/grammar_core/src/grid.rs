//! Tile grid storage and the interface the rewrite engine consumes.
//!
//! The engine only talks to grids through [`TileGrid`]: size queries, tile
//! reads and writes, batched change notification and resolution changes.
//! [`VoxelTileGrid`] is the dense in-memory implementation used by the
//! generator, the demo app and the tests.
//!
//! Indexing follows `index = x + y * sx + z * sx * sy`.

use super::region::Bounds;
use super::tile::Tile;
use bevy::log::warn;
use bevy::math::IVec3;
use std::fmt;

/// Grid/view collaborator consumed by the rewrite engine.
///
/// Positions outside `size()` are a contract violation: the engine clamps
/// every read and write before calling in.
pub trait TileGrid {
    /// Grid dimensions (x, y, z).
    fn size(&self) -> IVec3;

    /// Tile at `position`.
    fn get_tile(&self, position: IVec3) -> &Tile;

    /// Write a tile. With `notify` the change is announced immediately,
    /// otherwise it waits for [`TileGrid::trigger_change_events`].
    fn set_tile(&mut self, position: IVec3, tile: Tile, notify: bool);

    /// Announce all pending changes as one batched notification.
    fn trigger_change_events(&mut self);

    /// Change the grid resolution by `delta` subdivision levels.
    fn subdivide(&mut self, delta: i32);

    /// Box covering the whole grid.
    fn bounds(&self) -> Bounds {
        Bounds::from_size(self.size())
    }
}

/// Error type for grid construction.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Some extent is zero or negative
    InvalidSize(IVec3),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidSize(size) => {
                write!(f, "grid size {} must be at least 1 on every axis", size)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A batched "grid changed" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridChanged {
    /// Box covering every cell written since the previous notification.
    pub bounds: Bounds,
}

/// Subdivision levels beyond this are clamped (2^8 cells per source cell per axis).
const MAX_SUBDIVISION: i32 = 8;

/// Subdivisions that would grow the grid past this many cells are refused.
pub const MAX_CELLS: usize = 1 << 26;

/// Dense 3D grid of tiles.
#[derive(Debug, Clone)]
pub struct VoxelTileGrid {
    size: IVec3,
    tiles: Vec<Tile>,
    /// Dirty box accumulated by silent writes
    pending: Option<Bounds>,
    /// Notifications not yet drained by the view
    events: Vec<GridChanged>,
}

impl VoxelTileGrid {
    /// Create a grid with every cell set to `fill`.
    pub fn new(size: IVec3, fill: Tile) -> Result<Self, GridError> {
        if size.min_element() < 1 {
            return Err(GridError::InvalidSize(size));
        }
        let count = Bounds::from_size(size).volume();
        Ok(Self {
            size,
            tiles: vec![fill; count],
            pending: None,
            events: Vec::new(),
        })
    }

    /// Get the linear index for a position, or None if out of bounds.
    #[inline]
    pub fn index(&self, position: IVec3) -> Option<usize> {
        if Bounds::from_size(self.size).contains(position) {
            Some(self.index_unchecked(position))
        } else {
            None
        }
    }

    #[inline]
    fn index_unchecked(&self, p: IVec3) -> usize {
        (p.x as usize)
            + (p.y as usize) * (self.size.x as usize)
            + (p.z as usize) * (self.size.x as usize) * (self.size.y as usize)
    }

    /// Convert a linear index back to a position.
    #[inline]
    pub fn position_of(&self, index: usize) -> IVec3 {
        let sx = self.size.x as usize;
        let sy = self.size.y as usize;
        IVec3::new((index % sx) as i32, ((index / sx) % sy) as i32, (index / (sx * sy)) as i32)
    }

    /// Tile at `position`, or None if out of bounds.
    pub fn get(&self, position: IVec3) -> Option<&Tile> {
        self.index(position).map(|i| &self.tiles[i])
    }

    /// All tiles in storage order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Overwrite every cell and announce a whole-grid change.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
        self.pending = None;
        self.events.push(GridChanged {
            bounds: Bounds::from_size(self.size),
        });
    }

    /// Number of cells holding the given label.
    pub fn count(&self, label: &str) -> usize {
        self.tiles.iter().filter(|t| t.label() == label).count()
    }

    /// Take all queued change notifications.
    pub fn drain_change_events(&mut self) -> Vec<GridChanged> {
        std::mem::take(&mut self.events)
    }

    /// Whether there are writes not yet announced.
    pub fn has_pending_changes(&self) -> bool {
        self.pending.is_some()
    }

    /// ASCII dump: one block per Y layer, one row per Z, one label per X.
    pub fn layers_to_string(&self) -> String {
        let mut out = String::new();
        for y in 0..self.size.y {
            out.push_str(&format!("y={}\n", y));
            for z in 0..self.size.z {
                for x in 0..self.size.x {
                    out.push_str(self.tiles[self.index_unchecked(IVec3::new(x, y, z))].label());
                }
                out.push('\n');
            }
        }
        out
    }

    fn resample(&mut self, new_size: IVec3, source: impl Fn(IVec3) -> IVec3) {
        let mut tiles = Vec::with_capacity(Bounds::from_size(new_size).volume());
        for z in 0..new_size.z {
            for y in 0..new_size.y {
                for x in 0..new_size.x {
                    let from = source(IVec3::new(x, y, z));
                    tiles.push(self.tiles[self.index_unchecked(from)].clone());
                }
            }
        }
        self.size = new_size;
        self.tiles = tiles;
    }
}

impl TileGrid for VoxelTileGrid {
    fn size(&self) -> IVec3 {
        self.size
    }

    fn get_tile(&self, position: IVec3) -> &Tile {
        &self.tiles[self.index_unchecked(position)]
    }

    fn set_tile(&mut self, position: IVec3, tile: Tile, notify: bool) {
        let i = self.index_unchecked(position);
        self.tiles[i] = tile;

        let cell = Bounds::new(position, IVec3::ONE);
        if notify {
            self.events.push(GridChanged { bounds: cell });
        } else {
            self.pending = Some(match self.pending {
                Some(pending) => pending.union(&cell),
                None => cell,
            });
        }
    }

    fn trigger_change_events(&mut self) {
        if let Some(bounds) = self.pending.take() {
            self.events.push(GridChanged { bounds });
        }
    }

    /// `delta > 0` splits each cell into `2^delta` cells along every axis
    /// longer than 1; `delta < 0` merges `2^|delta|` blocks, keeping each
    /// block's min-corner tile. Axes never shrink below 1. A split that would
    /// exceed [`MAX_CELLS`] is ignored.
    fn subdivide(&mut self, delta: i32) {
        let delta = delta.clamp(-MAX_SUBDIVISION, MAX_SUBDIVISION);
        if delta == 0 {
            return;
        }

        let factor = 1i32 << delta.unsigned_abs();
        let old_size = self.size;

        if delta > 0 {
            let scale = IVec3::new(
                if old_size.x > 1 { factor } else { 1 },
                if old_size.y > 1 { factor } else { 1 },
                if old_size.z > 1 { factor } else { 1 },
            );
            let new_size = old_size
                .x
                .checked_mul(scale.x)
                .zip(old_size.y.checked_mul(scale.y))
                .zip(old_size.z.checked_mul(scale.z))
                .map(|((x, y), z)| IVec3::new(x, y, z))
                .filter(|size| Bounds::from_size(*size).volume() <= MAX_CELLS);
            let Some(new_size) = new_size else {
                warn!(
                    "subdivide {} of grid {} exceeds {} cells, ignoring",
                    delta, old_size, MAX_CELLS
                );
                return;
            };
            self.resample(new_size, |p| p / scale);
        } else {
            let new_size = (old_size / factor).max(IVec3::ONE);
            self.resample(new_size, |p| (p * factor).min(old_size - IVec3::ONE));
        }

        self.pending = None;
        self.events.push(GridChanged {
            bounds: Bounds::from_size(self.size),
        });
    }
}
