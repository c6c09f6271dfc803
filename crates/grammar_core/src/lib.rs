//! Grammar-driven 3D tile rewriting.
//!
//! Generates structured spaces (dungeons, layouts) by repeatedly finding
//! occurrences of rule left sides in a labeled 3D grid and writing the
//! matching right sides back, with weighted selection, per-rule application
//! caps and step gates.
//!
//! This crate provides:
//! - `Tile`, `Pattern`: labels and dense 3D tile blocks (`*` is the wildcard)
//! - `Rule`, `RuleSet`: rewrite rules with symmetry permutations
//! - `VoxelTileGrid`: reference grid behind the `TileGrid` trait
//! - `find_matches`, `MatchCache`: full and incremental match search
//! - `Generator`: reset / single step / sweep / subdivide
//! - `MatchOverlayPlugin`: Bevy gizmo overlay of the current matches
//!
//! ## Example
//!
//! ```ignore
//! use grammar_core::*;
//! use bevy::math::IVec3;
//!
//! let rules = RuleSet::new(vec![
//!     Rule::parse("grow", "R.", "RR")?.with_symmetry(Symmetry::All),
//! ])
//! .with_start(Pattern::parse("R")?);
//!
//! let mut grid = VoxelTileGrid::new(IVec3::new(16, 1, 16), Tile::new("."))?;
//! let mut generator = Generator::new(SelectionStrategy::Random);
//! let mut ctx = GenerationContext::new(&mut grid, &rules);
//! generator.reset(&mut ctx, Some(42));
//! let steps = generator.run(&mut ctx, 100);
//! println!("{} steps\n{}", steps, grid.layers_to_string());
//! ```

pub mod config;
pub mod generator;
pub mod grid;
pub mod match_cache;
pub mod matcher;
pub mod overlay;
pub mod pattern;
pub mod region;
pub mod rewrite;
pub mod rng;
pub mod rule;
pub mod rule_set;
pub mod selector;
pub mod symmetry;
pub mod tile;

pub use config::{ConfigError, GeneratorConfig};
pub use generator::{centered_anchor, GenerationContext, Generator, GeneratorState};
pub use grid::{GridChanged, GridError, TileGrid, VoxelTileGrid};
pub use match_cache::{CacheState, MatchCache};
pub use matcher::{find_all_matches, find_matches, Match};
pub use overlay::{MatchInfo, MatchOverlay, MatchOverlayPlugin};
pub use pattern::{Pattern, PatternError};
pub use region::Bounds;
pub use rewrite::{apply_match, write_pattern};
pub use rng::{GrammarRng, StdRandom};
pub use rule::{Rule, RuleError};
pub use rule_set::{RuleSet, UseCounts};
pub use selector::{select_match, RuleFilter, SelectionStrategy};
pub use symmetry::{plane_symmetries, RulePermutation, Symmetry};
pub use tile::{Tile, WILDCARD_LABEL};
