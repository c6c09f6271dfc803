//! Match finding - locate every eligible rule permutation in a grid region.
//!
//! Search order is part of the contract: rules in rule-set order, then each
//! rule's permutations in order, then anchors in lexicographic (x, y, z)
//! order. First/last selection depends on it.

use super::grid::TileGrid;
use super::pattern::Pattern;
use super::region::Bounds;
use super::rule_set::{RuleSet, UseCounts};
use bevy::math::IVec3;

/// A found occurrence of a rule permutation's left side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// Index into the rule set
    pub rule: usize,
    /// Index into the rule's permutation list
    pub permutation: usize,
    /// Anchor (min corner) in grid coordinates
    pub position: IVec3,
    /// Size of the matched left-side pattern
    pub size: IVec3,
}

impl Match {
    /// Cells covered by the match.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }
}

/// Check if a pattern matches the grid with its min corner at `anchor`.
///
/// Wildcard cells always match. Stops at the first mismatching cell.
/// The caller guarantees the pattern fits inside the grid.
pub fn pattern_matches<G: TileGrid + ?Sized>(grid: &G, pattern: &Pattern, anchor: IVec3) -> bool {
    pattern
        .iter()
        .all(|(offset, tile)| tile.accepts(grid.get_tile(anchor + offset)))
}

/// Anchor range `[min, max)` whose pattern boxes overlap `region`, clamped so
/// every box stays inside the grid. None when the range is empty.
///
/// The region is widened by `pattern_size - 1` towards the origin because a
/// pattern anchored that far before the region still reaches into it.
pub fn search_window(region: Bounds, pattern_size: IVec3, grid_size: IVec3) -> Option<(IVec3, IVec3)> {
    if region.is_empty() {
        return None;
    }
    let min = (region.position - (pattern_size - IVec3::ONE)).max(IVec3::ZERO);
    let max = region.max().min(grid_size - pattern_size + IVec3::ONE);
    if min.cmplt(max).all() {
        Some((min, max))
    } else {
        None
    }
}

/// Find every eligible (rule permutation, anchor) pair overlapping `region`.
///
/// Rules that reached their application cap or whose step gate is still
/// closed at `step` are skipped. A region with a zero or negative extent
/// yields nothing.
pub fn find_matches<G: TileGrid + ?Sized>(
    grid: &G,
    rules: &RuleSet,
    counts: &UseCounts,
    step: usize,
    region: Bounds,
) -> Vec<Match> {
    let mut found = Vec::new();
    if region.is_empty() {
        return found;
    }
    let grid_size = grid.size();

    for (r, rule) in rules.iter().enumerate() {
        if !rule.is_eligible(counts.get(rule.name()), step) {
            continue;
        }

        for (p, permutation) in rule.permutations().iter().enumerate() {
            let size = permutation.left.size();
            let Some((min, max)) = search_window(region, size, grid_size) else {
                continue;
            };

            for x in min.x..max.x {
                for y in min.y..max.y {
                    for z in min.z..max.z {
                        let anchor = IVec3::new(x, y, z);
                        if pattern_matches(grid, &permutation.left, anchor) {
                            found.push(Match {
                                rule: r,
                                permutation: p,
                                position: anchor,
                                size,
                            });
                        }
                    }
                }
            }
        }
    }

    found
}

/// Whole-grid search.
pub fn find_all_matches<G: TileGrid + ?Sized>(
    grid: &G,
    rules: &RuleSet,
    counts: &UseCounts,
    step: usize,
) -> Vec<Match> {
    find_matches(grid, rules, counts, step, grid.bounds())
}
