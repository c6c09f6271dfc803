//! Rewrite application - write replacement patterns into a grid.

use super::grid::TileGrid;
use super::matcher::Match;
use super::pattern::Pattern;
use super::region::Bounds;
use super::rule_set::{RuleSet, UseCounts};
use bevy::math::IVec3;

/// Write `replacement` with its min corner at `position`.
///
/// Wildcard cells are skipped so the grid keeps its content there. Writes are
/// silent; one batched change notification is fired at the end.
/// Returns the edited box (the replacement's full extent).
pub fn write_pattern<G: TileGrid + ?Sized>(grid: &mut G, position: IVec3, replacement: &Pattern) -> Bounds {
    for (offset, tile) in replacement.iter() {
        if !tile.is_wildcard() {
            grid.set_tile(position + offset, tile.clone(), false);
        }
    }
    grid.trigger_change_events();
    Bounds::new(position, replacement.size())
}

/// Apply a match's right side and count the application against its rule.
///
/// Returns the edited box. A match that refers to a rule outside the rule set
/// is ignored and yields an empty box.
pub fn apply_match<G: TileGrid + ?Sized>(
    grid: &mut G,
    rules: &RuleSet,
    counts: &mut UseCounts,
    applied: &Match,
) -> Bounds {
    let Some(rule) = rules.get(applied.rule) else {
        return Bounds::new(applied.position, IVec3::ZERO);
    };
    let Some(permutation) = rule.permutations().get(applied.permutation) else {
        return Bounds::new(applied.position, IVec3::ZERO);
    };

    let edited = write_pattern(grid, applied.position, &permutation.right);
    counts.increment(rule.name());
    edited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VoxelTileGrid;
    use crate::rule::Rule;
    use crate::tile::Tile;

    fn grid() -> VoxelTileGrid {
        VoxelTileGrid::new(IVec3::new(4, 1, 1), Tile::new(".")).unwrap()
    }

    #[test]
    fn test_write_skips_wildcards() {
        let mut g = grid();
        let edited = write_pattern(&mut g, IVec3::new(1, 0, 0), &Pattern::parse("X*X").unwrap());

        assert_eq!(edited, Bounds::new(IVec3::new(1, 0, 0), IVec3::new(3, 1, 1)));
        assert_eq!(g.layers_to_string(), "y=0\n.X.X\n");
    }

    #[test]
    fn test_write_fires_one_notification() {
        let mut g = grid();
        write_pattern(&mut g, IVec3::ZERO, &Pattern::parse("XXXX").unwrap());
        assert_eq!(g.drain_change_events().len(), 1);
    }

    #[test]
    fn test_all_wildcard_replacement_leaves_grid_unchanged() {
        let mut g = grid();
        let rules = RuleSet::new(vec![Rule::parse("noop", "..", "**").unwrap()]);
        let mut counts = UseCounts::new();
        counts.reset(&rules);

        let m = Match {
            rule: 0,
            permutation: 0,
            position: IVec3::new(2, 0, 0),
            size: IVec3::new(2, 1, 1),
        };
        let before = g.tiles().to_vec();
        apply_match(&mut g, &rules, &mut counts, &m);

        assert_eq!(g.tiles(), &before[..]);
        assert_eq!(counts.get("noop"), 1);
    }

    #[test]
    fn test_apply_match_uses_permutation_right_side() {
        let mut g = VoxelTileGrid::new(IVec3::new(2, 1, 2), Tile::new(".")).unwrap();
        let rules = RuleSet::new(vec![Rule::parse("turn", "..", "AB")
            .unwrap()
            .with_symmetry(crate::symmetry::Symmetry::Rotate)]);
        let mut counts = UseCounts::new();

        // Permutation 1 is the quarter turn: "B A" along z
        let m = Match {
            rule: 0,
            permutation: 1,
            position: IVec3::ZERO,
            size: IVec3::new(1, 1, 2),
        };
        let edited = apply_match(&mut g, &rules, &mut counts, &m);

        assert_eq!(edited.size, IVec3::new(1, 1, 2));
        assert_eq!(g.layers_to_string(), "y=0\nB.\nA.\n");
        assert_eq!(counts.get("turn"), 1);
    }
}
