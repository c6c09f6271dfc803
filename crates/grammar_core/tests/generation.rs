//! End-to-end generation behavior over the public API.

use bevy::math::IVec3;
use grammar_core::*;
use std::collections::HashSet;

fn grid(x: i32, y: i32, z: i32) -> VoxelTileGrid {
    VoxelTileGrid::new(IVec3::new(x, y, z), Tile::new(".")).unwrap()
}

fn as_set(matches: &[Match]) -> HashSet<Match> {
    matches.iter().copied().collect()
}

fn growth_rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::parse("grow", "R.", "RR")
            .unwrap()
            .with_symmetry(Symmetry::All)
            .with_max_applications(25),
        Rule::parse("branch", "R..", "RCC")
            .unwrap()
            .with_symmetry(Symmetry::Rotate)
            .with_weight(0.5)
            .unwrap(),
        Rule::parse("late", "C*.", "C*R")
            .unwrap()
            .with_symmetry(Symmetry::All)
            .with_wait_steps(6),
        Rule::parse("never", "RR RR", "CC CC")
            .unwrap()
            .with_weight(0.0)
            .unwrap(),
    ])
    .with_start(Pattern::parse("R").unwrap())
}

#[test]
fn five_cell_example_fills_then_stops() {
    let mut g = grid(5, 1, 1);
    let rules = RuleSet::new(vec![Rule::parse("A", ".", "X").unwrap()]);
    let mut generator = Generator::new(SelectionStrategy::Random);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, Some(11));

    assert!(generator.step_single(&mut ctx, &RuleFilter::none()));
    assert_eq!(ctx.grid.count("X"), 1);

    for _ in 0..4 {
        assert!(generator.step_single(&mut ctx, &RuleFilter::exact("A")));
    }
    assert!(!generator.step_single(&mut ctx, &RuleFilter::exact("A")));
    assert_eq!(generator.step(), 5);
    assert_eq!(g.layers_to_string(), "y=0\nXXXXX\n");
}

#[test]
fn capped_example_stops_after_one() {
    let mut g = grid(5, 1, 1);
    let rules = RuleSet::new(vec![Rule::parse("A", ".", "X")
        .unwrap()
        .with_max_applications(1)]);
    let mut generator = Generator::new(SelectionStrategy::Random);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);

    assert!(generator.step_single(&mut ctx, &RuleFilter::none()));
    assert!(!generator.step_single(&mut ctx, &RuleFilter::exact("A")));
    assert_eq!(g.count("X"), 1);
}

#[test]
fn repeated_candidate_fetch_is_identical() {
    let mut g = grid(9, 1, 9);
    let rules = growth_rules();
    let mut generator = Generator::new(SelectionStrategy::Random);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, Some(4));
    generator.run(&mut ctx, 5);

    let first = generator.candidates(&ctx, &RuleFilter::none());
    let second = generator.candidates(&ctx, &RuleFilter::none());
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn all_wildcard_left_side_matches_everywhere() {
    let mut g = grid(4, 3, 5);
    g.set_tile(IVec3::new(2, 1, 3), Tile::new("Q"), false);
    let rules = RuleSet::new(vec![Rule::parse("any", "**/** **/**", "**/** **/**").unwrap()]);
    let mut generator = Generator::new(SelectionStrategy::First);
    let ctx = GenerationContext::new(&mut g, &rules);

    let candidates = generator.candidates(&ctx, &RuleFilter::none()).unwrap();
    // 2x2x2 pattern: 3 * 2 * 4 anchors
    assert_eq!(candidates.len(), 24);
}

#[test]
fn capped_rule_never_returns() {
    let mut g = grid(8, 1, 1);
    let rules = RuleSet::new(vec![
        Rule::parse("A", ".", "X").unwrap().with_max_applications(2),
        Rule::parse("B", ".", "Y").unwrap(),
    ]);
    let mut generator = Generator::new(SelectionStrategy::First);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);

    assert!(generator.step_single(&mut ctx, &RuleFilter::exact("A")));
    assert!(generator.step_single(&mut ctx, &RuleFilter::exact("A")));
    assert_eq!(generator.use_counts().get("A"), 2);

    while generator.step_single(&mut ctx, &RuleFilter::exact("B")) {
        let candidates = generator
            .candidates(&ctx, &RuleFilter::none())
            .unwrap_or_default();
        assert!(candidates.iter().all(|m| m.rule != 0));
    }
    assert_eq!(ctx.grid.count("X"), 2);
    assert_eq!(ctx.grid.count("Y"), 6);
}

#[test]
fn gated_rule_appears_at_its_step() {
    let mut g = grid(6, 1, 1);
    let rules = RuleSet::new(vec![
        Rule::parse("tick", ".", "T").unwrap(),
        Rule::parse("gated", ".", "G").unwrap().with_wait_steps(3),
    ]);
    let mut generator = Generator::new(SelectionStrategy::First);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);

    for _ in 0..3 {
        assert!(generator
            .candidates(&ctx, &RuleFilter::exact("gated"))
            .is_none());
        assert!(generator.step_single(&mut ctx, &RuleFilter::exact("tick")));
    }
    assert_eq!(generator.step(), 3);

    let gated = generator
        .candidates(&ctx, &RuleFilter::exact("gated"))
        .unwrap();
    assert_eq!(gated.len(), 3);
}

#[test]
fn wildcard_replacement_counts_but_keeps_content() {
    let mut g = grid(3, 1, 1);
    let rules = RuleSet::new(vec![Rule::parse("noop", "..", "**").unwrap()]);
    let mut generator = Generator::new(SelectionStrategy::First);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);
    let before = ctx.grid.tiles().to_vec();

    assert!(generator.step_single(&mut ctx, &RuleFilter::none()));
    assert_eq!(ctx.grid.tiles(), &before[..]);
    assert_eq!(generator.use_counts().get("noop"), 1);
    assert_eq!(generator.step(), 1);
}

#[test]
fn incremental_cache_matches_full_rescan() {
    let mut g = grid(12, 1, 12);
    let rules = growth_rules();
    let mut generator = Generator::new(SelectionStrategy::Random);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, Some(2024));

    let mut steps = 0;
    while steps < 80 && generator.step_single(&mut ctx, &RuleFilter::none()) {
        steps += 1;
        if !generator.cache().is_initialized() {
            continue;
        }
        let full = find_all_matches(&*ctx.grid, ctx.rules, generator.use_counts(), generator.step());
        assert_eq!(
            as_set(generator.cache().matches()),
            as_set(&full),
            "diverged after step {}",
            steps
        );
        assert_eq!(generator.cache().matches().len(), full.len());
    }
    assert!(steps > 10);
}

#[test]
fn same_seed_same_result() {
    let rules = growth_rules();
    let run = |seed: u64| {
        let mut g = grid(10, 1, 10);
        let mut generator = Generator::new(SelectionStrategy::Random);
        let mut ctx = GenerationContext::new(&mut g, &rules);
        generator.reset(&mut ctx, Some(seed));
        generator.run(&mut ctx, 40);
        g.layers_to_string()
    };

    assert_eq!(run(77), run(77));
}

#[test]
fn sweep_then_single_steps_resume() {
    let mut g = grid(4, 1, 1);
    let rules = RuleSet::new(vec![
        Rule::parse("mark", ".", "M").unwrap(),
        Rule::parse("upgrade", "M", "U").unwrap(),
    ]);
    let mut generator = Generator::new(SelectionStrategy::First);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);

    assert!(generator.step_sweep(&mut ctx, &RuleFilter::none()));
    assert_eq!(ctx.grid.count("M"), 4);
    assert_eq!(generator.cache_state(), CacheState::Uninitialized);

    // The recompute now finds the matches the sweep created
    assert!(generator.step_single(&mut ctx, &RuleFilter::prefix("up")));
    assert_eq!(generator.step(), 2);
    assert_eq!(ctx.grid.count("U"), 1);
}

#[test]
fn subdivide_then_continue() {
    let mut g = grid(3, 1, 3);
    let rules = RuleSet::new(vec![Rule::parse("mark", ".", "X").unwrap()])
        .with_start(Pattern::parse("S").unwrap());
    let mut generator = Generator::new(SelectionStrategy::First);
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);
    assert_eq!(ctx.grid.count("S"), 1);

    generator.subdivide(&mut ctx, 1);
    assert_eq!(ctx.grid.size(), IVec3::new(6, 1, 6));
    assert_eq!(ctx.grid.count("S"), 4);

    assert_eq!(generator.run(&mut ctx, 0), 32);
    assert_eq!(ctx.grid.count("X"), 32);
}

#[test]
fn overlap_reference_vectors() {
    let unit = Bounds::new(IVec3::ZERO, IVec3::ONE);
    assert!(unit.overlaps(&unit));

    let a = Bounds::new(IVec3::ZERO, IVec3::splat(2));
    let b = Bounds::new(IVec3::new(1, 0, 0), IVec3::splat(2));
    assert!(a.overlaps(&b));

    let c = Bounds::new(IVec3::ZERO, IVec3::new(1, 2, 3));
    let d = Bounds::new(IVec3::new(1, 0, 0), IVec3::new(1, 2, 3));
    assert!(!c.overlaps(&d));
}

#[test]
fn start_pattern_written_once_per_reset() {
    let mut g = grid(7, 1, 7);
    let rules = growth_rules();
    let mut generator = Generator::from_config(&GeneratorConfig {
        seed: Some(3),
        ..Default::default()
    });
    let mut ctx = GenerationContext::new(&mut g, &rules);
    generator.reset(&mut ctx, None);
    assert_eq!(ctx.grid.get(IVec3::new(3, 0, 3)).map(Tile::label), Some("R"));
    assert_eq!(ctx.grid.count("R"), 1);
    assert_eq!(ctx.grid.drain_change_events().len(), 1);
}
