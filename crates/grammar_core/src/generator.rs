//! Generation controller.
//!
//! Drives one generation run over a borrowed grid and rule set:
//!
//! ```text
//! Uninitialized --reset--> Seeded --step--> Stepping --step--> Stepping
//! ```
//!
//! A step that finds nothing returns `false` and leaves the state alone.
//! Callers treat a run of `false` results as exhaustion.
//!
//! # Example
//!
//! ```ignore
//! use grammar_core::{GenerationContext, Generator, RuleFilter, SelectionStrategy};
//!
//! let mut generator = Generator::new(SelectionStrategy::Random);
//! let mut ctx = GenerationContext::new(&mut grid, &rules);
//! generator.reset(&mut ctx, Some(42));
//! while generator.step_single(&mut ctx, &RuleFilter::none()) {}
//! generator.step_sweep(&mut ctx, &RuleFilter::prefix("cleanup"));
//! ```

use super::config::GeneratorConfig;
use super::grid::{TileGrid, VoxelTileGrid};
use super::match_cache::{CacheState, MatchCache};
use super::matcher::Match;
use super::rewrite::{apply_match, write_pattern};
use super::rng::{GrammarRng, StdRandom};
use super::rule_set::{RuleSet, UseCounts};
use super::selector::{select_match, RuleFilter, SelectionStrategy};
use bevy::log::{debug, info, warn};
use bevy::math::IVec3;

/// The grid and rule set a generation run works on.
///
/// Both are borrowed for the duration of a call; the generator never owns
/// them.
pub struct GenerationContext<'a, G: TileGrid + ?Sized = VoxelTileGrid> {
    pub grid: &'a mut G,
    pub rules: &'a RuleSet,
}

impl<'a, G: TileGrid + ?Sized> GenerationContext<'a, G> {
    pub fn new(grid: &'a mut G, rules: &'a RuleSet) -> Self {
        Self { grid, rules }
    }
}

/// Lifecycle of a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorState {
    /// Never reset
    #[default]
    Uninitialized,
    /// Reset, no step applied yet
    Seeded,
    /// At least one step applied since the last reset
    Stepping,
}

/// Rewrite controller: owns the random stream, the step counter, the use
/// counts and the match cache.
pub struct Generator {
    strategy: SelectionStrategy,
    random: Box<dyn GrammarRng>,
    step: usize,
    use_counts: UseCounts,
    cache: MatchCache,
    state: GeneratorState,
}

impl Generator {
    /// Create a generator with a `StdRandom` seeded with 0.
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self::with_rng(strategy, Box::new(StdRandom::from_seed(0)))
    }

    /// Create a generator drawing from a custom random source.
    pub fn with_rng(strategy: SelectionStrategy, random: Box<dyn GrammarRng>) -> Self {
        Self {
            strategy,
            random,
            step: 0,
            use_counts: UseCounts::new(),
            cache: MatchCache::new(),
            state: GeneratorState::Uninitialized,
        }
    }

    /// Strategy and seed from a config. Without a seed the stream comes
    /// from OS entropy.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let random: Box<dyn GrammarRng> = match config.seed {
            Some(seed) => Box::new(StdRandom::from_seed(seed)),
            None => Box::new(StdRandom::from_entropy()),
        };
        Self::with_rng(config.strategy, random)
    }

    /// Start a new run.
    ///
    /// Reseeds when `seed` is given, zeroes the step counter and use counts,
    /// writes the rule set's start pattern centered in the grid and drops the
    /// match cache. Other grid content is left as it is.
    pub fn reset<G: TileGrid + ?Sized>(&mut self, ctx: &mut GenerationContext<'_, G>, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.random.reseed(seed);
        }
        self.step = 0;
        self.use_counts.reset(ctx.rules);

        let grid_size = ctx.grid.size();
        let mut anchor = None;
        if let Some(start) = &ctx.rules.start {
            let start_size = start.size();
            if start_size.cmpgt(grid_size).any() {
                warn!(
                    "start pattern {} does not fit grid {}, skipping placement",
                    start_size, grid_size
                );
            } else {
                let position = centered_anchor(grid_size, start_size);
                write_pattern(&mut *ctx.grid, position, start);
                anchor = Some(position);
            }
        }

        self.cache.invalidate_all();
        self.state = GeneratorState::Seeded;
        info!(
            "generation reset: seed {:?}, grid {}, start anchor {:?}, {} rules",
            seed,
            grid_size,
            anchor,
            ctx.rules.len()
        );
    }

    /// Filtered candidates at the current step, recomputing the cache if
    /// needed. None when nothing passes the filter.
    pub fn candidates<G: TileGrid + ?Sized>(
        &mut self,
        ctx: &GenerationContext<'_, G>,
        filter: &RuleFilter,
    ) -> Option<Vec<Match>> {
        self.cache
            .candidates(&*ctx.grid, ctx.rules, &self.use_counts, self.step, filter)
    }

    /// Apply one selected match.
    ///
    /// Returns false when no candidate passes the filter or the selection
    /// strategy yields nothing; the run does not advance in that case.
    pub fn step_single<G: TileGrid + ?Sized>(
        &mut self,
        ctx: &mut GenerationContext<'_, G>,
        filter: &RuleFilter,
    ) -> bool {
        let Some(candidates) =
            self.cache
                .candidates(&*ctx.grid, ctx.rules, &self.use_counts, self.step, filter)
        else {
            debug!("step {}: no match", self.step);
            return false;
        };

        let Some(chosen) = select_match(&candidates, ctx.rules, self.strategy, self.random.as_mut())
        else {
            debug!(
                "step {}: no eligible candidate among {}",
                self.step,
                candidates.len()
            );
            return false;
        };

        let edited = apply_match(&mut *ctx.grid, ctx.rules, &mut self.use_counts, &chosen);
        self.step += 1;

        if ctx.rules.gate_opens_at(self.step) {
            // Rules waiting for this step were never searched for
            self.cache.invalidate_all();
        } else {
            self.cache
                .apply_single_rewrite(&*ctx.grid, ctx.rules, &self.use_counts, self.step, edited);
        }

        self.state = GeneratorState::Stepping;
        true
    }

    /// Apply every filtered candidate in one pass, then drop the cache.
    ///
    /// Only matches present before the sweep are applied, even when an earlier
    /// write in the same sweep creates new ones. The step counter advances
    /// once per sweep.
    pub fn step_sweep<G: TileGrid + ?Sized>(
        &mut self,
        ctx: &mut GenerationContext<'_, G>,
        filter: &RuleFilter,
    ) -> bool {
        let Some(candidates) =
            self.cache
                .candidates(&*ctx.grid, ctx.rules, &self.use_counts, self.step, filter)
        else {
            debug!("sweep at step {}: no match", self.step);
            return false;
        };

        for m in &candidates {
            apply_match(&mut *ctx.grid, ctx.rules, &mut self.use_counts, m);
        }

        self.step += 1;
        self.cache.invalidate_all();
        self.state = GeneratorState::Stepping;
        info!(
            "sweep applied {} matches, now at step {}",
            candidates.len(),
            self.step
        );
        true
    }

    /// Change the grid resolution and drop the cache.
    pub fn subdivide<G: TileGrid + ?Sized>(&mut self, ctx: &mut GenerationContext<'_, G>, delta: i32) {
        let before = ctx.grid.size();
        ctx.grid.subdivide(delta);
        self.cache.invalidate_all();
        info!("subdivide {}: grid {} -> {}", delta, before, ctx.grid.size());
    }

    /// Single-step until nothing matches or `max_steps` steps succeeded.
    ///
    /// `max_steps == 0` means no limit. Returns the number of successful steps.
    pub fn run<G: TileGrid + ?Sized>(&mut self, ctx: &mut GenerationContext<'_, G>, max_steps: usize) -> usize {
        let filter = RuleFilter::none();
        let mut applied = 0;
        while max_steps == 0 || applied < max_steps {
            if !self.step_single(ctx, &filter) {
                break;
            }
            applied += 1;
        }
        info!(
            "run finished after {} steps (step counter {})",
            applied, self.step
        );
        applied
    }

    /// Current step counter.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn use_counts(&self) -> &UseCounts {
        &self.use_counts
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Cached match set without triggering a scan.
    pub fn cache_state(&self) -> CacheState<'_> {
        self.cache.state()
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }
}

/// Anchor that centers a pattern of `pattern_size` in a grid of `grid_size`.
#[inline]
pub fn centered_anchor(grid_size: IVec3, pattern_size: IVec3) -> IVec3 {
    (grid_size - pattern_size) / 2
}
