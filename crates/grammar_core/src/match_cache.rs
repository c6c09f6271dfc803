//! Incremental match cache.
//!
//! Holds the full current match set and patches it after single rewrites
//! instead of rescanning the whole grid:
//! 1. drop matches whose rule just hit its cap
//! 2. drop matches whose box overlaps the edited box
//! 3. search only the edited box for new matches and append them
//!
//! Sweeps and grid resolution changes invalidate the cache wholesale; the
//! next access recomputes from scratch.

use super::grid::TileGrid;
use super::matcher::{find_all_matches, find_matches, Match};
use super::region::Bounds;
use super::rule_set::{RuleSet, UseCounts};
use super::selector::RuleFilter;
use bevy::log::debug;

/// What the cache currently knows, for observers that must not trigger a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState<'a> {
    /// Never computed or invalidated; next access rescans
    Uninitialized,
    /// Computed, and there are no matches
    Empty,
    /// Computed matches in search order
    Ready(&'a [Match]),
}

/// The current match set, or nothing when it must be recomputed.
#[derive(Debug, Clone, Default)]
pub struct MatchCache {
    matches: Option<Vec<Match>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CacheState<'_> {
        match &self.matches {
            None => CacheState::Uninitialized,
            Some(matches) if matches.is_empty() => CacheState::Empty,
            Some(matches) => CacheState::Ready(matches),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.matches.is_some()
    }

    /// Cached matches without recomputing; empty when uninitialized.
    pub fn matches(&self) -> &[Match] {
        self.matches.as_deref().unwrap_or(&[])
    }

    /// Recompute over the whole grid if needed and return the full set.
    pub fn ensure<G: TileGrid + ?Sized>(
        &mut self,
        grid: &G,
        rules: &RuleSet,
        counts: &UseCounts,
        step: usize,
    ) -> &[Match] {
        self.matches.get_or_insert_with(|| {
            let found = find_all_matches(grid, rules, counts, step);
            debug!("full match scan found {} matches", found.len());
            found
        })
    }

    /// Filtered candidates, or None when there is nothing to choose from.
    pub fn candidates<G: TileGrid + ?Sized>(
        &mut self,
        grid: &G,
        rules: &RuleSet,
        counts: &UseCounts,
        step: usize,
        filter: &RuleFilter,
    ) -> Option<Vec<Match>> {
        let all = self.ensure(grid, rules, counts, step);
        if all.is_empty() {
            return None;
        }
        let filtered = filter.apply(all, rules);
        if filtered.is_empty() {
            None
        } else {
            Some(filtered)
        }
    }

    /// Patch the cache after one match was rewritten over `edited`.
    ///
    /// `counts` must already include the application. Does nothing while the
    /// cache is uninitialized; the next access rescans anyway.
    pub fn apply_single_rewrite<G: TileGrid + ?Sized>(
        &mut self,
        grid: &G,
        rules: &RuleSet,
        counts: &UseCounts,
        step: usize,
        edited: Bounds,
    ) {
        let Some(matches) = self.matches.as_mut() else {
            return;
        };

        let before = matches.len();
        matches.retain(|m| {
            let capped = rules
                .get(m.rule)
                .map_or(true, |r| r.is_capped(counts.get(r.name())));
            !capped && !m.bounds().overlaps(&edited)
        });
        let removed = before - matches.len();

        let fresh = find_matches(grid, rules, counts, step, edited);
        debug!(
            "incremental patch: removed {}, added {}, total {}",
            removed,
            fresh.len(),
            matches.len() + fresh.len()
        );
        matches.extend(fresh);
    }

    /// Drop everything; the next access recomputes over the whole grid.
    pub fn invalidate_all(&mut self) {
        self.matches = None;
    }
}
