//! Match selection - filter candidates by rule name and pick one.
//!
//! Strategies:
//! - `First` / `Last`: ends of the finder's deterministic order
//! - `Random`: one draw against the cumulative rule-weight distribution
//!
//! An unknown strategy or an all-zero weight set resolves to "no match"
//! rather than an error, so a generation loop never crashes on selection.

use super::matcher::Match;
use super::rng::GrammarRng;
use super::rule_set::RuleSet;
use bevy::log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How a single match is picked from the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    First,
    Last,
    #[default]
    Random,
    /// Anything a config names that isn't one of the above
    #[serde(other)]
    Unsupported,
}

/// Rule-name filter applied to candidates before selection.
///
/// No name means "accept everything". With a name, `partial` keeps rules
/// whose name starts with it, otherwise the name must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFilter {
    name: Option<String>,
    partial: bool,
}

impl Default for RuleFilter {
    fn default() -> Self {
        Self {
            name: None,
            partial: true,
        }
    }
}

impl RuleFilter {
    /// Accept every candidate.
    pub fn none() -> Self {
        Self::default()
    }

    /// Filter by name; an empty name means no filter.
    pub fn new(name: impl Into<String>, partial: bool) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() { None } else { Some(name) },
            partial,
        }
    }

    /// Keep rules whose name starts with `prefix`.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::new(prefix, true)
    }

    /// Keep rules named exactly `name`.
    pub fn exact(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    pub fn is_none(&self) -> bool {
        self.name.is_none()
    }

    pub fn accepts(&self, rule_name: &str) -> bool {
        match &self.name {
            None => true,
            Some(filter) if self.partial => rule_name.starts_with(filter.as_str()),
            Some(filter) => rule_name == filter,
        }
    }

    /// Candidates whose rule passes the filter, order preserved.
    pub fn apply(&self, candidates: &[Match], rules: &RuleSet) -> Vec<Match> {
        if self.is_none() {
            return candidates.to_vec();
        }
        candidates
            .iter()
            .filter(|m| rules.get(m.rule).is_some_and(|r| self.accepts(r.name())))
            .copied()
            .collect()
    }
}

/// Pick one match. Returns None for an empty candidate list, an unsupported
/// strategy, or a random draw where every weight is zero.
pub fn select_match(
    candidates: &[Match],
    rules: &RuleSet,
    strategy: SelectionStrategy,
    random: &mut dyn GrammarRng,
) -> Option<Match> {
    if candidates.is_empty() {
        return None;
    }

    match strategy {
        SelectionStrategy::First => candidates.first().copied(),
        SelectionStrategy::Last => candidates.last().copied(),
        SelectionStrategy::Random => weighted_pick(candidates, rules, random),
        SelectionStrategy::Unsupported => {
            warn!("unsupported selection strategy, treating step as no match");
            None
        }
    }
}

/// Single draw against the cumulative weight distribution.
fn weighted_pick(candidates: &[Match], rules: &RuleSet, random: &mut dyn GrammarRng) -> Option<Match> {
    let weight_of = |m: &Match| rules.get(m.rule).map_or(0.0, |r| r.weight());

    let total: f64 = candidates.iter().map(weight_of).sum();
    if total <= 0.0 {
        debug!(
            "all {} candidate weights are zero, no eligible candidate",
            candidates.len()
        );
        return None;
    }

    let target = random.next_double() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for m in candidates {
        let weight = weight_of(m);
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(*m);
        if target < cumulative {
            return Some(*m);
        }
    }

    // Rounding can leave target == total
    last_positive
}
