//! Ordered rule collections and per-rule application counters.

use super::pattern::Pattern;
use super::rule::Rule;
use std::collections::HashMap;

/// An ordered sequence of rules plus the pattern used to seed generation.
///
/// Rule order is significant: it is the outer iteration order of the match
/// search and therefore the tie-break for first/last selection.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    /// Placed at the grid center on reset. None = start from the grid as-is.
    pub start: Option<Pattern>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules, start: None }
    }

    pub fn with_start(mut self, start: Pattern) -> Self {
        self.start = Some(start);
        self
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Whether some rule's step gate opens exactly at `step`.
    pub fn gate_opens_at(&self, step: usize) -> bool {
        step > 0 && self.rules.iter().any(|r| r.wait_steps() == step)
    }
}

/// Number of times each rule (any permutation) has been applied.
///
/// Keyed strictly by rule name so all permutations share one counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UseCounts {
    counts: HashMap<String, usize>,
}

impl UseCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter and key the table by the rule set's names.
    pub fn reset(&mut self, rules: &RuleSet) {
        self.counts.clear();
        for rule in rules.iter() {
            self.counts.insert(rule.name().to_string(), 0);
        }
    }

    pub fn get(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Increment and return the new count.
    pub fn increment(&mut self, name: &str) -> usize {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_counts_reset_keys_by_name() {
        let rules = RuleSet::new(vec![
            Rule::parse("a", "B", "W").unwrap(),
            Rule::parse("b", "W", "B").unwrap(),
        ]);
        let mut counts = UseCounts::new();
        counts.increment("a");
        counts.increment("stale");
        counts.reset(&rules);

        assert_eq!(counts.get("a"), 0);
        assert_eq!(counts.iter().count(), 2);
        assert!(counts.iter().all(|(name, _)| name == "a" || name == "b"));
    }

    #[test]
    fn test_use_counts_increment() {
        let mut counts = UseCounts::new();
        assert_eq!(counts.increment("a"), 1);
        assert_eq!(counts.increment("a"), 2);
        assert_eq!(counts.increment("b"), 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get("missing"), 0);
    }

    #[test]
    fn test_gate_opens_at() {
        let rules = RuleSet::new(vec![
            Rule::parse("early", "B", "W").unwrap(),
            Rule::parse("late", "W", "B").unwrap().with_wait_steps(4),
        ]);
        assert!(!rules.gate_opens_at(0));
        assert!(!rules.gate_opens_at(3));
        assert!(rules.gate_opens_at(4));
    }
}
