//! Rule - a named, weighted rewrite with an eligibility policy.
//!
//! A rule owns an immutable left/right template plus the list of geometric
//! permutations derived from it. All permutations share the rule's name,
//! weight, application cap and step gate; use counts live outside the rule
//! (see [`UseCounts`](super::rule_set::UseCounts)) and are keyed by name.

use super::pattern::{Pattern, PatternError};
use super::symmetry::{plane_symmetries, RulePermutation, Symmetry};
use std::fmt;

/// Error type for rule construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Rule name is empty
    EmptyName,
    /// Left and right patterns have different sizes
    DimensionMismatch { rule: String },
    /// Weight is negative or not finite
    InvalidWeight { rule: String, weight: f64 },
    /// A pattern failed to parse
    Pattern(PatternError),
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::EmptyName => write!(f, "rule name is empty"),
            RuleError::DimensionMismatch { rule } => {
                write!(f, "rule '{}': left and right dimensions don't match", rule)
            }
            RuleError::InvalidWeight { rule, weight } => {
                write!(f, "rule '{}': invalid weight {}", rule, weight)
            }
            RuleError::Pattern(e) => write!(f, "pattern error: {}", e),
        }
    }
}

impl std::error::Error for RuleError {}

impl From<PatternError> for RuleError {
    fn from(e: PatternError) -> Self {
        RuleError::Pattern(e)
    }
}

/// A rewrite rule.
#[derive(Clone)]
pub struct Rule {
    name: String,
    left: Pattern,
    right: Pattern,
    weight: f64,
    /// None = unlimited
    max_applications: Option<usize>,
    wait_steps: usize,
    symmetry: Symmetry,
    permutations: Vec<RulePermutation>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("left", &self.left.to_text())
            .field("right", &self.right.to_text())
            .field("weight", &self.weight)
            .field("max_applications", &self.max_applications)
            .field("wait_steps", &self.wait_steps)
            .field("permutations", &self.permutations.len())
            .finish()
    }
}

impl Rule {
    /// Create a rule with weight 1, no cap, no step gate and no symmetry.
    pub fn new(name: impl Into<String>, left: Pattern, right: Pattern) -> Result<Self, RuleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RuleError::EmptyName);
        }
        if left.size() != right.size() {
            return Err(RuleError::DimensionMismatch { rule: name });
        }

        let permutations = plane_symmetries(&left, &right, Symmetry::None);
        Ok(Self {
            name,
            left,
            right,
            weight: 1.0,
            max_applications: None,
            wait_steps: 0,
            symmetry: Symmetry::None,
            permutations,
        })
    }

    /// Create a rule from pattern strings (see [`Pattern::parse`]).
    pub fn parse(name: impl Into<String>, left: &str, right: &str) -> Result<Self, RuleError> {
        Self::new(name, Pattern::parse(left)?, Pattern::parse(right)?)
    }

    /// Set the selection weight. Zero makes the rule unselectable under random selection.
    pub fn with_weight(mut self, weight: f64) -> Result<Self, RuleError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(RuleError::InvalidWeight {
                rule: self.name,
                weight,
            });
        }
        self.weight = weight;
        Ok(self)
    }

    /// Cap the number of applications. Negative values mean unlimited.
    pub fn with_max_applications(mut self, max: i32) -> Self {
        self.max_applications = usize::try_from(max).ok();
        self
    }

    /// Keep the rule ineligible until the step counter reaches `steps`.
    pub fn with_wait_steps(mut self, steps: usize) -> Self {
        self.wait_steps = steps;
        self
    }

    /// Set the symmetry subgroup and regenerate permutations.
    pub fn with_symmetry(mut self, symmetry: Symmetry) -> Self {
        self.symmetry = symmetry;
        self.permutations = plane_symmetries(&self.left, &self.right, symmetry);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn left(&self) -> &Pattern {
        &self.left
    }

    pub fn right(&self) -> &Pattern {
        &self.right
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn max_applications(&self) -> Option<usize> {
        self.max_applications
    }

    pub fn wait_steps(&self) -> usize {
        self.wait_steps
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Geometric variants in stable order; the identity is always first.
    pub fn permutations(&self) -> &[RulePermutation] {
        &self.permutations
    }

    /// Whether `uses` applications have reached the cap.
    #[inline]
    pub fn is_capped(&self, uses: usize) -> bool {
        self.max_applications.is_some_and(|max| uses >= max)
    }

    /// Whether the rule may be searched for at `step` after `uses` applications.
    #[inline]
    pub fn is_eligible(&self, uses: usize, step: usize) -> bool {
        !self.is_capped(uses) && step >= self.wait_steps
    }
}
