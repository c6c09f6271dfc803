//! Symmetry helpers for rewrite rules.
//!
//! Generates the rotations and reflections of a rule in the horizontal XZ
//! plane (Y is up) so a single authored rule can match in any orientation.

use super::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// Subgroups of the square's symmetry group, applied in the XZ plane.
///
/// Each subgroup selects from the 8 symmetries in generation order:
/// - Index 0: identity (e)
/// - Index 1: X reflection (b)
/// - Index 2: 90° rotation (a)
/// - Index 3: 90° rotation + reflection (ba)
/// - Index 4: 180° rotation (a²)
/// - Index 5: 180° rotation + reflection, i.e. Z reflection (ba²)
/// - Index 6: 270° rotation (a³)
/// - Index 7: 270° rotation + reflection (ba³)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    /// Just the identity
    #[default]
    None,
    /// Identity + X reflection
    ReflectX,
    /// Identity + Z reflection
    ReflectZ,
    /// X and Z reflections (4 variants)
    ReflectXZ,
    /// Rotations only (4 variants)
    Rotate,
    /// All 8 symmetries
    All,
}

impl Symmetry {
    /// Boolean mask over the 8 generated variants.
    pub fn mask(&self) -> [bool; 8] {
        match self {
            Symmetry::None => [true, false, false, false, false, false, false, false],
            Symmetry::ReflectX => [true, true, false, false, false, false, false, false],
            Symmetry::ReflectZ => [true, false, false, false, false, true, false, false],
            Symmetry::ReflectXZ => [true, true, false, false, true, true, false, false],
            Symmetry::Rotate => [true, false, true, false, true, false, true, false],
            Symmetry::All => [true; 8],
        }
    }

    /// Parse the compact group notation: `()`, `(x)`, `(z)`, `(x)(z)`, `(xz+)`, `(xz)`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "()" => Some(Symmetry::None),
            "(x)" => Some(Symmetry::ReflectX),
            "(z)" => Some(Symmetry::ReflectZ),
            "(x)(z)" => Some(Symmetry::ReflectXZ),
            "(xz+)" => Some(Symmetry::Rotate),
            "(xz)" => Some(Symmetry::All),
            _ => None,
        }
    }
}

/// One geometric variant of a rule: left and right sides transformed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePermutation {
    pub left: Pattern,
    pub right: Pattern,
}

impl RulePermutation {
    fn reflected(&self) -> Self {
        Self {
            left: self.left.reflected(),
            right: self.right.reflected(),
        }
    }

    fn y_rotated(&self) -> Self {
        Self {
            left: self.left.y_rotated(),
            right: self.right.y_rotated(),
        }
    }
}

/// Generate the unique variants of a left/right pair for a symmetry subgroup.
///
/// Order is fixed (identity first) and duplicates are dropped, so the result
/// is stable across calls.
pub fn plane_symmetries(left: &Pattern, right: &Pattern, symmetry: Symmetry) -> Vec<RulePermutation> {
    let mask = symmetry.mask();

    let r0 = RulePermutation {
        left: left.clone(),
        right: right.clone(),
    };
    let r1 = r0.reflected();
    let r2 = r0.y_rotated();
    let r3 = r2.reflected();
    let r4 = r2.y_rotated();
    let r5 = r4.reflected();
    let r6 = r4.y_rotated();
    let r7 = r6.reflected();

    let all = [r0, r1, r2, r3, r4, r5, r6, r7];

    let mut variants: Vec<RulePermutation> = Vec::with_capacity(8);
    for (i, variant) in all.into_iter().enumerate() {
        if mask[i] && !variants.contains(&variant) {
            variants.push(variant);
        }
    }

    variants
}
