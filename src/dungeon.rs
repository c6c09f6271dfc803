//! Demo dungeon grammar.
//!
//! Labels: `.` empty, `R` room, `C` corridor, `D` door. Generation starts from
//! a 3x3 room in the middle of the XZ plane, punches doors out of room walls,
//! grows corridors, attaches rooms to corridors once the layout has had time
//! to spread, and finally trims dead-end corridor cells with a sweep.

use grammar_core::{Pattern, Rule, RuleError, RuleSet, Symmetry};

/// Prefix of the rules swept once single stepping is exhausted.
pub const CLEANUP_PREFIX: &str = "cleanup";

pub fn dungeon_rules() -> Result<RuleSet, RuleError> {
    let rules = vec![
        // Door in a room wall with the first corridor cell behind it
        Rule::parse("corridor/start", "R..", "RDC")?
            .with_symmetry(Symmetry::Rotate)
            .with_max_applications(6),
        Rule::parse("corridor/extend", "C..", "CC.")?
            .with_symmetry(Symmetry::Rotate)
            .with_weight(4.0)?
            .with_max_applications(120),
        // 3x3 room beside a corridor end, entered through a door
        Rule::parse("room/place", "*... C... *...", "*RRR CDRR *RRR")?
            .with_symmetry(Symmetry::Rotate)
            .with_weight(2.0)?
            .with_wait_steps(8)
            .with_max_applications(12),
        Rule::parse("cleanup/dead_end", "*C* .C. *.*", "*** *.* ***")?
            .with_symmetry(Symmetry::Rotate),
    ];

    Ok(RuleSet::new(rules).with_start(Pattern::parse("RRR RRR RRR")?))
}
