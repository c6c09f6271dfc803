//! Debug overlay for the current match set.
//!
//! Read-only observer: the embedding app copies a snapshot of the cache into
//! [`MatchOverlay`] (see [`MatchOverlay::sync`]) and the plugin's system draws
//! one wireframe box per match. Nothing in the engine calls into this module.

use super::match_cache::MatchCache;
use super::rule_set::RuleSet;
use bevy::prelude::*;
use serde::Serialize;

/// Snapshot of one cached match for drawing or dumping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchInfo {
    pub name: String,
    pub position: [i32; 3],
    pub size: [i32; 3],
}

impl MatchInfo {
    /// Snapshot every cached match; empty while the cache is uninitialized.
    pub fn collect(cache: &MatchCache, rules: &RuleSet) -> Vec<MatchInfo> {
        cache
            .matches()
            .iter()
            .filter_map(|m| {
                let rule = rules.get(m.rule)?;
                Some(MatchInfo {
                    name: rule.name().to_string(),
                    position: m.position.to_array(),
                    size: m.size.to_array(),
                })
            })
            .collect()
    }
}

/// Overlay settings and the snapshot being drawn.
#[derive(Resource)]
pub struct MatchOverlay {
    /// Editor flag; nothing is drawn while false
    pub enabled: bool,
    /// World units per grid cell
    pub cell_size: f32,
    /// Shrinks boxes so adjacent matches stay distinguishable
    pub inset: f32,
    pub color: Color,
    pub matches: Vec<MatchInfo>,
}

impl Default for MatchOverlay {
    fn default() -> Self {
        Self {
            enabled: true,
            cell_size: 1.0,
            inset: 0.05,
            color: Color::srgb(1.0, 0.0, 1.0), // Magenta
            matches: Vec::new(),
        }
    }
}

impl MatchOverlay {
    /// Replace the snapshot with the cache's current content.
    pub fn sync(&mut self, cache: &MatchCache, rules: &RuleSet) {
        self.matches = MatchInfo::collect(cache, rules);
    }
}

/// The 12 edges of a match's box in world space.
pub fn match_box_edges(info: &MatchInfo, cell_size: f32, inset: f32) -> [(Vec3, Vec3); 12] {
    let min = Vec3::from_array(info.position.map(|v| v as f32)) * cell_size + Vec3::splat(inset);
    let max = Vec3::from_array(info.position.map(|v| v as f32)) * cell_size
        + Vec3::from_array(info.size.map(|v| v as f32)) * cell_size
        - Vec3::splat(inset);

    let c = [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ];
    [
        // Bottom face
        (c[0], c[1]),
        (c[1], c[2]),
        (c[2], c[3]),
        (c[3], c[0]),
        // Top face
        (c[4], c[5]),
        (c[5], c[6]),
        (c[6], c[7]),
        (c[7], c[4]),
        // Vertical edges
        (c[0], c[4]),
        (c[1], c[5]),
        (c[2], c[6]),
        (c[3], c[7]),
    ]
}

/// Draw every match in the snapshot as a wireframe box.
pub fn draw_match_overlay(mut gizmos: Gizmos, overlay: Res<MatchOverlay>) {
    if !overlay.enabled {
        return;
    }
    for info in &overlay.matches {
        for (start, end) in match_box_edges(info, overlay.cell_size, overlay.inset) {
            gizmos.line(start, end, overlay.color);
        }
    }
}

/// Registers [`MatchOverlay`] and its drawing system.
pub struct MatchOverlayPlugin;

impl Plugin for MatchOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchOverlay>()
            .add_systems(Update, draw_match_overlay);
    }
}
