//! Interactive viewer: one generation step per frame, tiles and matches drawn
//! with gizmos.
//!
//! Controls:
//! - Space: pause/resume
//! - R: restart (next seed)
//! - O: toggle the match overlay

use crate::studio::{LaunchArgs, Studio};
use bevy::prelude::*;
use grammar_core::{MatchOverlay, MatchOverlayPlugin, TileGrid};

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MatchOverlayPlugin)
            .init_resource::<ViewerState>()
            .add_systems(Startup, setup_viewer)
            .add_systems(
                Update,
                (handle_input, step_generation, sync_overlay, draw_tiles).chain(),
            );
    }
}

#[derive(Resource, Default)]
struct ViewerState {
    paused: bool,
}

fn setup_viewer(mut commands: Commands, args: Res<LaunchArgs>, mut overlay: ResMut<MatchOverlay>) {
    let config = args.load_config();
    overlay.enabled = config.overlay;

    let mut studio = match Studio::new(config) {
        Ok(studio) => studio,
        Err(e) => {
            error!("Failed to set up generation: {}", e);
            return;
        }
    };
    studio.restart();

    let size = studio.grid.size().as_vec3();
    let center = size * 0.5;
    let distance = size.max_element().max(8.0);
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(center + Vec3::new(0.0, distance * 1.2, distance * 0.6))
            .looking_at(center, Vec3::Y),
    ));
    commands.insert_resource(studio);
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<ViewerState>,
    mut overlay: ResMut<MatchOverlay>,
    studio: Option<ResMut<Studio>>,
) {
    let Some(mut studio) = studio else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Space) {
        state.paused = !state.paused;
        info!("Generation {}", if state.paused { "paused" } else { "resumed" });
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        studio.seed = studio.seed.map(|s| s.wrapping_add(1));
        studio.restart();
        info!(
            "Restarted with seed {:?} ({:?} selection)",
            studio.seed,
            studio.generator.strategy()
        );
    }

    if keyboard.just_pressed(KeyCode::KeyO) {
        overlay.enabled = !overlay.enabled;
    }
}

fn step_generation(state: Res<ViewerState>, studio: Option<ResMut<Studio>>) {
    let Some(mut studio) = studio else {
        return;
    };
    if !state.paused {
        studio.advance();
    }
}

fn sync_overlay(mut overlay: ResMut<MatchOverlay>, studio: Option<Res<Studio>>) {
    let Some(studio) = studio else {
        return;
    };
    if overlay.enabled {
        overlay.sync(studio.generator.cache(), &studio.rules);
    }
}

fn tile_color(label: &str) -> Option<Color> {
    match label {
        "R" => Some(Color::srgb(0.9, 0.6, 0.2)),
        "C" => Some(Color::srgb(0.6, 0.6, 0.6)),
        "D" => Some(Color::srgb(1.0, 0.1, 0.1)),
        "." => None,
        _ => Some(Color::WHITE),
    }
}

fn draw_tiles(mut gizmos: Gizmos, studio: Option<Res<Studio>>) {
    let Some(studio) = studio else {
        return;
    };
    let grid = &studio.grid;
    for (i, tile) in grid.tiles().iter().enumerate() {
        if tile.label() == studio.config.fill {
            continue;
        }
        let Some(color) = tile_color(tile.label()) else {
            continue;
        };
        let center = grid.position_of(i).as_vec3() + Vec3::splat(0.5);
        gizmos.cuboid(
            Transform::from_translation(center).with_scale(Vec3::splat(0.8)),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tiles_are_not_drawn() {
        assert_eq!(tile_color("."), None);
        assert!(tile_color("R").is_some());
        assert_eq!(tile_color("?"), Some(Color::WHITE));
    }
}
