//! Grammar Studio: rule-driven dungeon generation.
//!
//! Run with: `cargo run -- [config.json] [--view]`
//!
//! Without `--view` the generation runs once headless and the final grid is
//! printed one Y layer at a time.

mod dungeon;
mod studio;
mod viewer;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use grammar_core::TileGrid;
use studio::{LaunchArgs, Studio};
use viewer::ViewerPlugin;

fn main() {
    let args = LaunchArgs::from_env();

    if args.view {
        App::new()
            .add_plugins(DefaultPlugins)
            .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
            .insert_resource(args)
            .add_plugins(ViewerPlugin)
            .run();
    } else {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(LogPlugin::default())
            .insert_resource(args)
            .add_systems(Startup, run_headless);
        // Startup runs on the first update
        app.update();
    }
}

fn run_headless(args: Res<LaunchArgs>) {
    let config = args.load_config();
    let mut studio = match Studio::new(config) {
        Ok(studio) => studio,
        Err(e) => {
            error!("Failed to set up generation: {}", e);
            return;
        }
    };

    let steps = studio.generate();
    info!("Generated {} grid in {} steps", studio.grid.size(), steps);
    println!("{}", studio.grid.layers_to_string());
}
