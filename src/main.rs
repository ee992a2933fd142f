//! GreenGrid - isometric island energy simulator
//!
//! Generates a noise-shaped island, lets the player place wind turbines,
//! coal plants, solar panels and houses, and runs a small energy economy
//! under a day/night cycle.

use bevy::prelude::*;

use greengrid::{audio, camera, game_state, render, save, simulation, tools, ui, world};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                // Pixel-art tiles must not be smoothed when scaled up
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "GreenGrid".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        // Game state management
        .add_plugins(game_state::GameStatePlugin)
        // World configuration
        .add_plugins(world::WorldPlugin)
        // Persistence must be registered before the simulation reads the world
        .add_plugins(save::SavePlugin)
        // Simulation core
        .add_plugins(simulation::SimulationPlugin)
        // Player tools
        .add_plugins(tools::ToolsPlugin)
        // Core plugins
        .add_plugins(camera::CameraPlugin)
        .add_plugins(render::RenderPlugin)
        // HUD
        .add_plugins(ui::UiPlugin)
        // Background music
        .add_plugins(audio::AudioPlugin)
        .run();
}
