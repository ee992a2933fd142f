//! Top-level game flow: splash screen, then play.

use bevy::prelude::*;

pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(OnEnter(GameState::Playing), log_play_started);
    }
}

/// High-level game state controlling which systems run.
#[derive(States, Default, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum GameState {
    /// Logo animation while assets stream in.
    #[default]
    Splash,
    /// The island is live: input, simulation and HUD run.
    Playing,
}

fn log_play_started() {
    info!("Entering play");
}
