//! Rendering: day/night tinting, draw-list construction, and the sprite pool
//! that puts the draw list on screen.

use bevy::prelude::*;

use crate::game_state::GameState;
use crate::simulation::SimulationSet;

pub mod day_night;
pub mod draw;
pub mod sprites;

pub use draw::{build_draw_list, DrawCommand, DrawView, Ghost, SpriteId};
pub use sprites::DrawQueue;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(day_night::DayNightPlugin)
            .init_resource::<DrawQueue>()
            .init_resource::<sprites::SpritePool>()
            .add_systems(
                Update,
                sprites::sync_sprites
                    .after(SimulationSet)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Playing), sprites::hide_all_sprites);
    }
}
