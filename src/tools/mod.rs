//! Player tools for building on the island.
//!
//! The HUD and keyboard emit [`PlacementIntent`]s; the simulation applies
//! them to its pending placement.

use bevy::prelude::*;

use crate::game_state::GameState;
use crate::simulation::SimulationSet;
use crate::world::BuildingType;

pub mod placement;

pub use placement::PendingPlacement;

pub struct ToolsPlugin;

impl Plugin for ToolsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlacementIntent>().add_systems(
            Update,
            placement_shortcuts
                .before(SimulationSet)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// A request from the player to the placement tool.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementIntent {
    /// Start previewing a building.
    Open(BuildingType),
    /// Build the previewed building, or drop it if the tile is unavailable.
    Confirm,
    Cancel,
}

/// Keyboard shortcuts: 1-4 pick a building, Enter builds, Escape cancels.
fn placement_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut intents: EventWriter<PlacementIntent>,
) {
    const KEYS: [KeyCode; 4] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
    ];
    for (key, building) in KEYS.into_iter().zip(BuildingType::ALL) {
        if keyboard.just_pressed(key) {
            intents.send(PlacementIntent::Open(building));
        }
    }
    if keyboard.just_pressed(KeyCode::Enter) || keyboard.just_pressed(KeyCode::NumpadEnter) {
        intents.send(PlacementIntent::Confirm);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        intents.send(PlacementIntent::Cancel);
    }
}
