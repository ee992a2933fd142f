//! Persistence: restoring the island at startup, periodic autosave, and a
//! final save on exit.

use std::path::PathBuf;

use bevy::app::AppExit;
use bevy::prelude::*;

use crate::camera::CameraConfig;
use crate::game_state::GameState;
use crate::simulation::{EconomyConfig, SimulationSet, SimulationState};
use crate::world::WorldConfig;

pub mod document;
pub mod writer;

pub use document::{
    load_document, load_or_generate, save_document, PersistenceError, SaveDocument, StartingWorld,
    WorldOrigin,
};
pub use writer::SnapshotWriter;

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        // Startup reads these before their owning plugins may have been added
        app.init_resource::<SaveConfig>()
            .init_resource::<CameraConfig>()
            .init_resource::<EconomyConfig>()
            .add_systems(Startup, load_world)
            .add_systems(
                Update,
                autosave
                    .after(SimulationSet)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Last, flush_on_exit);
    }
}

/// Configuration for saving.
#[derive(Resource, Clone, Debug)]
pub struct SaveConfig {
    /// Save file location.
    pub path: PathBuf,
    /// Seconds between autosaves.
    pub interval: f32,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("game_state.json"),
            interval: 5.0,
        }
    }
}

/// Writer thread and autosave schedule.
#[derive(Resource)]
pub struct Autosave {
    writer: SnapshotWriter,
    timer: Timer,
}

fn load_world(
    mut commands: Commands,
    config: Res<SaveConfig>,
    world: Res<WorldConfig>,
    camera: Res<CameraConfig>,
    economy: Res<EconomyConfig>,
) {
    let start = load_or_generate(&config.path, &world, &economy, &mut rand::thread_rng());
    commands.insert_resource(SimulationState::new(
        start.grid,
        start.seed,
        start.economy,
        &camera,
        &world,
    ));
    commands.insert_resource(Autosave {
        writer: SnapshotWriter::spawn(config.path.clone()),
        timer: Timer::from_seconds(config.interval, TimerMode::Repeating),
    });
}

fn autosave(time: Res<Time>, state: Res<SimulationState>, mut autosave: ResMut<Autosave>) {
    autosave.timer.tick(time.delta());
    if autosave.timer.just_finished() {
        autosave.writer.submit(SaveDocument::capture(&state));
    }
}

fn flush_on_exit(
    mut exits: EventReader<AppExit>,
    state: Option<Res<SimulationState>>,
    autosave: Option<ResMut<Autosave>>,
) {
    if exits.read().last().is_none() {
        return;
    }
    let Some(mut autosave) = autosave else {
        return;
    };
    let last = state.map(|state| SaveDocument::capture(&state));
    autosave.writer.finish(last);
    info!("Island saved to {}", autosave.writer.path().display());
}
