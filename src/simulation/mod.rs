//! The simulation core.
//!
//! [`SimulationState`] owns every piece of mutable game state and advances
//! it once per rendered frame with [`SimulationState::advance_frame`]. The
//! bevy system around it only gathers input and hands results to the
//! renderer and HUD.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::{CameraConfig, CameraController, IsoProjector, PointerEvent};
use crate::game_state::GameState;
use crate::render::day_night::DayNightConfig;
use crate::render::{build_draw_list, DrawCommand, DrawQueue, DrawView, Ghost};
use crate::tools::placement::{self, PendingPlacement};
use crate::tools::PlacementIntent;
use crate::ui::UiSnapshot;
use crate::world::{Seed, TileGrid, WorldConfig};

pub mod economy;

pub use economy::{EconomyConfig, EconomyState};

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>()
            .init_resource::<EconomyConfig>()
            .init_resource::<UiSnapshot>()
            .add_systems(OnEnter(GameState::Playing), reset_camera)
            .add_systems(
                Update,
                (simulation_controls, advance_simulation)
                    .chain()
                    .in_set(SimulationSet)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Systems that advance [`SimulationState`]; readers of its output run after.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

/// Configuration for the simulation.
#[derive(Resource)]
pub struct SimulationConfig {
    /// Current simulation speed multiplier (0.5x to 4x).
    pub speed: f32,
    /// Whether simulation is paused.
    pub paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            paused: false,
        }
    }
}

/// Per-frame input to the simulation.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Wall-clock seconds since the previous frame; drives the camera.
    pub real_dt: f32,
    /// Simulated seconds; zero while paused.
    pub sim_dt: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    pub pointer: &'a [PointerEvent],
    pub intents: &'a [PlacementIntent],
}

/// All mutable game state, owned by the simulation tick.
#[derive(Resource, Clone, Debug)]
pub struct SimulationState {
    pub grid: TileGrid,
    pub seed: Seed,
    pub economy: EconomyState,
    pub camera: CameraController,
    pub projector: IsoProjector,
    /// Simulated seconds since the world was created or loaded.
    pub elapsed: f64,
    pub night_intensity: f32,
    pub pending: Option<PendingPlacement>,
}

impl SimulationState {
    pub fn new(
        grid: TileGrid,
        seed: Seed,
        economy: EconomyState,
        camera: &CameraConfig,
        world: &WorldConfig,
    ) -> Self {
        Self {
            grid,
            seed,
            economy,
            camera: CameraController::new(*camera),
            projector: IsoProjector::from_config(world),
            elapsed: 0.0,
            night_intensity: 0.0,
            pending: None,
        }
    }

    fn bounds(&self) -> Vec2 {
        Vec2::new(self.grid.width() as f32, self.grid.height() as f32)
    }

    /// Cell under the middle of the viewport; may be off the grid.
    pub fn centre_cell(&self, viewport: Vec2) -> IVec2 {
        self.projector
            .cell_under(viewport / 2.0, self.camera.offset)
    }

    pub fn reset_camera(&mut self, viewport: Vec2) {
        let bounds = self.bounds();
        self.camera.reset(&self.projector, viewport, bounds);
    }

    /// Run one frame: clock, camera, placement, animation, draw list and
    /// economy, in that order. Returns the HUD snapshot for the frame.
    pub fn advance_frame(
        &mut self,
        input: FrameInput,
        day_night: &DayNightConfig,
        economy_config: &EconomyConfig,
        draw: &mut Vec<DrawCommand>,
    ) -> UiSnapshot {
        self.elapsed += f64::from(input.sim_dt);
        self.night_intensity = day_night.night_intensity(self.elapsed);

        for event in input.pointer {
            self.apply_pointer(*event);
        }
        let bounds = self.bounds();
        self.camera.integrate(input.real_dt);
        self.camera.clamp(&self.projector, input.viewport, bounds);

        for intent in input.intents {
            self.apply_intent(*intent, input.viewport);
        }
        let centre = self.centre_cell(input.viewport);
        if let Some(pending) = self.pending.as_mut() {
            pending.retarget(centre, &self.grid, &self.economy);
        }

        self.grid.tick(input.sim_dt);

        let view = DrawView {
            grid: &self.grid,
            projector: &self.projector,
            offset: self.camera.offset,
            night_intensity: self.night_intensity,
            sky: day_night.sky_tint(self.night_intensity),
            ghost: self.pending.map(|p| Ghost {
                cell: p.cell,
                building: p.building,
                valid: p.is_valid,
            }),
        };
        build_draw_list(&view, draw);

        self.economy = economy::tick(
            &self.economy,
            &self.grid,
            input.sim_dt,
            self.night_intensity,
            economy_config,
        );
        let snapshot = UiSnapshot::capture(&self.economy, economy_config, self.pending.as_ref());
        self.economy.reset_rates();
        snapshot
    }

    fn apply_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, at } => self.camera.pointer_down(position, at),
            PointerEvent::Drag { position, at, .. } => self.camera.pointer_drag(position, at),
            PointerEvent::Up { .. } => self.camera.pointer_up(),
            PointerEvent::Tap { position } => {
                let size = UVec2::new(self.grid.width(), self.grid.height());
                let cell = self.projector.cell_at(position, self.camera.offset, size);
                if let (Some(pending), Some(cell)) = (self.pending.as_mut(), cell) {
                    pending.pin(cell, &self.grid, &self.economy);
                    debug!("Placement pinned to ({}, {})", cell.x, cell.y);
                }
            }
        }
    }

    fn apply_intent(&mut self, intent: PlacementIntent, viewport: Vec2) {
        match intent {
            PlacementIntent::Open(building) => {
                let centre = self.centre_cell(viewport);
                self.pending = Some(PendingPlacement::open(
                    building,
                    centre,
                    &self.grid,
                    &self.economy,
                ));
            }
            PlacementIntent::Confirm => {
                let Some(pending) = self.pending.take() else {
                    return;
                };
                if !pending.is_valid {
                    info!("Placement of {} cancelled: tile unavailable", pending.building.name());
                    return;
                }
                if let Err(err) = placement::confirm(&pending, &mut self.grid, &mut self.economy) {
                    warn!("Placement rejected: {}", err);
                }
            }
            PlacementIntent::Cancel => self.pending = None,
        }
    }
}

fn viewport_size(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    Some(Vec2::new(window.width(), window.height()))
}

fn reset_camera(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<SimulationState>,
) {
    if let Some(viewport) = viewport_size(&windows) {
        state.reset_camera(viewport);
    }
}

#[allow(clippy::too_many_arguments)]
fn advance_simulation(
    time: Res<Time>,
    config: Res<SimulationConfig>,
    day_night: Res<DayNightConfig>,
    economy_config: Res<EconomyConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: EventReader<PointerEvent>,
    mut intents: EventReader<PlacementIntent>,
    mut state: ResMut<SimulationState>,
    mut queue: ResMut<DrawQueue>,
    mut snapshot: ResMut<UiSnapshot>,
) {
    let Some(viewport) = viewport_size(&windows) else {
        return;
    };
    let pointer: Vec<PointerEvent> = pointer.read().copied().collect();
    let intents: Vec<PlacementIntent> = intents.read().copied().collect();

    let real_dt = time.delta_secs();
    let sim_dt = if config.paused {
        0.0
    } else {
        real_dt * config.speed
    };
    let input = FrameInput {
        real_dt,
        sim_dt,
        viewport,
        pointer: &pointer,
        intents: &intents,
    };
    *snapshot = state.advance_frame(input, &day_night, &economy_config, &mut queue.commands);
}

/// Keyboard controls for simulation speed and pause.
fn simulation_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut config: ResMut<SimulationConfig>,
) {
    // Space: Toggle pause
    if keyboard.just_pressed(KeyCode::Space) {
        config.paused = !config.paused;
        if config.paused {
            info!("Simulation PAUSED");
        } else {
            info!("Simulation RESUMED ({}x speed)", config.speed);
        }
    }

    // +/- for speed adjustment
    if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        config.speed = (config.speed + 0.5).min(4.0);
        info!("Simulation speed: {}x", config.speed);
    }
    if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        config.speed = (config.speed - 0.5).max(0.5);
        info!("Simulation speed: {}x", config.speed);
    }
}
