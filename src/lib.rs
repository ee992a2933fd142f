//! GreenGrid - isometric island energy simulator.
//!
//! The simulation core (noise, island generation, isometric projection,
//! camera inertia, economy, day/night tinting) is engine-free and lives in
//! plain types. Each module also ships a bevy plugin that feeds the core with
//! input and turns its output into sprites, UI and save files.

pub mod audio;
pub mod camera;
pub mod game_state;
pub mod render;
pub mod save;
pub mod simulation;
pub mod tools;
pub mod ui;
pub mod world;
