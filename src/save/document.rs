//! On-disk save format and the load / store operations around it.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bevy::log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation::{EconomyConfig, EconomyState, SimulationState};
use crate::world::terrain::fresh_seed;
use crate::world::{
    BuildingType, IslandGenerator, Occupant, Seed, TerrainVariant, Tile, TileGrid, WorldConfig,
};

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read save file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file is corrupt: {0}")]
    Corrupt(String),
    #[error("failed to encode save document: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub altitude: f32,
    pub temperature: f32,
    pub humidity: f32,
    pub terrain: TerrainVariant,
    pub occupant: Option<BuildingType>,
}

impl From<&Tile> for TileRecord {
    fn from(tile: &Tile) -> Self {
        Self {
            altitude: tile.altitude,
            temperature: tile.temperature,
            humidity: tile.humidity,
            terrain: tile.terrain,
            occupant: tile.occupant.map(|o| o.building),
        }
    }
}

impl From<&TileRecord> for Tile {
    fn from(record: &TileRecord) -> Self {
        Self {
            altitude: record.altitude,
            temperature: record.temperature,
            humidity: record.humidity,
            terrain: record.terrain,
            // Animation phase is not saved; buildings restart at frame 0
            occupant: record.occupant.map(|building| Occupant {
                building,
                phase: 0.0,
            }),
        }
    }
}

/// Persistent part of the economy; per-tick rates are not saved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomyTotals {
    pub money: f32,
    pub energy: f32,
    pub co2: f32,
    pub battery: f32,
}

impl From<&EconomyState> for EconomyTotals {
    fn from(state: &EconomyState) -> Self {
        Self {
            money: state.money,
            energy: state.energy_stock,
            co2: state.co2_level,
            battery: state.battery_level,
        }
    }
}

impl From<EconomyTotals> for EconomyState {
    fn from(totals: EconomyTotals) -> Self {
        Self {
            money: totals.money,
            energy_stock: totals.energy,
            co2_level: totals.co2,
            battery_level: totals.battery,
            ..Default::default()
        }
    }
}

/// Everything needed to restore an island.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: u32,
    pub seed: Seed,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<TileRecord>,
    pub economy: EconomyTotals,
}

impl SaveDocument {
    /// Copy the persistent state out of the simulation.
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            version: SAVE_VERSION,
            seed: state.seed,
            width: state.grid.width(),
            height: state.grid.height(),
            tiles: state.grid.tiles().iter().map(TileRecord::from).collect(),
            economy: EconomyTotals::from(&state.economy),
        }
    }

    /// Validate the document and rebuild the grid and economy.
    pub fn into_parts(self) -> Result<(TileGrid, Seed, EconomyState), PersistenceError> {
        if self.version != SAVE_VERSION {
            return Err(PersistenceError::Corrupt(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PersistenceError::Corrupt(format!(
                "empty grid {}x{}",
                self.width, self.height
            )));
        }

        let tiles: Vec<Tile> = self.tiles.iter().map(Tile::from).collect();
        let count = tiles.len();
        let grid = TileGrid::from_tiles(self.width, self.height, tiles).ok_or_else(|| {
            PersistenceError::Corrupt(format!(
                "{} tiles do not fill a {}x{} grid",
                count, self.width, self.height
            ))
        })?;

        Ok((grid, self.seed, EconomyState::from(self.economy)))
    }
}

/// Write `document` as pretty JSON, replacing `path` atomically.
pub fn save_document(path: &Path, document: &SaveDocument) -> Result<(), PersistenceError> {
    let bytes = serde_json::to_vec_pretty(document)?;
    atomic_write(path, &bytes).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)
}

pub fn load_document(path: &Path) -> Result<SaveDocument, PersistenceError> {
    let bytes = fs::read(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|err| PersistenceError::Corrupt(err.to_string()))
}

/// Where the starting world came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldOrigin {
    Loaded,
    Generated,
}

#[derive(Clone, Debug)]
pub struct StartingWorld {
    pub grid: TileGrid,
    pub seed: Seed,
    pub economy: EconomyState,
    pub origin: WorldOrigin,
}

/// Restore the island at `path`, or generate a new one from a fresh seed
/// when there is no usable save.
pub fn load_or_generate(
    path: &Path,
    world: &WorldConfig,
    economy: &EconomyConfig,
    rng: &mut impl Rng,
) -> StartingWorld {
    if path.exists() {
        match load_document(path).and_then(SaveDocument::into_parts) {
            Ok((grid, seed, economy)) => {
                info!(
                    "Loaded {}x{} island (seed {}) from {}",
                    grid.width(),
                    grid.height(),
                    seed.get(),
                    path.display()
                );
                return StartingWorld {
                    grid,
                    seed,
                    economy,
                    origin: WorldOrigin::Loaded,
                };
            }
            Err(err) => warn!("{}; generating a new island", err),
        }
    }

    let seed = fresh_seed(rng);
    let grid = IslandGenerator::new(world.noise).generate(world.width, world.height, seed);
    info!(
        "Generated {}x{} island with seed {}",
        world.width,
        world.height,
        seed.get()
    );
    StartingWorld {
        grid,
        seed,
        economy: EconomyState::new(economy),
        origin: WorldOrigin::Generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use bevy::math::IVec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn simulation() -> SimulationState {
        let world = WorldConfig::default();
        let seed = Seed::new(42).unwrap();
        let mut grid = IslandGenerator::default().generate(world.width, world.height, seed);
        grid.set_occupant(IVec2::new(10, 12), BuildingType::WindTurbine)
            .unwrap();
        grid.set_occupant(IVec2::new(30, 31), BuildingType::House)
            .unwrap();
        let economy = EconomyState {
            money: 123.456,
            energy_stock: 7.25,
            co2_level: 0.031,
            battery_level: 2.5,
            last_produced: 1.0,
            last_consumed: 1.0,
        };
        SimulationState::new(grid, seed, economy, &CameraConfig::default(), &world)
    }

    #[test]
    fn save_then_load_restores_the_island() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_state.json");
        let state = simulation();

        save_document(&path, &SaveDocument::capture(&state)).unwrap();
        let (grid, seed, economy) = load_document(&path).unwrap().into_parts().unwrap();

        assert_eq!(seed, state.seed);
        assert_eq!(grid, state.grid);
        assert_eq!(economy.money, state.economy.money);
        assert_eq!(economy.energy_stock, state.economy.energy_stock);
        assert_eq!(economy.co2_level, state.economy.co2_level);
        assert_eq!(economy.battery_level, state.economy.battery_level);
        assert_eq!(economy.last_produced, 0.0);
        assert!(!dir.path().join("game_state.json.tmp").exists());
    }

    #[test]
    fn occupant_phase_restarts_after_loading() {
        let mut state = simulation();
        state.grid.tick(1.7);
        let (grid, _, _) = SaveDocument::capture(&state).into_parts().unwrap();
        let tile = grid.get(IVec2::new(10, 12)).unwrap();
        assert_eq!(
            tile.occupant,
            Some(Occupant {
                building: BuildingType::WindTurbine,
                phase: 0.0
            })
        );
    }

    #[test]
    fn mismatched_tile_count_is_corrupt() {
        let mut document = SaveDocument::capture(&simulation());
        document.tiles.pop();
        assert!(matches!(
            document.into_parts(),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn newer_versions_are_corrupt() {
        let mut document = SaveDocument::capture(&simulation());
        document.version = 2;
        assert!(matches!(
            document.into_parts(),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn corrupt_file_falls_back_to_a_new_island() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_state.json");
        fs::write(&path, b"{ not json").unwrap();

        let world = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let start = load_or_generate(&path, &world, &EconomyConfig::default(), &mut rng);

        assert_eq!(start.origin, WorldOrigin::Generated);
        assert_eq!(start.grid.width(), world.width);
        assert_eq!(start.economy.money, 500.0);
        assert!((0..10_000).contains(&start.seed.get()));
    }

    #[test]
    fn missing_file_generates_and_existing_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_state.json");
        let world = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        let start = load_or_generate(&path, &world, &EconomyConfig::default(), &mut rng);
        assert_eq!(start.origin, WorldOrigin::Generated);

        let state = simulation();
        save_document(&path, &SaveDocument::capture(&state)).unwrap();
        let start = load_or_generate(&path, &world, &EconomyConfig::default(), &mut rng);
        assert_eq!(start.origin, WorldOrigin::Loaded);
        assert_eq!(start.seed, state.seed);
        assert_eq!(start.grid.count_of(BuildingType::House), 1);
    }

    #[test]
    fn out_of_range_seed_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_state.json");
        for seed in [i64::MAX, i64::MIN, Seed::MAX + 1, -Seed::MAX - 1] {
            let mut value = serde_json::to_value(SaveDocument::capture(&simulation())).unwrap();
            value["seed"] = serde_json::json!(seed);
            fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

            assert!(
                matches!(load_document(&path), Err(PersistenceError::Corrupt(_))),
                "seed {seed} was accepted"
            );
        }
    }

    #[test]
    fn minimum_seed_in_save_regenerates_the_island() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_state.json");
        let mut value = serde_json::to_value(SaveDocument::capture(&simulation())).unwrap();
        value["seed"] = serde_json::json!(i64::MIN);
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let start = load_or_generate(
            &path,
            &WorldConfig::default(),
            &EconomyConfig::default(),
            &mut rng,
        );
        assert_eq!(start.origin, WorldOrigin::Generated);
    }
}
