//! Energy economy: money, energy stock, CO2 and the optional battery.

use bevy::prelude::*;

use crate::world::{BuildingType, EnergyRole, TileGrid};

/// Configuration for economy calculations.
#[derive(Resource, Clone, Debug)]
pub struct EconomyConfig {
    /// Funds of a brand-new island.
    pub starting_money: f32,
    /// Money earned per unit of energy a house consumes.
    pub energy_price: f32,
    /// Battery storage; zero means the island has no batteries.
    pub battery_capacity: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: 500.0,
            energy_price: 1.0,
            battery_capacity: 0.0,
        }
    }
}

impl EconomyConfig {
    pub fn has_batteries(&self) -> bool {
        self.battery_capacity > 0.0
    }
}

/// Resource totals plus this tick's production and consumption.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EconomyState {
    pub money: f32,
    pub energy_stock: f32,
    pub co2_level: f32,
    pub battery_level: f32,
    /// Energy produced since the last UI snapshot.
    pub last_produced: f32,
    /// Energy consumed since the last UI snapshot.
    pub last_consumed: f32,
}

impl EconomyState {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            money: config.starting_money,
            ..default()
        }
    }

    /// Supply/demand ratio for the HUD, where 1.0 means twice the demand.
    pub fn energy_display(&self) -> f32 {
        if self.last_consumed <= 0.0 {
            return 0.0;
        }
        (self.last_produced / self.last_consumed / 2.0).clamp(0.0, 1.0)
    }

    pub fn co2_display(&self) -> f32 {
        (self.co2_level * 10.0).clamp(0.0, 1.0)
    }

    pub fn battery_display(&self, capacity: f32) -> f32 {
        if capacity <= 0.0 {
            return 0.0;
        }
        (self.battery_level / capacity).clamp(0.0, 1.0)
    }

    pub fn can_afford(&self, building: BuildingType) -> bool {
        self.money >= building.cost() as f32
    }

    /// Deduct a building's cost. Returns false, leaving money untouched,
    /// when it is unaffordable.
    pub fn try_spend(&mut self, building: BuildingType) -> bool {
        if !self.can_afford(building) {
            return false;
        }
        self.money -= building.cost() as f32;
        true
    }

    /// Start a new rate window once the UI has seen the current one.
    pub fn reset_rates(&mut self) {
        self.last_produced = 0.0;
        self.last_consumed = 0.0;
    }
}

/// Accrue `dt` seconds of production and consumption from every occupied tile.
///
/// Houses draw more at night: `1 - night_intensity * 0.5` of their rate.
pub fn tick(
    state: &EconomyState,
    grid: &TileGrid,
    dt: f32,
    night_intensity: f32,
    config: &EconomyConfig,
) -> EconomyState {
    let mut next = state.clone();
    let mut produced = 0.0;
    let mut consumed = 0.0;

    for (_, occupant) in grid.occupied() {
        let stats = occupant.building.stats();
        match stats.role {
            EnergyRole::Producer => {
                produced += stats.energy_rate * dt;
                next.co2_level += stats.co2_rate * dt;
            }
            EnergyRole::Consumer => {
                let used = stats.energy_rate * dt * (1.0 - night_intensity * 0.5);
                consumed += used;
                next.money += used * config.energy_price;
            }
        }
    }

    next.last_produced += produced;
    next.last_consumed += consumed;

    let net = produced - consumed;
    if config.has_batteries() {
        if net > 0.0 {
            let charge = net.min(config.battery_capacity - next.battery_level).max(0.0);
            next.battery_level += charge;
            next.energy_stock += net - charge;
        } else {
            let draw = (-net).min(next.battery_level);
            next.battery_level -= draw;
            next.energy_stock -= -net - draw;
        }
    } else {
        next.energy_stock += net;
    }

    next
}

#[cfg(test)]
mod tests {
    use bevy::math::IVec2;

    use super::*;
    use crate::world::{IslandGenerator, Seed};

    fn island() -> TileGrid {
        IslandGenerator::default().generate(8, 8, Seed::new(3).unwrap())
    }

    #[test]
    fn one_coal_plant_for_one_second() {
        let mut grid = island();
        grid.set_occupant(IVec2::new(2, 2), BuildingType::CoalPlant)
            .unwrap();
        let config = EconomyConfig::default();
        let before = EconomyState::new(&config);

        let after = tick(&before, &grid, 1.0, 0.0, &config);
        assert!((after.energy_stock - before.energy_stock - 2.0).abs() < 1e-6);
        assert!((after.co2_level - before.co2_level - 2.0).abs() < 1e-6);
        assert_eq!(after.money, before.money);
        assert_eq!(after.last_produced, 2.0);
    }

    #[test]
    fn house_consumption_halves_at_night_and_pays() {
        let mut grid = island();
        grid.set_occupant(IVec2::new(1, 1), BuildingType::House).unwrap();
        let config = EconomyConfig::default();
        let start = EconomyState::new(&config);

        let day = tick(&start, &grid, 1.0, 0.0, &config);
        let night = tick(&start, &grid, 1.0, 1.0, &config);
        assert_eq!(day.last_consumed, 1.0);
        assert_eq!(night.last_consumed, 0.5);
        assert_eq!(day.energy_stock, -1.0);
        assert_eq!(day.money, 501.0);
    }

    #[test]
    fn energy_display_is_zero_guarded_and_clamped() {
        let mut state = EconomyState::default();
        assert_eq!(state.energy_display(), 0.0);
        state.last_produced = 3.0;
        state.last_consumed = 1.0;
        assert_eq!(state.energy_display(), 1.0);
        state.last_produced = 1.0;
        assert_eq!(state.energy_display(), 0.5);
        state.reset_rates();
        assert_eq!(state.energy_display(), 0.0);
    }

    #[test]
    fn co2_display_saturates() {
        let state = EconomyState {
            co2_level: 0.05,
            ..default()
        };
        assert!((state.co2_display() - 0.5).abs() < 1e-6);
        let state = EconomyState {
            co2_level: 4.0,
            ..default()
        };
        assert_eq!(state.co2_display(), 1.0);
    }

    #[test]
    fn battery_buffers_surplus_and_deficit() {
        let mut grid = island();
        grid.set_occupant(IVec2::new(3, 3), BuildingType::CoalPlant)
            .unwrap();
        let config = EconomyConfig {
            battery_capacity: 3.0,
            ..default()
        };
        let start = EconomyState::new(&config);

        let charged = tick(&start, &grid, 1.0, 0.0, &config);
        assert_eq!(charged.battery_level, 2.0);
        assert_eq!(charged.energy_stock, 0.0);

        let full = tick(&charged, &grid, 1.0, 0.0, &config);
        assert_eq!(full.battery_level, 3.0);
        assert_eq!(full.energy_stock, 1.0);
        assert_eq!(full.battery_display(config.battery_capacity), 1.0);

        grid.clear_occupant(IVec2::new(3, 3)).unwrap();
        grid.set_occupant(IVec2::new(4, 4), BuildingType::House).unwrap();
        let drained = tick(&full, &grid, 1.0, 0.0, &config);
        assert_eq!(drained.battery_level, 2.0);
        assert_eq!(drained.energy_stock, 1.0);
    }

    #[test]
    fn spending_requires_funds() {
        let mut state = EconomyState {
            money: 250.0,
            ..default()
        };
        assert!(!state.try_spend(BuildingType::WindTurbine));
        assert_eq!(state.money, 250.0);
        assert!(state.try_spend(BuildingType::SolarPanel));
        assert_eq!(state.money, 50.0);
    }
}
