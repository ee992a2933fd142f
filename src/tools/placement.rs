//! Building placement: a pending placement previewed over a tile until the
//! player confirms or cancels it.

use bevy::log::info;
use bevy::math::IVec2;

use crate::simulation::economy::EconomyState;
use crate::world::{BuildingType, GridError, TileGrid};

/// A placement the player has opened but not yet confirmed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingPlacement {
    pub building: BuildingType,
    pub cell: IVec2,
    pub cost: u32,
    pub is_valid: bool,
    /// Tapped onto a cell; no longer follows the view centre.
    pub pinned: bool,
    /// Expected output of a wind turbine on this cell, in percent.
    pub efficiency: Option<f32>,
}

impl PendingPlacement {
    pub fn open(
        building: BuildingType,
        cell: IVec2,
        grid: &TileGrid,
        economy: &EconomyState,
    ) -> Self {
        let mut pending = Self {
            building,
            cell,
            cost: building.cost(),
            is_valid: false,
            pinned: false,
            efficiency: None,
        };
        pending.refresh(grid, economy);
        pending
    }

    /// Re-evaluate validity and efficiency for the current cell.
    pub fn refresh(&mut self, grid: &TileGrid, economy: &EconomyState) {
        self.is_valid = validate(grid, economy, self.building, self.cell).is_ok();
        self.efficiency = match (self.building, grid.get(self.cell)) {
            (BuildingType::WindTurbine, Some(tile)) => {
                Some((tile.altitude * 50.0 + 50.0).clamp(0.0, 100.0))
            }
            _ => None,
        };
    }

    /// Follow the view centre unless pinned.
    pub fn retarget(&mut self, cell: IVec2, grid: &TileGrid, economy: &EconomyState) {
        if !self.pinned {
            self.cell = cell;
        }
        self.refresh(grid, economy);
    }

    pub fn pin(&mut self, cell: IVec2, grid: &TileGrid, economy: &EconomyState) {
        self.cell = cell;
        self.pinned = true;
        self.refresh(grid, economy);
    }
}

/// Check that `building` may go on `cell`.
pub fn validate(
    grid: &TileGrid,
    economy: &EconomyState,
    building: BuildingType,
    cell: IVec2,
) -> Result<(), GridError> {
    let Some(tile) = grid.get(cell) else {
        return Err(GridError::OutOfBounds {
            x: cell.x,
            y: cell.y,
            width: grid.width(),
            height: grid.height(),
        });
    };
    if tile.is_occupied() || !economy.can_afford(building) {
        return Err(GridError::OccupiedOrUnaffordable {
            x: cell.x,
            y: cell.y,
        });
    }
    Ok(())
}

/// Place the pending building and pay for it. Nothing changes on error.
pub fn confirm(
    pending: &PendingPlacement,
    grid: &mut TileGrid,
    economy: &mut EconomyState,
) -> Result<(), GridError> {
    validate(grid, economy, pending.building, pending.cell)?;
    grid.set_occupant(pending.cell, pending.building)?;
    // Affordability was validated above
    economy.try_spend(pending.building);
    info!(
        "Placed {} at ({}, {}) for ${}",
        pending.building.name(),
        pending.cell.x,
        pending.cell.y,
        pending.cost
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::economy::EconomyConfig;
    use crate::world::{IslandGenerator, Seed};

    fn setup() -> (TileGrid, EconomyState) {
        let grid = IslandGenerator::default().generate(16, 16, Seed::new(42).unwrap());
        (grid, EconomyState::new(&EconomyConfig::default()))
    }

    #[test]
    fn wind_turbine_is_paid_only_on_confirm() {
        let (mut grid, mut economy) = setup();
        let cell = IVec2::new(8, 8);
        let pending = PendingPlacement::open(BuildingType::WindTurbine, cell, &grid, &economy);
        assert!(pending.is_valid);
        assert_eq!(pending.cost, 300);
        assert_eq!(economy.money, 500.0);

        confirm(&pending, &mut grid, &mut economy).unwrap();
        assert_eq!(economy.money, 200.0);
        assert_eq!(
            grid.get(cell).and_then(|t| t.occupant).map(|o| o.building),
            Some(BuildingType::WindTurbine)
        );

        economy.money = 10_000.0;
        let again = PendingPlacement::open(BuildingType::WindTurbine, cell, &grid, &economy);
        assert!(!again.is_valid);
        assert_eq!(
            confirm(&again, &mut grid, &mut economy),
            Err(GridError::OccupiedOrUnaffordable { x: 8, y: 8 })
        );
        assert_eq!(economy.money, 10_000.0);
    }

    #[test]
    fn unaffordable_placements_are_rejected_without_changes() {
        let (mut grid, mut economy) = setup();
        economy.money = 99.0;
        let pending =
            PendingPlacement::open(BuildingType::CoalPlant, IVec2::new(3, 4), &grid, &economy);
        assert!(!pending.is_valid);
        assert!(confirm(&pending, &mut grid, &mut economy).is_err());
        assert!(!grid.get(IVec2::new(3, 4)).unwrap().is_occupied());
        assert_eq!(economy.money, 99.0);
    }

    #[test]
    fn out_of_bounds_cells_are_invalid() {
        let (grid, economy) = setup();
        let pending =
            PendingPlacement::open(BuildingType::House, IVec2::new(-1, 4), &grid, &economy);
        assert!(!pending.is_valid);
        assert!(matches!(
            validate(&grid, &economy, BuildingType::House, IVec2::new(16, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn pinned_placements_ignore_the_view_centre() {
        let (grid, economy) = setup();
        let mut pending =
            PendingPlacement::open(BuildingType::SolarPanel, IVec2::new(1, 1), &grid, &economy);
        pending.retarget(IVec2::new(2, 2), &grid, &economy);
        assert_eq!(pending.cell, IVec2::new(2, 2));
        pending.pin(IVec2::new(5, 6), &grid, &economy);
        pending.retarget(IVec2::new(9, 9), &grid, &economy);
        assert_eq!(pending.cell, IVec2::new(5, 6));
    }

    #[test]
    fn efficiency_only_applies_to_turbines() {
        let (grid, economy) = setup();
        let turbine =
            PendingPlacement::open(BuildingType::WindTurbine, IVec2::new(0, 0), &grid, &economy);
        // Edge tiles sit at sea level
        assert_eq!(turbine.efficiency, Some(50.0));
        let house = PendingPlacement::open(BuildingType::House, IVec2::new(0, 0), &grid, &economy);
        assert_eq!(house.efficiency, None);
    }
}
