//! Camera panning with inertia and an isometric boundary clamp.

use bevy::prelude::*;

use super::projection::IsoProjector;

/// Camera tuning.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    /// Velocity multiplier applied every coasting tick.
    pub friction: f32,
    /// Velocity components below this (px/s) snap to zero.
    pub velocity_epsilon: f32,
    /// Boundary excess (in tiles) that the clamp ignores.
    pub clamp_tolerance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            friction: 0.9,
            velocity_epsilon: 0.1,
            clamp_tolerance: 1e-3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMode {
    /// No pointer held; the offset follows the decaying velocity.
    Coasting,
    /// A pointer is held; the offset follows it directly.
    Dragging {
        pointer_anchor: Vec2,
        offset_anchor: Vec2,
        last_pointer: Vec2,
        last_time: f64,
    },
}

/// Camera offset and velocity, in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraController {
    pub offset: Vec2,
    pub velocity: Vec2,
    mode: CameraMode,
    config: CameraConfig,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mode: CameraMode::Coasting,
            config,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, CameraMode::Dragging { .. })
    }

    pub fn pointer_down(&mut self, position: Vec2, now: f64) {
        self.velocity = Vec2::ZERO;
        self.mode = CameraMode::Dragging {
            pointer_anchor: position,
            offset_anchor: self.offset,
            last_pointer: position,
            last_time: now,
        };
    }

    pub fn pointer_drag(&mut self, position: Vec2, now: f64) {
        let CameraMode::Dragging {
            pointer_anchor,
            offset_anchor,
            last_pointer,
            last_time,
        } = &mut self.mode
        else {
            return;
        };

        self.offset = *offset_anchor + (position - *pointer_anchor);

        let elapsed = now - *last_time;
        if elapsed > 0.0 {
            self.velocity = (position - *last_pointer) / elapsed as f32;
            *last_pointer = position;
            *last_time = now;
        }
    }

    /// Release the pointer; the last measured velocity carries over.
    pub fn pointer_up(&mut self) {
        self.mode = CameraMode::Coasting;
    }

    /// Advance coasting motion by `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        if self.is_dragging() {
            return;
        }
        self.offset += self.velocity * dt;
        self.velocity *= self.config.friction;

        let epsilon = self.config.velocity_epsilon;
        if self.velocity.x.abs() < epsilon {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < epsilon {
            self.velocity.y = 0.0;
        }
    }

    /// Keep the viewport over the grid.
    pub fn clamp(&mut self, projector: &IsoProjector, viewport: Vec2, bounds: Vec2) {
        self.offset = clamp_offset(
            projector,
            self.offset,
            viewport,
            bounds,
            self.config.clamp_tolerance,
        );
    }

    /// Centre the grid in the viewport and stop all motion.
    pub fn reset(&mut self, projector: &IsoProjector, viewport: Vec2, bounds: Vec2) {
        let centre = projector.tile_to_screen(bounds / 2.0, 0.0, Vec2::ZERO);
        self.offset = viewport / 2.0 - centre;
        self.velocity = Vec2::ZERO;
        self.mode = CameraMode::Coasting;
        self.clamp(projector, viewport, bounds);
    }
}

/// Tile-space correction for one axis given the extreme corner coordinates.
fn axis_excess(min: f32, max: f32, limit: f32, tolerance: f32) -> f32 {
    let excess = if max - min > limit {
        (min + max) / 2.0 - limit / 2.0
    } else if max > limit {
        max - limit
    } else if min < 0.0 {
        min
    } else {
        0.0
    };
    if excess.abs() > tolerance {
        excess
    } else {
        0.0
    }
}

/// Push `offset` back so the viewport corners, seen through the inverse
/// projection, stay inside `[0, bounds]` on each tile axis. A viewport wider
/// than the grid on an axis is centred on that axis.
pub fn clamp_offset(
    projector: &IsoProjector,
    offset: Vec2,
    viewport: Vec2,
    bounds: Vec2,
    tolerance: f32,
) -> Vec2 {
    let top_right = projector.screen_to_tile(viewport, offset);
    let bottom_left = projector.screen_to_tile(Vec2::ZERO, offset);
    let top_left = projector.screen_to_tile(Vec2::new(0.0, viewport.y), offset);
    let bottom_right = projector.screen_to_tile(Vec2::new(viewport.x, 0.0), offset);

    let excess = Vec2::new(
        axis_excess(bottom_left.x, top_right.x, bounds.x, tolerance),
        axis_excess(bottom_right.y, top_left.y, bounds.y, tolerance),
    );
    if excess == Vec2::ZERO {
        return offset;
    }
    offset + projector.offset_for_delta(excess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldConfig;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
    const BOUNDS: Vec2 = Vec2::new(64.0, 64.0);

    fn projector() -> IsoProjector {
        IsoProjector::from_config(&WorldConfig::default())
    }

    #[test]
    fn clamp_is_idempotent() {
        let iso = projector();
        let offsets = [
            Vec2::ZERO,
            Vec2::new(5000.0, -3000.0),
            Vec2::new(-4000.0, 8000.0),
            Vec2::new(640.0, -1200.0),
            Vec2::new(123.4, -56.7),
        ];
        for offset in offsets {
            let once = clamp_offset(&iso, offset, VIEWPORT, BOUNDS, 1e-3);
            let twice = clamp_offset(&iso, once, VIEWPORT, BOUNDS, 1e-3);
            assert_eq!(once, twice, "clamping {offset} was not stable");
        }
    }

    #[test]
    fn clamped_corners_stay_inside_the_grid() {
        let iso = projector();
        let offset = clamp_offset(&iso, Vec2::new(9000.0, 9000.0), VIEWPORT, BOUNDS, 1e-3);
        for corner in [
            Vec2::ZERO,
            VIEWPORT,
            Vec2::new(0.0, VIEWPORT.y),
            Vec2::new(VIEWPORT.x, 0.0),
        ] {
            let tile = iso.screen_to_tile(corner, offset);
            assert!(tile.x > -0.01 && tile.x < 64.01, "{corner} -> {tile}");
            assert!(tile.y > -0.01 && tile.y < 64.01, "{corner} -> {tile}");
        }
    }

    #[test]
    fn an_oversized_viewport_is_centred() {
        let iso = projector();
        let huge = Vec2::new(20_000.0, 20_000.0);
        let offset = clamp_offset(&iso, Vec2::ZERO, huge, BOUNDS, 1e-3);
        let low = iso.screen_to_tile(Vec2::ZERO, offset);
        let high = iso.screen_to_tile(huge, offset);
        assert!(((low.x + high.x) / 2.0 - 32.0).abs() < 0.01);
    }

    #[test]
    fn drag_follows_the_pointer() {
        let mut camera = CameraController::new(CameraConfig::default());
        camera.offset = Vec2::new(50.0, 50.0);
        camera.pointer_down(Vec2::new(100.0, 100.0), 1.0);
        camera.pointer_drag(Vec2::new(130.0, 90.0), 1.5);
        assert_eq!(camera.offset, Vec2::new(80.0, 40.0));
        assert_eq!(camera.velocity, Vec2::new(60.0, -20.0));
        // Samples without elapsed time do not produce a velocity
        camera.pointer_drag(Vec2::new(200.0, 90.0), 1.5);
        assert_eq!(camera.velocity, Vec2::new(60.0, -20.0));
        // Integration is suspended while dragging
        camera.integrate(1.0);
        assert_eq!(camera.offset, Vec2::new(150.0, 40.0));
    }

    #[test]
    fn coasting_decays_and_stops() {
        let mut camera = CameraController::new(CameraConfig::default());
        camera.pointer_down(Vec2::ZERO, 0.0);
        camera.pointer_drag(Vec2::new(10.0, 0.0), 0.1);
        camera.pointer_up();
        assert!((camera.velocity.x - 100.0).abs() < 1e-3);
        let released = camera.offset;

        let dt = 1.0 / 60.0;
        for _ in 0..90 {
            camera.integrate(dt);
        }
        assert_eq!(camera.velocity, Vec2::ZERO);

        let resting = camera.offset;
        camera.integrate(dt);
        assert_eq!(camera.offset, resting);
        // 100 * sum(0.9^n) / 60 bounds the total glide
        let glide = camera.offset.x - released.x;
        assert!(glide > 10.0 && glide < 17.0, "glided {glide}");
    }

    #[test]
    fn pointer_down_stops_coasting() {
        let mut camera = CameraController::new(CameraConfig::default());
        camera.velocity = Vec2::new(300.0, 0.0);
        camera.pointer_down(Vec2::ZERO, 0.0);
        assert_eq!(camera.velocity, Vec2::ZERO);
        assert!(camera.is_dragging());
    }

    #[test]
    fn reset_centres_the_grid() {
        let iso = projector();
        let mut camera = CameraController::new(CameraConfig::default());
        camera.velocity = Vec2::new(40.0, 40.0);
        camera.reset(&iso, VIEWPORT, BOUNDS);
        assert_eq!(camera.velocity, Vec2::ZERO);
        let centre = iso.screen_to_tile(VIEWPORT / 2.0, camera.offset);
        assert!(centre.distance(Vec2::splat(32.0)) < 0.01);
    }
}
