//! Pointer input, normalised from mouse and touch into [`PointerEvent`]s.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Presses shorter than this that barely moved count as taps.
const TAP_MAX_SECONDS: f64 = 0.3;
/// Pointer travel (px) above which a press is a drag, not a tap.
const TAP_SLOP: f32 = 8.0;

/// Pointer input in y-up screen pixels, timestamped with real seconds.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { position: Vec2, at: f64 },
    Drag { position: Vec2, delta: Vec2, at: f64 },
    Up { at: f64 },
    Tap { position: Vec2 },
}

#[derive(Clone, Copy, Debug)]
struct Press {
    started: f64,
    last: Vec2,
    travel: f32,
}

/// Tracks the single active pointer between frames.
#[derive(Resource, Default, Debug)]
pub struct PointerTracker {
    press: Option<Press>,
    /// Set while a press that began over the HUD is held.
    over_ui: bool,
}

/// A short press that barely moved, released at `now`.
fn is_tap(press: &Press, now: f64) -> bool {
    press.travel < TAP_SLOP && now - press.started < TAP_MAX_SECONDS
}

/// Where the primary pointer is held this frame, if anywhere.
fn held_position(
    window: &Window,
    mouse: &ButtonInput<MouseButton>,
    touches: &Touches,
) -> Option<Vec2> {
    let raw = if mouse.pressed(MouseButton::Left) {
        window.cursor_position()
    } else {
        touches.iter().next().map(|touch| touch.position())
    }?;
    // Window coordinates grow downwards
    Some(Vec2::new(raw.x, window.height() - raw.y))
}

pub(super) fn emit_pointer_events(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    time: Res<Time<Real>>,
    interactions: Query<&Interaction>,
    mut tracker: ResMut<PointerTracker>,
    mut events: EventWriter<PointerEvent>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let now = time.elapsed_secs_f64();
    let held = held_position(window, &mouse, &touches);

    match (tracker.press, held) {
        (None, Some(position)) => {
            if tracker.over_ui {
                return;
            }
            if interactions.iter().any(|i| *i != Interaction::None) {
                tracker.over_ui = true;
                return;
            }
            tracker.press = Some(Press {
                started: now,
                last: position,
                travel: 0.0,
            });
            events.send(PointerEvent::Down { position, at: now });
        }
        (Some(mut press), Some(position)) => {
            let delta = position - press.last;
            if delta != Vec2::ZERO {
                press.travel += delta.length();
                press.last = position;
                tracker.press = Some(press);
                events.send(PointerEvent::Drag {
                    position,
                    delta,
                    at: now,
                });
            }
        }
        (Some(press), None) => {
            tracker.press = None;
            events.send(PointerEvent::Up { at: now });
            if is_tap(&press, now) {
                events.send(PointerEvent::Tap {
                    position: press.last,
                });
            }
        }
        (None, None) => tracker.over_ui = false,
    }
}
