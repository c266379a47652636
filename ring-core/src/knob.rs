//! Volume knob
//!
//! The knob sits in the middle of the ring and turns pointer positions
//! into a volume target.  The pointer angle around the center maps
//! linearly onto `[0, 1)`, starting and wrapping at the 9 o'clock
//! position: pointing east means half volume, the seam at west is
//! silence.  The displayed volume eases towards the target every frame
//! while the target itself takes effect on the audio source at once.

use crate::helpers;

/// Radius of the knob in scene units.
pub const KNOB_RADIUS: f32 = 60.0;

/// Pick-up reach of a fresh press, as a factor of the radius.
pub const PRESS_REACH: f32 = 1.5;

/// Reach while dragging; dragging may stray further before it lets go.
pub const DRAG_REACH: f32 = 3.0;

/// Per-frame easing factor of the displayed volume.
pub const VOLUME_EASING: f32 = 0.1;

/// A pointer touching the scene, in the same units as the knob radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Initial contact.
    Press { x: f32, y: f32 },
    /// Movement while held down.
    Drag { x: f32, y: f32 },
}

impl PointerEvent {
    fn position(&self) -> (f32, f32) {
        match *self {
            PointerEvent::Press { x, y } => (x, y),
            PointerEvent::Drag { x, y } => (x, y),
        }
    }

    fn reach(&self) -> f32 {
        match self {
            PointerEvent::Press { .. } => KNOB_RADIUS * PRESS_REACH,
            PointerEvent::Drag { .. } => KNOB_RADIUS * DRAG_REACH,
        }
    }
}

/// Map a pointer angle (radians from the positive x axis) to a volume.
///
/// The angle is shifted so the wrap sits at the west seam, then scaled
/// onto `[0, 1)`.
fn angle_to_volume(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    (angle + PI).rem_euclid(TAU) / TAU
}

/// The knob state: an eased display value chasing a target.
#[derive(Debug, Clone)]
pub struct VolumeKnob {
    current: f32,
    target: f32,
}

impl Default for VolumeKnob {
    fn default() -> Self {
        VolumeKnob {
            current: 0.5,
            target: 0.5,
        }
    }
}

impl VolumeKnob {
    pub fn new() -> VolumeKnob {
        Default::default()
    }

    /// Feed a pointer event.
    ///
    /// `center` is the knob center in the same coordinates as the
    /// event.  Returns the new target if the pointer was within reach,
    /// so callers can forward it to the audio source immediately.
    pub fn apply(&mut self, event: PointerEvent, center: (f32, f32)) -> Option<f32> {
        let (x, y) = event.position();
        let (dx, dy) = (x - center.0, y - center.1);

        if (dx * dx + dy * dy).sqrt() > event.reach() {
            return None;
        }

        let target = angle_to_volume(dy.atan2(dx)).clamp(0.0, 1.0);
        self.target = target;
        Some(target)
    }

    /// Set the target directly.
    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    /// Ease the displayed volume one frame towards the target.
    pub fn tick(&mut self) {
        self.current = helpers::lerp(self.current, self.target, VOLUME_EASING);
    }

    /// The eased, displayed volume.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// The volume the knob is set to.
    pub fn target(&self) -> f32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const CENTER: (f32, f32) = (400.0, 300.0);

    #[test]
    fn east_is_half_volume() {
        let mut knob = VolumeKnob::new();

        let target = knob.apply(
            PointerEvent::Press {
                x: CENTER.0 + 50.0,
                y: CENTER.1,
            },
            CENTER,
        );

        assert_eq!(target, Some(0.5));
        assert_eq!(knob.target(), 0.5);
    }

    #[test]
    fn west_is_the_silent_seam() {
        let mut knob = VolumeKnob::new();

        let target = knob.apply(
            PointerEvent::Press {
                x: CENTER.0 - 50.0,
                y: CENTER.1,
            },
            CENTER,
        );

        assert_eq!(target, Some(0.0));
    }

    #[test]
    fn angles_grow_clockwise_from_the_seam() {
        // In screen coordinates y grows downwards, so a pointer below
        // the center sits at a quarter turn less than east.
        let mut knob = VolumeKnob::new();

        knob.apply(
            PointerEvent::Press {
                x: CENTER.0,
                y: CENTER.1 + 40.0,
            },
            CENTER,
        );
        assert!((knob.target() - 0.75).abs() < 1e-6);

        knob.apply(
            PointerEvent::Press {
                x: CENTER.0,
                y: CENTER.1 - 40.0,
            },
            CENTER,
        );
        assert!((knob.target() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn press_reach_is_limited() {
        let mut knob = VolumeKnob::new();

        // 100 > 60 * 1.5: too far away to grab
        let miss = knob.apply(
            PointerEvent::Press {
                x: CENTER.0 + 100.0,
                y: CENTER.1,
            },
            CENTER,
        );

        assert_eq!(miss, None);
        assert_eq!(knob.target(), 0.5);
    }

    #[test]
    fn dragging_reaches_further() {
        let mut knob = VolumeKnob::new();

        // The same position that a press cannot grab is fine mid-drag
        let hit = knob.apply(
            PointerEvent::Drag {
                x: CENTER.0 + 100.0,
                y: CENTER.1,
            },
            CENTER,
        );

        assert_eq!(hit, Some(0.5));
    }

    #[test]
    fn reach_boundary_is_inclusive() {
        let mut knob = VolumeKnob::new();

        let on_edge = knob.apply(
            PointerEvent::Press {
                x: CENTER.0 + KNOB_RADIUS * PRESS_REACH,
                y: CENTER.1,
            },
            CENTER,
        );

        assert_eq!(on_edge, Some(0.5));
    }

    #[test]
    fn display_eases_towards_target() {
        let mut knob = VolumeKnob::new();
        knob.set_target(1.0);

        assert_eq!(knob.current(), 0.5);
        knob.tick();
        assert!((knob.current() - 0.55).abs() < 1e-6);
        knob.tick();
        assert!((knob.current() - 0.595).abs() < 1e-6);

        for _ in 0..200 {
            knob.tick();
        }
        assert!((knob.current() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn seam_angles_never_reach_full_volume() {
        // Approaching the west seam from below wraps to almost 1,
        // from above it wraps back to 0; both stay inside [0, 1).
        let mut knob = VolumeKnob::new();

        knob.apply(
            PointerEvent::Press {
                x: CENTER.0 - 50.0,
                y: CENTER.1 + 1.0,
            },
            CENTER,
        );
        assert!(knob.target() < 1.0);
        assert!(knob.target() > 0.99);

        knob.apply(
            PointerEvent::Press {
                x: CENTER.0 - 50.0,
                y: CENTER.1 - 1.0,
            },
            CENTER,
        );
        assert!(knob.target() < 0.01);
    }
}
