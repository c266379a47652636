//! Kick detection
//!
//! A deliberately crude detector: a kick is a smoothed bass level that
//! jumps past the previous frame's level by a fixed ratio while also
//! clearing an absolute floor.  There is no refractory period, so a
//! bass line that keeps climbing steeply retriggers on every frame.

use crate::analyzer::Magnitude;
use crate::helpers;

/// How much louder than the previous frame bass has to get.
pub const TRIGGER_RATIO: f32 = 1.3;

/// Absolute bass floor below which nothing counts as a kick.
pub const KICK_FLOOR: Magnitude = 80.0;

/// Per-frame decay factor of the kick flash.
pub const FLASH_DECAY: f32 = 0.15;

/// Detects kicks and keeps the decaying flash they leave behind.
#[derive(Debug, Default)]
pub struct KickDetector {
    prev_bass: Magnitude,
    flash: Magnitude,
}

impl KickDetector {
    pub fn new() -> KickDetector {
        KickDetector::default()
    }

    /// Feed one frame of smoothed bass.
    ///
    /// The flash decays before a fresh kick saturates it, so a kick
    /// frame always reads back a flash of exactly 255.
    pub fn update(&mut self, bass: Magnitude) -> bool {
        self.decay();

        let kick = bass > self.prev_bass * TRIGGER_RATIO && bass > KICK_FLOOR;
        if kick {
            self.flash = crate::analyzer::MAX_MAGNITUDE;
        }

        self.prev_bass = bass;
        kick
    }

    /// Decay the flash without evaluating the kick rule.
    ///
    /// Used on idle frames, which carry no fresh bass level but must
    /// still let a leftover flash fade out.
    pub fn decay(&mut self) {
        self.flash = helpers::lerp(self.flash, 0.0, FLASH_DECAY);
    }

    /// Remaining flash intensity, `0.0..=255.0`.
    pub fn flash(&self) -> Magnitude {
        self.flash
    }
}
