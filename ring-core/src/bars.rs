//! Radial bar field
//!
//! The visual centerpiece: a fixed ring of bars, each animated towards
//! a target length sampled from the lower half of the spectrum.  Each
//! bar takes a fifth of each direct neighbor's magnitude on top of its
//! own, which smears hard spectral edges across the ring, and a little
//! uniform jitter keeps the picture alive on stationary signals.  The
//! first and last bar have a single neighbor and get only its share.

use crate::analyzer::{Spectrum, Storage, MAX_MAGNITUDE};
use crate::helpers;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Shortest a bar ever gets.
pub const MIN_LENGTH: f32 = 15.0;

/// Longest a bar ever gets.
pub const MAX_LENGTH: f32 = 120.0;

/// Weight of each direct neighbor's magnitude.
pub const NEIGHBOR_WEIGHT: f32 = 0.2;

/// Per-frame easing factor towards the target length.
pub const BAR_EASING: f32 = 0.3;

/// One bar of the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Position on the ring in radians, counted from the positive x axis.
    pub angle: f32,
    /// Current, eased length.
    pub length: f32,
    /// Length the bar is moving towards.
    pub target_length: f32,
    /// Index of the bar on the ring.
    pub index: usize,
}

/// Builder for [`BarField`]
#[derive(Debug, Default)]
pub struct BarFieldBuilder {
    /// Number of bars on the ring
    ///
    /// Can also be set from config as `"ring.bars.count"`.
    pub count: Option<usize>,

    /// Jitter amplitude added to every bar's magnitude
    ///
    /// `0.0` makes the field fully deterministic.
    ///
    /// Can also be set from config as `"ring.bars.jitter"`.
    pub jitter: Option<f32>,

    /// Seed for the jitter generator
    ///
    /// Defaults to entropy.  Fixing the seed makes runs reproducible.
    pub seed: Option<u64>,
}

impl BarFieldBuilder {
    pub fn new() -> BarFieldBuilder {
        Default::default()
    }

    pub fn count(&mut self, count: usize) -> &mut BarFieldBuilder {
        self.count = Some(count);
        self
    }

    pub fn jitter(&mut self, jitter: f32) -> &mut BarFieldBuilder {
        self.jitter = Some(jitter);
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut BarFieldBuilder {
        self.seed = Some(seed);
        self
    }

    pub fn build(&mut self) -> BarField {
        let count = self
            .count
            .unwrap_or_else(|| crate::CONFIG.get_or("ring.bars.count", 64));
        let jitter = self
            .jitter
            .unwrap_or_else(|| crate::CONFIG.get_or("ring.bars.jitter", 5.0));
        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let bars = (0..count)
            .map(|index| Bar {
                angle: index as f32 / count as f32 * std::f32::consts::TAU,
                length: MIN_LENGTH,
                target_length: MIN_LENGTH,
                index,
            })
            .collect();

        BarField { bars, jitter, rng }
    }
}

/// The animated ring of bars.
#[derive(Debug, Clone)]
pub struct BarField {
    bars: Vec<Bar>,
    jitter: f32,
    rng: SmallRng,
}

impl BarField {
    pub fn builder() -> BarFieldBuilder {
        BarFieldBuilder::new()
    }

    /// The bucket a bar samples.  Bars cover only the lower half of the
    /// spectrum, where most of the perceptual energy lives.
    fn bucket_for(bar: usize, count: usize, len: usize) -> usize {
        ((bar as f32 * (len as f32 / 2.0) / count as f32) as usize).min(len.saturating_sub(1))
    }

    /// Animate all bars one frame towards the given spectrum.
    ///
    /// Targets are clamped to the length limits no matter how loud the
    /// spectrum or the jitter; the eased length can therefore never
    /// leave them either.
    pub fn update<S: Storage>(&mut self, spectrum: &Spectrum<S>) {
        let len = spectrum.len();
        if len == 0 {
            return;
        }
        let count = self.bars.len();

        for bar in self.bars.iter_mut() {
            let i = bar.index;

            let mut value = spectrum[Self::bucket_for(i, count, len)];
            if i > 0 {
                value += spectrum[Self::bucket_for(i - 1, count, len)] * NEIGHBOR_WEIGHT;
            }
            if i + 1 < count {
                value += spectrum[Self::bucket_for(i + 1, count, len)] * NEIGHBOR_WEIGHT;
            }

            if self.jitter > 0.0 {
                value += self.rng.gen_range(-self.jitter..self.jitter);
            }

            bar.target_length = helpers::map_range(value, 0.0, MAX_MAGNITUDE, MIN_LENGTH, MAX_LENGTH)
                .clamp(MIN_LENGTH, MAX_LENGTH);
            bar.length = helpers::lerp(bar.length, bar.target_length, BAR_EASING);
        }
    }

    /// All bars in ring order.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
