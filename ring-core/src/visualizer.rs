//! The visualizer core
//!
//! Ties the analysis chain together: one [`tick`] consumes the current
//! spectrum, runs band analysis, kick detection and the bar field, and
//! hands back an immutable [`RenderFrame`] for whatever renderer sits
//! on top.  Ticks without a spectrum keep the ambient animation state
//! moving while everything signal-derived stays frozen.
//!
//! [`tick`]: RingVisualizer::tick

use crate::analyzer::{BandAnalyzer, BandLevels, KickDetector, Magnitude, Spectrum, Storage};
use crate::bars::{Bar, BarField};
use crate::helpers;
use crate::knob::{PointerEvent, VolumeKnob};
use crate::source::SpectrumSource;

/// Color phase advance per tick, in degrees of hue.
pub const COLOR_STEP: f32 = 0.5;

/// Ambient clock advance per tick.
pub const CLOCK_STEP: f32 = 0.01;

/// Cap of the combined energy flash.
pub const ENERGY_FLASH_MAX: f32 = 80.0;

/// Kick state of a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KickState {
    /// Whether this very frame is a kick.
    pub detected: bool,
    /// Decaying flash left behind by the last kick, `0..=255`.
    pub flash: Magnitude,
}

/// Volume state of a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    /// Eased volume shown by the knob.
    pub current: f32,
    /// Volume the knob is set to.  This is what the audio runs at.
    pub target: f32,
}

/// Immutable snapshot of one frame, everything a renderer needs.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// `false` on idle frames.  The signal-derived fields then hold
    /// their last active values.
    pub active: bool,
    pub bars: Vec<Bar>,
    /// Smoothed band levels.
    pub bands: BandLevels,
    pub kick: KickState,
    pub volume: VolumeState,
    /// Monotonically increasing hue offset.  Wraps at consumption.
    pub color_phase: f32,
    /// Slow ambient clock for idle animations.
    pub clock: f32,
    /// Background flash from overall energy and kick, `0..=80`.
    pub energy_flash: f32,
}

impl RenderFrame {
    /// Hue of a bar in degrees, marching around the color wheel.
    pub fn bar_hue(&self, index: usize) -> f32 {
        (self.color_phase + index as f32 * 5.0) % 360.0
    }

    /// Hue of the volume knob, cycling at twice the bar rate.
    pub fn knob_hue(&self) -> f32 {
        (self.color_phase * 2.0) % 360.0
    }
}

/// A discrete user intent, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Start or resume playback.
    Play,
    /// Pause playback.
    Pause,
    /// Toggle live capture.
    ToggleLive,
    /// Raw pointer interaction, aimed at the volume knob.
    Pointer(PointerEvent),
    /// Set the volume target directly, bypassing the knob geometry.
    SetVolume(f32),
}

/// Builder for [`RingVisualizer`]
#[derive(Debug, Default)]
pub struct VisualizerBuilder {
    /// Number of bars on the ring
    pub bars: Option<usize>,

    /// Jitter amplitude of the bar field
    pub jitter: Option<f32>,

    /// Seed for the bar jitter
    pub seed: Option<u64>,
}

impl VisualizerBuilder {
    pub fn new() -> VisualizerBuilder {
        Default::default()
    }

    pub fn bars(&mut self, bars: usize) -> &mut VisualizerBuilder {
        self.bars = Some(bars);
        self
    }

    pub fn jitter(&mut self, jitter: f32) -> &mut VisualizerBuilder {
        self.jitter = Some(jitter);
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut VisualizerBuilder {
        self.seed = Some(seed);
        self
    }

    pub fn build(&mut self) -> RingVisualizer {
        let mut bars = BarField::builder();
        if let Some(count) = self.bars {
            bars.count(count);
        }
        if let Some(jitter) = self.jitter {
            bars.jitter(jitter);
        }
        if let Some(seed) = self.seed {
            bars.seed(seed);
        }

        RingVisualizer {
            bands: BandAnalyzer::new(),
            kick: KickDetector::new(),
            bars: bars.build(),
            knob: VolumeKnob::new(),
            color_phase: 0.0,
            clock: 0.0,
        }
    }
}

/// All visualizer state, owned in one place and advanced tick by tick.
#[derive(Debug)]
pub struct RingVisualizer {
    bands: BandAnalyzer,
    kick: KickDetector,
    bars: BarField,
    knob: VolumeKnob,
    color_phase: f32,
    clock: f32,
}

impl RingVisualizer {
    pub fn builder() -> VisualizerBuilder {
        VisualizerBuilder::new()
    }

    /// Advance one frame.
    ///
    /// With a spectrum, the full pipeline runs: band analysis, kick
    /// detection on the fresh smoothed bass, bar animation.  Without
    /// one only the ambient state moves on: color phase, clock and
    /// volume easing advance and a leftover kick flash keeps fading,
    /// while bands and bars hold their last values.
    pub fn tick<S: Storage>(&mut self, spectrum: Option<&Spectrum<S>>) -> RenderFrame {
        self.color_phase += COLOR_STEP;
        self.clock += CLOCK_STEP;
        self.knob.tick();

        let detected = match spectrum {
            Some(spectrum) => {
                self.bands.analyze(spectrum);
                let detected = self.kick.update(self.bands.smoothed().bass);
                self.bars.update(spectrum);
                detected
            }
            None => {
                self.kick.decay();
                false
            }
        };

        let bands = self.bands.smoothed();
        let energy_flash = (helpers::map_range(bands.energy(), 0.0, 200.0, 0.0, 40.0)
            + self.kick.flash() * 0.3)
            .clamp(0.0, ENERGY_FLASH_MAX);

        RenderFrame {
            active: spectrum.is_some(),
            bars: self.bars.bars().to_vec(),
            bands,
            kick: KickState {
                detected,
                flash: self.kick.flash(),
            },
            volume: VolumeState {
                current: self.knob.current(),
                target: self.knob.target(),
            },
            color_phase: self.color_phase,
            clock: self.clock,
            energy_flash,
        }
    }

    /// Apply one user intent.
    ///
    /// Transport intents go straight to the source.  Pointer intents
    /// run through the knob geometry around `center`; when they land,
    /// the source gain follows the new target immediately while the
    /// drawn knob eases after it.  A failed capture toggle is logged
    /// and otherwise ignored.
    pub fn apply_intent<S: SpectrumSource + ?Sized>(
        &mut self,
        intent: Intent,
        center: (f32, f32),
        source: &mut S,
    ) {
        match intent {
            Intent::Play => source.play(),
            Intent::Pause => source.pause(),
            Intent::ToggleLive => {
                if let Err(err) = source.toggle_live() {
                    log::error!("Failed to toggle live capture: {}", err);
                }
            }
            Intent::Pointer(event) => {
                if let Some(target) = self.knob.apply(event, center) {
                    source.set_gain(target);
                }
            }
            Intent::SetVolume(target) => {
                self.knob.set_target(target);
                source.set_gain(self.knob.target());
            }
        }
    }

    /// The bar field, mostly for inspection.
    pub fn bars(&self) -> &BarField {
        &self.bars
    }
}
