//! Coarse frequency-band levels
//!
//! Collapses a spectrum into three bands by index fraction: the lowest
//! tenth of the buckets is *bass*, up to four tenths is *mid*, the rest
//! is *high*.  Band levels are magnitude means and therefore live on
//! the same `0..=255` scale as the spectrum itself.

use crate::analyzer::{Magnitude, Spectrum, Storage, MAX_MAGNITUDE};
use crate::helpers;

/// Fraction of buckets counted as bass.
pub const BASS_SPLIT: f32 = 0.1;

/// Fraction of buckets below the mid/high boundary.
pub const MID_SPLIT: f32 = 0.4;

/// Per-frame smoothing factor for band levels.
pub const BAND_SMOOTHING: f32 = 0.15;

/// Mean magnitudes of the three bands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandLevels {
    pub bass: Magnitude,
    pub mid: Magnitude,
    pub high: Magnitude,
}

impl BandLevels {
    /// Overall energy, the plain average of the three bands.
    pub fn energy(&self) -> Magnitude {
        (self.bass + self.mid + self.high) / 3.0
    }
}

/// Splits spectra into band levels and keeps their smoothed history.
///
/// The smoothed levels low-pass the raw means with a fixed factor per
/// analyzed frame, so they trail sudden changes.
#[derive(Debug, Default)]
pub struct BandAnalyzer {
    smoothed: BandLevels,
}

/// First bucket index past a band boundary fraction.
fn band_end(len: usize, fraction: f32) -> usize {
    ((len as f32 * fraction).ceil() as usize).min(len)
}

impl BandAnalyzer {
    pub fn new() -> BandAnalyzer {
        BandAnalyzer::default()
    }

    /// Analyze one spectrum.
    ///
    /// Returns the raw band means of this frame and folds them into the
    /// smoothed levels.  Means are clamped to the magnitude scale, and
    /// a band that ends up with no buckets reads as silence.
    pub fn analyze<S: Storage>(&mut self, spectrum: &Spectrum<S>) -> BandLevels {
        let len = spectrum.len();
        let bass_end = band_end(len, BASS_SPLIT);
        let mid_end = band_end(len, MID_SPLIT);

        let raw = BandLevels {
            bass: spectrum.mean_range(0..bass_end).clamp(0.0, MAX_MAGNITUDE),
            mid: spectrum.mean_range(bass_end..mid_end).clamp(0.0, MAX_MAGNITUDE),
            high: spectrum.mean_range(mid_end..len).clamp(0.0, MAX_MAGNITUDE),
        };

        self.smoothed.bass = helpers::lerp(self.smoothed.bass, raw.bass, BAND_SMOOTHING);
        self.smoothed.mid = helpers::lerp(self.smoothed.mid, raw.mid, BAND_SMOOTHING);
        self.smoothed.high = helpers::lerp(self.smoothed.high, raw.high, BAND_SMOOTHING);

        raw
    }

    /// The smoothed band levels after the last `analyze`.
    pub fn smoothed(&self) -> BandLevels {
        self.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        // 512 buckets split at 52 and 205
        assert_eq!(band_end(512, BASS_SPLIT), 52);
        assert_eq!(band_end(512, MID_SPLIT), 205);

        let mut buckets = vec![0.0; 512];
        for (i, b) in buckets.iter_mut().enumerate() {
            *b = if i < 52 {
                100.0
            } else if i < 205 {
                50.0
            } else {
                20.0
            };
        }
        let spectrum = Spectrum::new(buckets);

        let mut analyzer = BandAnalyzer::new();
        let raw = analyzer.analyze(&spectrum);

        assert_eq!(raw.bass, 100.0);
        assert_eq!(raw.mid, 50.0);
        assert_eq!(raw.high, 20.0);
    }

    #[test]
    fn smoothing_trails_raw() {
        let spectrum = Spectrum::new(vec![100.0; 64]);
        let mut analyzer = BandAnalyzer::new();

        analyzer.analyze(&spectrum);
        assert!((analyzer.smoothed().bass - 15.0).abs() < 1e-4);

        analyzer.analyze(&spectrum);
        assert!((analyzer.smoothed().bass - 27.75).abs() < 1e-4);
    }

    #[test]
    fn constant_input_converges_monotonically() {
        let spectrum = Spectrum::new(vec![200.0; 64]);
        let mut analyzer = BandAnalyzer::new();

        let mut previous = 0.0;
        for _ in 0..60 {
            analyzer.analyze(&spectrum);
            let bass = analyzer.smoothed().bass;

            // Each step is a convex combination, so the smoothed level
            // stays between its old value and the input
            assert!(bass > previous);
            assert!(bass <= 200.0);
            previous = bass;
        }
        assert!((previous - 200.0).abs() < 0.1);

        // The input itself is the fixed point
        let before = analyzer.smoothed();
        analyzer.analyze(&spectrum);
        assert!((analyzer.smoothed().bass - before.bass).abs() < 0.01);
    }

    #[test]
    fn means_are_clamped() {
        let spectrum = Spectrum::new(vec![400.0; 64]);
        let mut analyzer = BandAnalyzer::new();

        let raw = analyzer.analyze(&spectrum);
        assert_eq!(raw.bass, MAX_MAGNITUDE);
        assert_eq!(raw.mid, MAX_MAGNITUDE);
        assert_eq!(raw.high, MAX_MAGNITUDE);
    }

    #[test]
    fn tiny_spectrum_has_silent_bands() {
        // Two buckets: one lands in bass, one in high, mid is empty.
        let spectrum = Spectrum::new(vec![80.0, 120.0]);
        let mut analyzer = BandAnalyzer::new();

        let raw = analyzer.analyze(&spectrum);
        assert_eq!(raw.bass, 80.0);
        assert_eq!(raw.mid, 0.0);
        assert_eq!(raw.high, 120.0);
    }

    #[test]
    fn empty_spectrum_is_silent() {
        let spectrum = Spectrum::new(Vec::new());
        let mut analyzer = BandAnalyzer::new();

        let raw = analyzer.analyze(&spectrum);
        assert_eq!(raw, BandLevels::default());
    }

    #[test]
    fn energy_is_band_average() {
        let levels = BandLevels {
            bass: 90.0,
            mid: 60.0,
            high: 30.0,
        };
        assert_eq!(levels.energy(), 60.0);
    }
}
